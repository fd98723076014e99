use super::stack::Stack;
use super::val::{Type, Val};
use crate::lang::{ErrorCode, Span};

type Result<T> = std::result::Result<T, ErrorCode>;

pub const MAX_GLOBALS: usize = 32;
pub const MAX_LOCALS: usize = 64;
pub const MAX_CALL_DEPTH: usize = 32;

/// A local variable or bound parameter.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: Span,
    pub ty: Type,
    pub val: Val,
}

/// A global variable, discovered by prescan. Remembers where its
/// initializer expression starts so the host can reset it, and the
/// metadata comment trailing its declaration.
#[derive(Debug, Clone)]
pub struct Global {
    pub name: Span,
    pub ty: Type,
    pub val: Val,
    pub init: Option<usize>,
    pub comment: Option<Span>,
}

/// Resolved storage location of a name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    Global(usize),
    Local(usize),
}

/// Variable storage: a flat global zone populated once by prescan,
/// and a local stack above it that grows and shrinks with blocks and
/// calls. The frame stack records the local-stack top saved at each
/// call so lookups stop at the current function's frame instead of
/// falling through into a caller's locals.
#[derive(Debug)]
pub struct Vars {
    globals: Vec<Global>,
    locals: Stack<Variable>,
    frames: Stack<usize>,
}

impl Vars {
    pub fn new() -> Vars {
        Vars {
            globals: vec![],
            locals: Stack::new(MAX_LOCALS, ErrorCode::TooManyLocals),
            frames: Stack::new(MAX_CALL_DEPTH, ErrorCode::TooManyCalls),
        }
    }

    pub fn clear_globals(&mut self) {
        self.globals.clear();
    }

    pub fn reset_execution(&mut self) {
        self.locals.clear();
        self.frames.clear();
    }

    pub fn globals(&self) -> &[Global] {
        &self.globals
    }

    pub fn global_mut(&mut self, index: usize) -> Option<&mut Global> {
        self.globals.get_mut(index)
    }

    pub fn add_global(&mut self, src: &str, global: Global) -> Result<()> {
        let name = &src[global.name.clone()];
        if self.globals.iter().any(|g| &src[g.name.clone()] == name) {
            return Err(ErrorCode::DuplicateVariable);
        }
        if self.globals.len() >= MAX_GLOBALS {
            return Err(ErrorCode::TooManyGlobals);
        }
        self.globals.push(global);
        Ok(())
    }

    pub fn locals_len(&self) -> usize {
        self.locals.len()
    }

    pub fn push_local(&mut self, var: Variable) -> Result<()> {
        self.locals.push(var)
    }

    pub fn truncate_locals(&mut self, len: usize) {
        self.locals.truncate(len)
    }

    /// Enter a call frame whose locals begin at `base`.
    pub fn enter_frame(&mut self, base: usize) -> Result<()> {
        self.frames.push(base)
    }

    /// Leave the current frame, dropping its parameters and locals.
    pub fn exit_frame(&mut self) -> Result<()> {
        let base = self.frames.pop().ok_or(ErrorCode::ReturnWithoutCall)?;
        self.locals.truncate(base);
        Ok(())
    }

    /// Resolve `name`, scanning the current frame's locals newest
    /// first, then the global zone.
    pub fn find(&self, src: &str, name: &str) -> Option<Slot> {
        let base = self.frames.last().copied().unwrap_or(0);
        for index in (base..self.locals.len()).rev() {
            if let Some(var) = self.locals.get(index) {
                if &src[var.name.clone()] == name {
                    return Some(Slot::Local(index));
                }
            }
        }
        self.globals
            .iter()
            .position(|g| &src[g.name.clone()] == name)
            .map(Slot::Global)
    }

    pub fn get(&self, slot: Slot) -> Val {
        match slot {
            Slot::Global(i) => self.globals[i].val,
            Slot::Local(i) => match self.locals.get(i) {
                Some(var) => var.val,
                None => Val::VOID,
            },
        }
    }

    /// Store into a resolved slot, truncating to the variable's
    /// declared type. Returns the value actually stored.
    pub fn assign(&mut self, slot: Slot, val: Val) -> Val {
        match slot {
            Slot::Global(i) => {
                let stored = val.coerce(self.globals[i].ty);
                self.globals[i].val = stored;
                stored
            }
            Slot::Local(i) => match self.locals.get_mut(i) {
                Some(var) => {
                    var.val = val.coerce(var.ty);
                    var.val
                }
                None => Val::VOID,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(src: &str, name: &str, num: i32) -> Global {
        let at = src.find(name).unwrap();
        Global {
            name: at..at + name.len(),
            ty: Type::Int,
            val: Val::int(num),
            init: None,
            comment: None,
        }
    }

    fn local(src: &str, name: &str, num: i32) -> Variable {
        let at = src.find(name).unwrap();
        Variable {
            name: at..at + name.len(),
            ty: Type::Int,
            val: Val::int(num),
        }
    }

    #[test]
    fn test_local_shadows_global() {
        let src = "alpha beta";
        let mut vars = Vars::new();
        vars.add_global(src, global(src, "alpha", 1)).unwrap();
        vars.enter_frame(0).unwrap();
        vars.push_local(local(src, "alpha", 2)).unwrap();
        match vars.find(src, "alpha") {
            Some(Slot::Local(0)) => {}
            other => panic!("{:?}", other),
        }
        vars.exit_frame().unwrap();
        assert_eq!(vars.find(src, "alpha"), Some(Slot::Global(0)));
    }

    #[test]
    fn test_lookup_stops_at_frame_boundary() {
        let src = "alpha beta";
        let mut vars = Vars::new();
        vars.add_global(src, global(src, "beta", 7)).unwrap();
        vars.enter_frame(0).unwrap();
        vars.push_local(local(src, "beta", 1)).unwrap();
        // Callee frame: the caller's local must not be visible.
        vars.enter_frame(1).unwrap();
        assert_eq!(vars.find(src, "beta"), Some(Slot::Global(0)));
        vars.exit_frame().unwrap();
        assert_eq!(vars.find(src, "beta"), Some(Slot::Local(0)));
    }

    #[test]
    fn test_duplicate_global() {
        let src = "alpha alpha";
        let mut vars = Vars::new();
        vars.add_global(src, global(src, "alpha", 1)).unwrap();
        assert_eq!(
            vars.add_global(src, global(src, "alpha", 2)),
            Err(ErrorCode::DuplicateVariable)
        );
    }

    #[test]
    fn test_assign_truncates() {
        let src = "c";
        let mut vars = Vars::new();
        let mut g = global(src, "c", 0);
        g.ty = Type::Char;
        vars.add_global(src, g).unwrap();
        let stored = vars.assign(Slot::Global(0), Val::int(300));
        assert_eq!(stored.num, 44);
        assert_eq!(stored.ty, Type::Char);
    }
}
