//! The script runtime.
//!
//! [`Interp`] drives two passes over a loaded script. `prescan` walks
//! the top level once, registering global variables (evaluating their
//! initializers) and recording the entry point of every function
//! definition. `execute` then calls `main()` and interprets statements
//! directly off the token stream; there is no intermediate
//! representation. The host reads and writes globals between runs
//! through the accessor methods, which is how pendant menu screens
//! bind to script parameters.

mod expr;
mod native;
mod output;
mod stack;
mod stmt;
mod val;
mod var;

pub use native::{Axis, Host, NullHost};
pub use val::{Type, Val};

use crate::lang::{Error, ErrorCode, Keyword, Lexer, Operator, Span, Token};
use output::Output;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use var::{Global, Vars};

type Result<T> = std::result::Result<T, Error>;

const DEFAULT_OUTPUT_LIMIT: usize = 64 * 1024;

/// A function definition found by prescan. `entry` is the cursor
/// position of the opening parenthesis of its parameter list.
struct Func {
    name: Span,
    entry: usize,
    ret: Type,
}

/// Interpreter for the pendant's scripting language.
///
/// ```
/// let mut interp = pscript::interp::Interp::new();
/// interp.load("void main() { println(\"ok\"); }");
/// assert!(interp.prescan());
/// assert!(interp.execute());
/// assert_eq!(interp.output(), "ok\n");
/// ```
pub struct Interp {
    lex: Lexer,
    vars: Vars,
    funcs: Vec<Func>,
    out: Output,
    host: Box<dyn Host>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Default for Interp {
    fn default() -> Interp {
        Interp::new()
    }
}

impl Interp {
    pub fn new() -> Interp {
        Interp {
            lex: Lexer::new(),
            vars: Vars::new(),
            funcs: vec![],
            out: Output::new(DEFAULT_OUTPUT_LIMIT),
            host: Box::new(NullHost),
            interrupt: None,
        }
    }

    /// Install the machine-state provider queried by the native
    /// position functions.
    pub fn set_host(&mut self, host: Box<dyn Host>) {
        self.host = host;
    }

    /// Install a flag another thread can raise to abort a running
    /// script between statements.
    pub fn set_interrupt(&mut self, flag: Arc<AtomicBool>) {
        self.interrupt = Some(flag);
    }

    /// Install a new script, discarding everything learned about the
    /// previous one.
    pub fn load(&mut self, src: &str) {
        self.lex.load(src);
        self.funcs.clear();
        self.vars.clear_globals();
        self.vars.reset_execution();
        self.out.reset();
    }

    pub fn set_output_limit(&mut self, limit: usize) {
        self.out.set_limit(limit);
    }

    /// Output of the last `execute`, or the formatted error report if
    /// a pass failed.
    pub fn output(&self) -> &str {
        self.out.as_str()
    }

    /// First pass: register globals and functions. Safe to call again
    /// at any time; the tables are rebuilt from scratch. On failure
    /// the error report is left in the output buffer.
    pub fn prescan(&mut self) -> bool {
        self.vars.clear_globals();
        self.funcs.clear();
        self.out.reset();
        match self.prescan_inner() {
            Ok(()) => true,
            Err(e) => {
                self.vars.clear_globals();
                self.funcs.clear();
                self.out.force(&e.to_string());
                false
            }
        }
    }

    fn prescan_inner(&mut self) -> Result<()> {
        self.lex.set_pos(0);
        loop {
            match self.lex.next_token()? {
                Token::Eof => return Ok(()),
                Token::Keyword(k) if k.is_type() => {
                    self.lex.putback();
                    self.scan_decl()?;
                }
                // An untyped top-level name can only be a function
                // definition; it returns void. Variables must be typed.
                Token::Ident => {
                    let name = self.lex.span();
                    if self.lex.next_token()? != Token::Op(Operator::LParen) {
                        return Err(self.err(ErrorCode::TypeExpected));
                    }
                    self.lex.putback();
                    self.scan_func(name, Type::Void)?;
                }
                Token::Op(Operator::Semicolon) => {}
                _ => return Err(self.err(ErrorCode::TypeExpected)),
            }
        }
    }

    /// One top-level declaration: either a function definition or a
    /// comma-separated list of global variables.
    fn scan_decl(&mut self) -> Result<()> {
        let ty = match self.lex.next_token()? {
            Token::Keyword(Keyword::Void) => Type::Void,
            Token::Keyword(Keyword::Char) => Type::Char,
            Token::Keyword(Keyword::Int) => Type::Int,
            _ => return Err(self.err(ErrorCode::TypeExpected)),
        };
        let mut name = self.expect_ident()?;
        if self.lex.next_token()? == Token::Op(Operator::LParen) {
            self.lex.putback();
            return self.scan_func(name, ty);
        }
        self.lex.putback();
        if ty == Type::Void {
            return Err(self.err(ErrorCode::TypeExpected));
        }
        let first = self.vars.globals().len();
        loop {
            let mut init = None;
            let mut val = Val { ty, num: 0 };
            let mut t = self.lex.next_token()?;
            if t == Token::Op(Operator::Assign) {
                init = Some(self.lex.pos());
                val = self.eval_assign()?.coerce(ty);
                t = self.lex.next_token()?;
            }
            let global = Global {
                name,
                ty,
                val,
                init,
                comment: None,
            };
            self.vars
                .add_global(self.lex.src(), global)
                .map_err(|c| self.err(c))?;
            match t {
                Token::Op(Operator::Comma) => name = self.expect_ident()?,
                Token::Op(Operator::Semicolon) => break,
                _ => return Err(self.err(ErrorCode::SemiExpected)),
            }
        }
        // A `//` comment after the semicolon is the metadata the host
        // shows for these variables.
        if let Some(span) = self.lex.line_comment_here() {
            for index in first..self.vars.globals().len() {
                if let Some(g) = self.vars.global_mut(index) {
                    g.comment = Some(span.clone());
                }
            }
        }
        Ok(())
    }

    /// Record a function's entry point and skip its body.
    fn scan_func(&mut self, name: Span, ret: Type) -> Result<()> {
        let entry = self.lex.pos();
        {
            let src = self.lex.src();
            let n = &src[name.clone()];
            if self.funcs.iter().any(|f| &src[f.name.clone()] == n) {
                return Err(self.lex.error(ErrorCode::DuplicateFunction));
            }
        }
        self.funcs.push(Func { name, entry, ret });
        self.skip_paren_group()?;
        self.expect_block_open()?;
        self.skip_block_rest()
    }

    /// Second pass: run `main()`. On failure, partial output is
    /// replaced by the error report.
    pub fn execute(&mut self) -> bool {
        match self.run() {
            Ok(()) => true,
            Err(e) => {
                self.out.force(&e.to_string());
                false
            }
        }
    }

    fn run(&mut self) -> Result<()> {
        let main = {
            let src = self.lex.src();
            self.funcs
                .iter()
                .position(|f| &src[f.name.clone()] == "main")
        };
        let main = match main {
            Some(index) => index,
            None => return Err(Error::new(ErrorCode::MainMissing)),
        };
        self.vars.reset_execution();
        self.out.reset();
        self.call_with_args(main, vec![])?;
        if self.out.overflowed() {
            return Err(Error::new(ErrorCode::OutputOverflow));
        }
        Ok(())
    }

    pub fn global_count(&self) -> usize {
        self.vars.globals().len()
    }

    pub fn global_name(&self, index: usize) -> Option<&str> {
        self.vars
            .globals()
            .get(index)
            .map(|g| &self.lex.src()[g.name.clone()])
    }

    pub fn global_value(&self, index: usize) -> Option<i32> {
        self.vars.globals().get(index).map(|g| g.val.num)
    }

    /// Store a host-supplied value, truncated to the global's declared
    /// type.
    pub fn set_global_value(&mut self, index: usize, value: i32) -> bool {
        match self.vars.global_mut(index) {
            Some(g) => {
                g.val = Val::int(value).coerce(g.ty);
                true
            }
            None => false,
        }
    }

    /// Re-evaluate the global's initializer expression, or zero it if
    /// the declaration had none.
    pub fn reset_global_value(&mut self, index: usize) -> bool {
        let (ty, init) = match self.vars.globals().get(index) {
            Some(g) => (g.ty, g.init),
            None => return false,
        };
        let val = match init {
            None => Val { ty, num: 0 },
            Some(pos) => {
                let saved = self.lex.pos();
                self.lex.set_pos(pos);
                let result = self.eval_assign();
                self.lex.set_pos(saved);
                match result {
                    Ok(v) => v.coerce(ty),
                    Err(_) => return false,
                }
            }
        };
        if let Some(g) = self.vars.global_mut(index) {
            g.val = val;
        }
        true
    }

    /// The metadata comment trailing the global's declaration, if any.
    /// See [`comment_field`] for its layout.
    pub fn global_comment(&self, index: usize) -> Option<&str> {
        let g = self.vars.globals().get(index)?;
        let span = g.comment.clone()?;
        Some(&self.lex.src()[span])
    }

    fn err(&self, code: ErrorCode) -> Error {
        self.lex.error(code)
    }

    /// Raise once the output buffer has overflowed; stops runaway
    /// printing loops.
    fn check_output(&self) -> Result<()> {
        if self.out.overflowed() {
            return Err(Error::new(ErrorCode::OutputOverflow));
        }
        Ok(())
    }

    fn expect_op(&mut self, op: Operator, code: ErrorCode) -> Result<()> {
        if self.lex.next_token()? == Token::Op(op) {
            Ok(())
        } else {
            Err(self.err(code))
        }
    }

    fn expect_kw(&mut self, kw: Keyword, code: ErrorCode) -> Result<()> {
        if self.lex.next_token()? == Token::Keyword(kw) {
            Ok(())
        } else {
            Err(self.err(code))
        }
    }

    fn expect_ident(&mut self) -> Result<Span> {
        if self.lex.next_token()? == Token::Ident {
            Ok(self.lex.span())
        } else {
            Err(self.err(ErrorCode::Syntax))
        }
    }

    fn expect_block_open(&mut self) -> Result<()> {
        if self.lex.next_token()? == Token::OpenBlock {
            Ok(())
        } else {
            Err(self.err(ErrorCode::BraceExpected))
        }
    }

    /// Materialize a string value back into text, processing `\`
    /// escapes. The value's cell must point just past an opening quote
    /// in the source buffer.
    fn resolve_str(&self, val: Val) -> Result<String> {
        if val.ty != Type::Str || val.num < 0 {
            return Err(self.err(ErrorCode::NotAString));
        }
        let src = self.lex.src();
        let at = val.num as usize;
        if at == 0 || at > src.len() || src.as_bytes()[at - 1] != b'"' {
            return Err(self.err(ErrorCode::NotAString));
        }
        let mut s = String::new();
        let mut chars = src[at..].chars();
        loop {
            match chars.next() {
                Some('"') => return Ok(s),
                Some('\\') => match chars.next() {
                    Some('n') => s.push('\n'),
                    Some(c) => s.push(c),
                    None => return Err(self.err(ErrorCode::QuoteExpected)),
                },
                Some(c) => s.push(c),
                None => return Err(self.err(ErrorCode::QuoteExpected)),
            }
        }
    }
}

/// One field of a global's metadata comment. Fields are separated by
/// `;` in the order description, units, scaler, minimum, maximum.
/// Whitespace around a field is not significant; a missing or empty
/// field is `None`.
pub fn comment_field(comment: &str, index: usize) -> Option<&str> {
    comment
        .split(';')
        .nth(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// A numeric metadata field, such as the scaler or a range bound.
pub fn comment_field_int(comment: &str, index: usize) -> Option<i32> {
    comment_field(comment, index)?.parse().ok()
}
