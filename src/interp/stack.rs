use crate::lang::ErrorCode;

type Result<T> = std::result::Result<T, ErrorCode>;

/// ## Capacity enforced stack
///
/// Index-addressed storage for the local-variable zone and the call
/// stack. Exceeding the fixed capacity is a typed error, never silent
/// growth; callers attach the source position when they report it.
#[derive(Debug)]
pub struct Stack<T> {
    overflow_code: ErrorCode,
    limit: usize,
    vec: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new(limit: usize, overflow_code: ErrorCode) -> Stack<T> {
        Stack {
            overflow_code,
            limit,
            vec: vec![],
        }
    }

    pub fn clear(&mut self) {
        self.vec.clear()
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn last(&self) -> Option<&T> {
        self.vec.last()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.vec.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.vec.get_mut(index)
    }

    pub fn push(&mut self, val: T) -> Result<()> {
        if self.vec.len() >= self.limit {
            return Err(self.overflow_code);
        }
        self.vec.push(val);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.vec.pop()
    }

    pub fn truncate(&mut self, len: usize) {
        debug_assert!(len <= self.vec.len());
        self.vec.truncate(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_is_typed() {
        let mut s = Stack::new(2, ErrorCode::TooManyLocals);
        assert!(s.push(1).is_ok());
        assert!(s.push(2).is_ok());
        assert_eq!(s.push(3), Err(ErrorCode::TooManyLocals));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_truncate_restores_frame() {
        let mut s = Stack::new(8, ErrorCode::TooManyLocals);
        for n in 0..5 {
            s.push(n).unwrap();
        }
        s.truncate(2);
        assert_eq!(s.len(), 2);
        assert_eq!(s.last(), Some(&1));
    }
}
