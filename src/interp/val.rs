/// Declared type of a value or variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Type {
    Void,
    Char,
    Int,
    Str,
}

/// A tagged value: one integer cell plus a type tag.
///
/// All arithmetic operates on the integer cell regardless of tag and
/// keeps the left operand's tag; relational and logical results are
/// `int`; assignment truncates to the destination's declared type.
/// For `Str` the cell holds the byte offset of the literal's first
/// character in the source buffer, not text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Val {
    pub ty: Type,
    pub num: i32,
}

impl Val {
    pub const VOID: Val = Val {
        ty: Type::Void,
        num: 0,
    };

    pub fn int(num: i32) -> Val {
        Val { ty: Type::Int, num }
    }

    pub fn chr(num: i32) -> Val {
        Val {
            ty: Type::Char,
            num,
        }
    }

    pub fn str_at(offset: usize) -> Val {
        Val {
            ty: Type::Str,
            num: offset as i32,
        }
    }

    pub fn from_bool(b: bool) -> Val {
        Val::int(if b { 1 } else { 0 })
    }

    pub fn truthy(self) -> bool {
        self.num != 0
    }

    pub fn with_num(self, num: i32) -> Val {
        Val { ty: self.ty, num }
    }

    /// Truncate for storage into a variable of declared type `ty`.
    /// `char` keeps the low 8 bits, sign extended; `void` drops the
    /// value entirely.
    pub fn coerce(self, ty: Type) -> Val {
        let num = match ty {
            Type::Char => i32::from(self.num as i8),
            Type::Void => 0,
            Type::Int | Type::Str => self.num,
        };
        Val { ty, num }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_truncation() {
        assert_eq!(Val::int(300).coerce(Type::Char).num, 44);
        assert_eq!(Val::int(200).coerce(Type::Char).num, -56);
        assert_eq!(Val::int(-1).coerce(Type::Char).num, -1);
    }

    #[test]
    fn test_int_passthrough() {
        assert_eq!(Val::chr(65).coerce(Type::Int).num, 65);
        assert_eq!(Val::int(i32::max_value()).coerce(Type::Int).num, i32::max_value());
    }

    #[test]
    fn test_truthiness() {
        assert!(Val::int(-5).truthy());
        assert!(!Val::chr(0).truthy());
    }
}
