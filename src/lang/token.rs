/// One classified token.
///
/// Tokens carry no text; the lexer reports the span of the current
/// token over the source buffer. Identifier and string tokens are
/// resolved back to text through that span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// End of input, distinct from every real token.
    Eof,
    Ident,
    Number(i32),
    CharLit(i32),
    /// String literal; the span covers the text between the quotes.
    Str,
    Keyword(Keyword),
    Op(Operator),
    /// `{` and `}` are classified apart from ordinary delimiters so
    /// statement parsing can count braces.
    OpenBlock,
    CloseBlock,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Keyword {
    Void,
    Char,
    Int,
    If,
    Else,
    For,
    Do,
    While,
    Switch,
    Case,
    Default,
    Return,
    Continue,
    Break,
}

impl Keyword {
    pub fn from_str(s: &str) -> Option<Keyword> {
        use Keyword::*;
        match s {
            "void" => Some(Void),
            "char" => Some(Char),
            "int" => Some(Int),
            "if" => Some(If),
            "else" => Some(Else),
            "for" => Some(For),
            "do" => Some(Do),
            "while" => Some(While),
            "switch" => Some(Switch),
            "case" => Some(Case),
            "default" => Some(Default),
            "return" => Some(Return),
            "continue" => Some(Continue),
            "break" => Some(Break),
            _ => None,
        }
    }

    pub fn is_type(self) -> bool {
        use Keyword::*;
        match self {
            Void | Char | Int => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Keyword::*;
        match self {
            Void => write!(f, "void"),
            Char => write!(f, "char"),
            Int => write!(f, "int"),
            If => write!(f, "if"),
            Else => write!(f, "else"),
            For => write!(f, "for"),
            Do => write!(f, "do"),
            While => write!(f, "while"),
            Switch => write!(f, "switch"),
            Case => write!(f, "case"),
            Default => write!(f, "default"),
            Return => write!(f, "return"),
            Continue => write!(f, "continue"),
            Break => write!(f, "break"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Assign,
    PlusAssign,
    MinusAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    Inc,
    Dec,
    And,
    Or,
    Not,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    Caret,
    Semicolon,
    Colon,
    LParen,
    RParen,
    Comma,
    Question,
}

impl Operator {
    /// Assignment and compound-assignment operators, the lookahead set
    /// tested after an identifier at the top of the expression grammar.
    pub fn is_assign(self) -> bool {
        use Operator::*;
        match self {
            Assign | PlusAssign | MinusAssign | MulAssign | DivAssign | ModAssign => true,
            _ => false,
        }
    }

    pub fn is_relational(self) -> bool {
        use Operator::*;
        match self {
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Assign => write!(f, "="),
            PlusAssign => write!(f, "+="),
            MinusAssign => write!(f, "-="),
            MulAssign => write!(f, "*="),
            DivAssign => write!(f, "/="),
            ModAssign => write!(f, "%="),
            Equal => write!(f, "=="),
            NotEqual => write!(f, "!="),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            ShiftLeft => write!(f, "<<"),
            ShiftRight => write!(f, ">>"),
            Inc => write!(f, "++"),
            Dec => write!(f, "--"),
            And => write!(f, "&&"),
            Or => write!(f, "||"),
            Not => write!(f, "!"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Modulus => write!(f, "%"),
            Caret => write!(f, "^"),
            Semicolon => write!(f, ";"),
            Colon => write!(f, ":"),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            Comma => write!(f, ","),
            Question => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table() {
        assert_eq!(Keyword::from_str("while"), Some(Keyword::While));
        assert_eq!(Keyword::from_str("WHILE"), None);
        assert_eq!(Keyword::from_str("whiles"), None);
        assert!(Keyword::Int.is_type());
        assert!(!Keyword::If.is_type());
    }

    #[test]
    fn test_operator_classes() {
        assert!(Operator::ModAssign.is_assign());
        assert!(!Operator::Equal.is_assign());
        assert!(Operator::LessEqual.is_relational());
        assert!(!Operator::And.is_relational());
    }
}
