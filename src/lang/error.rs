/// Fatal interpreter error.
///
/// Every failure in the lexer, evaluator, prescan and execute paths is
/// one of these. Errors raised while a source position is known carry
/// the 1-based line number and the text of the offending line; the
/// driver writes the formatted report into the output buffer in place
/// of program output.
#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line: usize,
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorCode {
    Syntax,
    UnbalancedParens,
    UnbalancedBraces,
    NoExpression,
    NotAVariable,
    UndefinedVariable,
    DuplicateVariable,
    DuplicateFunction,
    UndefinedFunction,
    TypeExpected,
    SemiExpected,
    ColonExpected,
    ParenExpected,
    BraceExpected,
    WhileExpected,
    QuoteExpected,
    NotAString,
    DivByZero,
    TooManyGlobals,
    TooManyLocals,
    TooManyCalls,
    ReturnWithoutCall,
    ParamCount,
    TokenTooLong,
    UndefinedToken,
    OutputOverflow,
    MainMissing,
    Interrupted,
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line: 0,
            text: String::new(),
        }
    }

    pub fn in_line(mut self, line: usize) -> Error {
        debug_assert_eq!(self.line, 0);
        self.line = line;
        self
    }

    pub fn with_text(mut self, text: &str) -> Error {
        debug_assert!(self.text.is_empty());
        self.text = text.to_string();
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorCode::*;
        let msg = match self.code {
            Syntax => "syntax error",
            UnbalancedParens => "unbalanced parentheses",
            UnbalancedBraces => "unbalanced braces",
            NoExpression => "no expression present",
            NotAVariable => "not a variable",
            UndefinedVariable => "undefined variable",
            DuplicateVariable => "duplicate global variable",
            DuplicateFunction => "duplicate function",
            UndefinedFunction => "undefined function",
            TypeExpected => "type specifier expected",
            SemiExpected => "semicolon expected",
            ColonExpected => "colon expected",
            ParenExpected => "parentheses expected",
            BraceExpected => "opening brace expected",
            WhileExpected => "while expected",
            QuoteExpected => "closing quote expected",
            NotAString => "not a string",
            DivByZero => "division by zero",
            TooManyGlobals => "too many global variables",
            TooManyLocals => "too many local variables",
            TooManyCalls => "too many nested calls",
            ReturnWithoutCall => "return without call",
            ParamCount => "parameter count mismatch",
            TokenTooLong => "token too long",
            UndefinedToken => "undefined token",
            OutputOverflow => "result doesn't fit",
            MainMissing => "main() missing",
            Interrupted => "interrupted",
        };
        if self.line == 0 {
            write!(f, "{}", msg)
        } else {
            write!(f, "{} in line {}\n{}", msg, self.line, self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        let e = Error::new(ErrorCode::DivByZero)
            .in_line(3)
            .with_text("a = 1 / 0;");
        assert_eq!(e.to_string(), "division by zero in line 3\na = 1 / 0;");
    }

    #[test]
    fn test_unlocated() {
        let e = Error::new(ErrorCode::OutputOverflow);
        assert_eq!(e.to_string(), "result doesn't fit");
    }
}
