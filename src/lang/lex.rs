use super::{Error, ErrorCode, Keyword, Operator, Span, Token};

type Result<T> = std::result::Result<T, Error>;

/// Cursor-based lexer over an immutable source buffer.
///
/// `next_token` classifies one token and remembers its span; `putback`
/// rewinds the cursor to the saved start of the current token so the
/// next call reproduces it. The statement interpreter also moves the
/// cursor directly with `set_pos` when loops re-evaluate a condition.
pub struct Lexer {
    src: String,
    pos: usize,
    start: usize,
    span: Span,
}

impl Default for Lexer {
    fn default() -> Lexer {
        Lexer::new()
    }
}

impl Lexer {
    pub fn new() -> Lexer {
        Lexer {
            src: String::new(),
            pos: 0,
            start: 0,
            span: 0..0,
        }
    }

    /// Install a new source buffer and rewind.
    pub fn load(&mut self, src: &str) {
        self.src = src.to_string();
        self.set_pos(0);
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// Cursor position just past the current token.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
        self.start = pos;
        self.span = pos..pos;
    }

    /// Span of the current token.
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    /// Text of the current token.
    pub fn text(&self) -> &str {
        &self.src[self.span.clone()]
    }

    /// Re-wind so the current token is produced again. Never called
    /// twice without an intervening `next_token`.
    pub fn putback(&mut self) {
        self.pos = self.start;
    }

    /// Build an error located at the current token.
    pub fn error(&self, code: ErrorCode) -> Error {
        let at = self.start.min(self.src.len());
        let line = self.src[..at].matches('\n').count() + 1;
        let begin = match self.src[..at].rfind('\n') {
            Some(n) => n + 1,
            None => 0,
        };
        let end = match self.src[at..].find('\n') {
            Some(n) => at + n,
            None => self.src.len(),
        };
        Error::new(code)
            .in_line(line)
            .with_text(self.src[begin..end].trim_end())
    }

    /// The `//` comment following the cursor on the current line, if
    /// any. Used by prescan to capture global-variable metadata; does
    /// not move the cursor.
    pub fn line_comment_here(&self) -> Option<Span> {
        let bytes = self.src.as_bytes();
        let mut at = self.pos;
        while at < bytes.len() && (bytes[at] == b' ' || bytes[at] == b'\t') {
            at += 1;
        }
        if !self.src[at..].starts_with("//") {
            return None;
        }
        let begin = at + 2;
        let end = match self.src[begin..].find('\n') {
            Some(n) => begin + n,
            None => self.src.len(),
        };
        Some(begin..end)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_blanks(&mut self) {
        let bytes = self.src.as_bytes();
        loop {
            match self.peek_byte() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => self.pos += 1,
                Some(b'/') => match bytes.get(self.pos + 1) {
                    Some(b'/') => {
                        while self.peek_byte().map_or(false, |b| b != b'\n') {
                            self.pos += 1;
                        }
                    }
                    Some(b'*') => {
                        self.pos += 2;
                        // An unterminated block comment swallows the
                        // rest of the buffer.
                        while self.pos < bytes.len() {
                            if self.src[self.pos..].starts_with("*/") {
                                self.pos += 2;
                                break;
                            }
                            self.pos += 1;
                        }
                    }
                    _ => return,
                },
                _ => return,
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_blanks();
        self.start = self.pos;
        let b = match self.peek_byte() {
            Some(b) => b,
            None => {
                let at = self.src.len();
                self.span = at..at;
                return Ok(Token::Eof);
            }
        };
        if b == b'"' {
            self.string()
        } else if b == b'\'' {
            self.char_literal()
        } else if b.is_ascii_digit() {
            self.number()
        } else if b.is_ascii_alphabetic() {
            Ok(self.word())
        } else {
            self.operator()
        }
    }

    fn string(&mut self) -> Result<Token> {
        self.pos += 1;
        let begin = self.pos;
        loop {
            match self.peek_byte() {
                Some(b'"') => {
                    self.span = begin..self.pos;
                    self.pos += 1;
                    return Ok(Token::Str);
                }
                Some(b'\\') => self.pos += 2,
                None | Some(b'\n') => return Err(self.error(ErrorCode::QuoteExpected)),
                Some(_) => self.pos += 1,
            }
        }
    }

    fn char_literal(&mut self) -> Result<Token> {
        self.pos += 1;
        let c = match self.peek_byte() {
            Some(b'\\') => {
                self.pos += 1;
                match self.peek_byte() {
                    Some(b'n') => b'\n',
                    _ => return Err(self.error(ErrorCode::Syntax)),
                }
            }
            Some(c) if c != b'\'' && c != b'\n' => c,
            _ => return Err(self.error(ErrorCode::Syntax)),
        };
        self.pos += 1;
        if self.peek_byte() != Some(b'\'') {
            return Err(self.error(ErrorCode::QuoteExpected));
        }
        self.pos += 1;
        self.span = self.start..self.pos;
        Ok(Token::CharLit(i32::from(c)))
    }

    fn number(&mut self) -> Result<Token> {
        while self.peek_byte().map_or(false, |b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.span = self.start..self.pos;
        match self.text().parse::<i32>() {
            Ok(n) => Ok(Token::Number(n)),
            Err(_) => Err(self.error(ErrorCode::TokenTooLong)),
        }
    }

    fn word(&mut self) -> Token {
        while self
            .peek_byte()
            .map_or(false, |b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }
        self.span = self.start..self.pos;
        match Keyword::from_str(self.text()) {
            Some(k) => Token::Keyword(k),
            None => Token::Ident,
        }
    }

    fn operator(&mut self) -> Result<Token> {
        use Operator::*;
        let bytes = self.src.as_bytes();
        let two = match bytes.get(self.pos + 1) {
            Some(b1) => match (bytes[self.pos], *b1) {
                (b'=', b'=') => Some(Equal),
                (b'!', b'=') => Some(NotEqual),
                (b'<', b'=') => Some(LessEqual),
                (b'>', b'=') => Some(GreaterEqual),
                (b'<', b'<') => Some(ShiftLeft),
                (b'>', b'>') => Some(ShiftRight),
                (b'+', b'+') => Some(Inc),
                (b'-', b'-') => Some(Dec),
                (b'+', b'=') => Some(PlusAssign),
                (b'-', b'=') => Some(MinusAssign),
                (b'*', b'=') => Some(MulAssign),
                (b'/', b'=') => Some(DivAssign),
                (b'%', b'=') => Some(ModAssign),
                (b'&', b'&') => Some(And),
                (b'|', b'|') => Some(Or),
                _ => None,
            },
            None => None,
        };
        if let Some(op) = two {
            self.pos += 2;
            self.span = self.start..self.pos;
            return Ok(Token::Op(op));
        }
        let tok = match bytes[self.pos] {
            b'{' => Token::OpenBlock,
            b'}' => Token::CloseBlock,
            b'!' => Token::Op(Not),
            b'+' => Token::Op(Plus),
            b'-' => Token::Op(Minus),
            b'*' => Token::Op(Multiply),
            b'/' => Token::Op(Divide),
            b'%' => Token::Op(Modulus),
            b'^' => Token::Op(Caret),
            b'=' => Token::Op(Assign),
            b'<' => Token::Op(Less),
            b'>' => Token::Op(Greater),
            b';' => Token::Op(Semicolon),
            b':' => Token::Op(Colon),
            b'(' => Token::Op(LParen),
            b')' => Token::Op(RParen),
            b',' => Token::Op(Comma),
            b'?' => Token::Op(Question),
            _ => return Err(self.error(ErrorCode::UndefinedToken)),
        };
        self.pos += 1;
        self.span = self.start..self.pos;
        Ok(tok)
    }
}
