/*!
# Language Module

Lexical analysis for the Little-C scripting language: tokens, the
cursor-based lexer, and the error type shared by every layer.

*/

mod error;
mod lex;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::Lexer;
pub use token::Keyword;
pub use token::Operator;
pub use token::Token;

/// Byte range of a token over the immutable source buffer.
pub type Span = std::ops::Range<usize>;
