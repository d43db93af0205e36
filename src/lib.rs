/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into an AST.
pub mod parser;

/// The code generator takes an AST, rendering it in the target syntax.
pub mod codegen;

pub mod ast;
pub mod token;

pub mod util {
    pub mod fmt;
    #[cfg(test)]
    pub(crate) mod test_utils;
}

use crate::{lexer::LexError, parser::ParseError};

/// Runs the whole pipeline over the provided source.
pub fn compile(src: &str) -> Result<String, Error> {
    let tokens = lexer::tokenize(src)?;
    let definition = parser::parse(tokens)?;
    Ok(codegen::generate(&definition))
}

/// A failure of any pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
}

impl From<LexError> for Error {
    fn from(error: LexError) -> Self {
        Error::Lex(error)
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Error::Parse(error)
    }
}
