#![allow(clippy::items_after_statements)]

use std::fmt;

use crate::{lexer, parser, token::Spanned, Error};

impl fmt::Display for Spanned<lexer::Error> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Spanned { span, inner: error } = self;

        if f.alternate() {
            write!(f, "{span}: ")?;
        }

        match error {
            lexer::Error::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
        }
    }
}

impl fmt::Display for Spanned<parser::Error> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Spanned { span, inner: error } = self;

        if f.alternate() {
            write!(f, "{span}: ")?;
        }

        use parser::Error::*;
        match error {
            UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected:?}")
            }
            Unexpected {
                expected,
                actual,
                text,
            } => {
                write!(f, "expected token {expected:?}, but got {actual:?} {text:?}")
            }
            IntegerOutOfRange { text } => write!(f, "integer literal {text} out of range"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Forwards the formatter so that `{:#}` keeps printing the span.
        match self {
            Error::Lex(error) => fmt::Display::fmt(error, f),
            Error::Parse(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl std::error::Error for Spanned<lexer::Error> {}

impl std::error::Error for Spanned<parser::Error> {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lex(error) => Some(error),
            Error::Parse(error) => Some(error),
        }
    }
}
