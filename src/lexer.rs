use std::iter::Peekable;

use crate::token::{Span, Spanned, Token, TokenKind, KEYWORDS};

pub type LexError = Spanned<Error>;

/// Lexes the provided string into a new token buffer.
///
/// Whitespace is skipped and never produced. The first character that can't
/// start a token aborts the whole run.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(src).lex()
}

struct Lexer<'src> {
    src: &'src str,
    iter: Peekable<std::str::Chars<'src>>,
    cursor: usize,
    current_lo: usize,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    /// Scans the source string until the input is exhausted.
    fn lex(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            self.whitespace();
            if self.cursor == self.src.len() {
                break;
            }
            let next = self.scan_token_kind()?;
            self.produce(next);
        }
        Ok(self.tokens)
    }

    /// Tries to scan the current character.
    fn scan_token_kind(&mut self) -> Result<TokenKind, LexError> {
        use TokenKind::*;
        let kind = match self.mark_advance() {
            '(' => OpenParen,
            ')' => CloseParen,
            ',' => Comma,
            c if c.is_ascii_alphabetic() => self.identifier_or_keyword()?,
            c if c.is_ascii_digit() => self.integer()?,
            c => return Err(self.span().wrap(Error::UnexpectedChar(c))),
        };
        Ok(kind)
    }

    /// Keywords take priority over identifiers, but only when the whole
    /// alphabetic run is the keyword (`define` is an identifier).
    fn identifier_or_keyword(&mut self) -> Result<TokenKind, LexError> {
        while self.peek().is_ascii_alphabetic() {
            self.advance();
        }
        self.word_boundary()?;
        let kind = KEYWORDS
            .get(self.substr())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        Ok(kind)
    }

    fn integer(&mut self) -> Result<TokenKind, LexError> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        self.word_boundary()?;
        Ok(TokenKind::Integer)
    }

    /// Identifiers and integers must end on a word boundary, so `x1`, `1x`
    /// and `x_` are rejected at their second run.
    fn word_boundary(&mut self) -> Result<(), LexError> {
        let next = self.peek();
        if next.is_ascii_alphanumeric() || next == '_' {
            self.mark_advance();
            return Err(self.span().wrap(Error::UnexpectedChar(next)));
        }
        Ok(())
    }

    /// Skips Unicode whitespace, vertical tab and no-break space included.
    fn whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.advance();
        }
    }
}

impl Lexer<'_> {
    /// Constructs a new lexer with the default state.
    fn new(src: &str) -> Lexer<'_> {
        Lexer {
            src,
            iter: src.chars().peekable(),
            cursor: 0,
            current_lo: 0,
            tokens: Vec::new(),
        }
    }

    /// Starts a new token "mark" and advances the iterator.
    fn mark_advance(&mut self) -> char {
        self.current_lo = self.cursor;
        self.advance()
    }

    /// Returns the next char and advances the iterator.
    fn advance(&mut self) -> char {
        self.iter
            .next()
            .inspect(|c| self.cursor += c.len_utf8())
            .unwrap_or('\0')
    }

    /// Returns the next char without advancing the iterator.
    fn peek(&mut self) -> char {
        self.iter.peek().copied().unwrap_or('\0')
    }

    /// Returns the current span.
    fn span(&self) -> Span {
        Span::new_of_bounds(self.current_lo..self.cursor)
    }

    /// Returns the substring of the current marked bounds.
    fn substr(&self) -> &str {
        self.span().substr(self.src)
    }

    /// Produces a token using the marked bounds.
    fn produce(&mut self, kind: TokenKind) {
        let span = self.span();
        let token = Token::new(kind, span.substr(self.src), span);
        self.tokens.push(token);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    UnexpectedChar(char),
}
