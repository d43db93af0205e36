use std::collections::VecDeque;

use crate::{
    ast::{Definition, Expr},
    token::{Span, Spanned, Token, TokenKind},
};

pub type ParseError = Spanned<Error>;

type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Parses a whole definition. Tokens after the closing `end` are ignored.
pub fn parse(tokens: Vec<Token>) -> Result<Definition> {
    Parser::new(tokens).parse_definition()
}

/// Parses a single expression. Tokens after it are ignored.
pub fn parse_expr(tokens: Vec<Token>) -> Result<Expr> {
    Parser::new(tokens).parse_expr()
}

struct Parser {
    tokens: VecDeque<Token>,
    /// Where an "unexpected end of input" error points to.
    eof_span: Span,
}

impl Parser {
    fn parse_definition(&mut self) -> Result<Definition> {
        self.consume(TokenKind::Def)?;
        let name = self.parse_ident()?;
        let parameter_names = self.parse_params()?;
        let body = self.parse_expr()?;
        self.consume(TokenKind::End)?;

        Ok(Definition {
            name,
            parameter_names,
            body,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Box<str>>> {
        self.consume(TokenKind::OpenParen)?;
        let names = if self.is(TokenKind::Identifier) {
            self.parse_separated(TokenKind::Comma, Parser::parse_ident)?
        } else {
            Vec::new()
        };
        self.consume(TokenKind::CloseParen)?;
        Ok(names)
    }

    fn parse_ident(&mut self) -> Result<Box<str>> {
        let token = self.consume(TokenKind::Identifier)?;
        Ok(token.text)
    }

    /// Nested calls live on `open_calls`, not on the call stack, so deep
    /// nesting can't overflow it.
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut open_calls: Vec<(Box<str>, Vec<Expr>)> = Vec::new();
        loop {
            let mut done = if self.is(TokenKind::Integer) {
                self.parse_int()?
            } else if self.is(TokenKind::Identifier) && self.is_nth(1, TokenKind::OpenParen) {
                let name = self.parse_ident()?;
                self.consume(TokenKind::OpenParen)?;
                if !self.is(TokenKind::CloseParen) {
                    open_calls.push((name, Vec::new()));
                    continue;
                }
                self.consume(TokenKind::CloseParen)?;
                Expr::Call {
                    name,
                    args: Vec::new(),
                }
            } else {
                // Anything else must be a variable, and `consume` reports
                // otherwise.
                self.parse_var()?
            };

            // Closes every call whose last argument was just parsed.
            loop {
                let Some((name, mut args)) = open_calls.pop() else {
                    return Ok(done);
                };
                args.push(done);
                if self.take(TokenKind::Comma) {
                    open_calls.push((name, args));
                    break;
                }
                self.consume(TokenKind::CloseParen)?;
                done = Expr::Call { name, args };
            }
        }
    }

    fn parse_int(&mut self) -> Result<Expr> {
        let token = self.consume(TokenKind::Integer)?;
        let Ok(value) = token.text.parse::<i64>() else {
            let span = token.span();
            return Err(span.wrap(Error::IntegerOutOfRange { text: token.text }));
        };
        Ok(Expr::Int(value))
    }

    fn parse_var(&mut self) -> Result<Expr> {
        self.parse_ident().map(Expr::Var)
    }

    /// Parses `item (separator item)*`. Stops at the first token after an
    /// item which isn't the separator, without consuming it.
    fn parse_separated<T>(
        &mut self,
        separator: TokenKind,
        parse_item: impl Fn(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items = vec![parse_item(self)?];
        while self.take(separator) {
            items.push(parse_item(self)?);
        }
        Ok(items)
    }
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Parser {
        let eof_span = match tokens.last() {
            Some(last) => last.span().after(),
            None => Span::new_of_length(0, 0),
        };
        Parser {
            tokens: VecDeque::from(tokens),
            eof_span,
        }
    }

    /// Checks whether the current token matches the given one. Always false
    /// once the input is exhausted.
    fn is(&self, expect: TokenKind) -> bool {
        self.is_nth(0, expect)
    }

    /// Like [`Parser::is`], but looks `n` tokens ahead.
    fn is_nth(&self, n: usize, expect: TokenKind) -> bool {
        self.tokens.get(n).is_some_and(|token| token.is(expect))
    }

    /// Advances if the current token matches the provided one, returning true.
    /// If not, returns false and doesn't advance.
    fn take(&mut self, expect: TokenKind) -> bool {
        if self.is(expect) {
            self.tokens.pop_front();
            true
        } else {
            false
        }
    }

    /// Pops the current token, failing if it doesn't match the provided one.
    ///
    /// The token is popped even on a mismatch; errors are never recovered
    /// from.
    fn consume(&mut self, expected: TokenKind) -> Result<Token> {
        let Some(token) = self.tokens.pop_front() else {
            return Err(self.eof_span.wrap(Error::UnexpectedEof { expected }));
        };
        if token.is(expected) {
            Ok(token)
        } else {
            let span = token.span();
            Err(span.wrap(Error::Unexpected {
                expected,
                actual: token.kind,
                text: token.text,
            }))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    UnexpectedEof {
        expected: TokenKind,
    },
    Unexpected {
        expected: TokenKind,
        actual: TokenKind,
        text: Box<str>,
    },
    /// An integer literal which doesn't fit in an `i64`.
    IntegerOutOfRange {
        text: Box<str>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::test_utils::{call, def, var},
        lexer::tokenize,
        util::test_utils::tree_tests,
    };
    use pretty_assertions::assert_eq;

    fn parse_str(src: &str) -> Result<Definition> {
        parse(tokenize(src).unwrap())
    }

    #[test]
    fn test_integer_body() {
        let parsed = parse_str("def f() 1 end").unwrap();
        assert_eq!(parsed, def("f", &[], Expr::Int(1)));
    }

    #[test]
    fn test_call_body() {
        let parsed = parse_str("def add(a, b) add(a,b) end").unwrap();
        let body = call("add", [var("a"), var("b")]);
        assert_eq!(parsed, def("add", &["a", "b"], body));
    }

    #[test]
    fn test_variable_body() {
        let parsed = parse_str("def g(x) x end").unwrap();
        assert_eq!(parsed, def("g", &["x"], var("x")));
    }

    #[test]
    fn test_duplicate_parameters_are_accepted() {
        let parsed = parse_str("def f(a, a) b end").unwrap();
        assert_eq!(parsed, def("f", &["a", "a"], var("b")));
    }

    #[test]
    fn test_trailing_tokens_are_ignored() {
        let parsed = parse_str("def f() 1 end end def ) 2").unwrap();
        assert_eq!(parsed, def("f", &[], Expr::Int(1)));
    }

    #[test]
    fn test_deeply_nested_calls() {
        const DEPTH: usize = 100_000;
        let src = format!("{}x{}", "g(".repeat(DEPTH), ")".repeat(DEPTH));
        let mut expr = parse_expr(tokenize(&src).unwrap()).unwrap();

        let mut depth = 0;
        while let Expr::Call { name, args } = &mut expr {
            assert_eq!(&**name, "g");
            assert_eq!(args.len(), 1);
            let inner = args.pop().unwrap();
            expr = inner;
            depth += 1;
        }
        assert_eq!(depth, DEPTH);
        assert_eq!(expr, var("x"));
    }

    #[test]
    fn test_deeply_nested_unclosed_call() {
        const DEPTH: usize = 100_000;
        let src = format!("def f() {}1 end", "g(".repeat(DEPTH));
        let error = parse_str(&src).unwrap_err();
        let end_lo = src.len() - 3;
        assert_eq!(
            error,
            Span::new_of_bounds(end_lo..src.len()).wrap(Error::Unexpected {
                expected: TokenKind::CloseParen,
                actual: TokenKind::End,
                text: "end".into(),
            })
        );
    }

    #[test]
    fn test_identifier_as_last_token_is_variable() {
        let parsed = parse_expr(tokenize("x").unwrap()).unwrap();
        assert_eq!(parsed, var("x"));

        let parsed = parse_expr(tokenize("f(x, y").unwrap());
        assert_eq!(
            parsed.unwrap_err(),
            Span::new_of_bounds(6..6).wrap(Error::UnexpectedEof {
                expected: TokenKind::CloseParen
            })
        );
    }

    #[test]
    fn test_missing_body() {
        let error = parse_str("def h()").unwrap_err();
        assert_eq!(
            error,
            Span::new_of_bounds(7..7).wrap(Error::UnexpectedEof {
                expected: TokenKind::Identifier
            })
        );
    }

    #[test]
    fn test_unmatched_param_paren() {
        let error = parse_str("def h(a end").unwrap_err();
        assert_eq!(
            error,
            Span::new_of_bounds(8..11).wrap(Error::Unexpected {
                expected: TokenKind::CloseParen,
                actual: TokenKind::End,
                text: "end".into(),
            })
        );
    }

    #[test]
    fn test_empty_input() {
        let error = parse(Vec::new()).unwrap_err();
        assert_eq!(
            error,
            Span::new_of_length(0, 0).wrap(Error::UnexpectedEof {
                expected: TokenKind::Def
            })
        );
    }

    #[test]
    fn test_names_round_trip() {
        let cases: &[(&str, &str, &[&str])] = &[
            ("def f() 1 end", "f", &[]),
            ("def main(argc, argv) argc end", "main", &["argc", "argv"]),
            ("def  x ( y ,z,w ) q end", "x", &["y", "z", "w"]),
            ("def endless(defined) defined end", "endless", &["defined"]),
        ];
        for &(src, name, params) in cases {
            let parsed = parse_str(src).unwrap();
            assert_eq!(&*parsed.name, name);
            let parsed_params: Vec<&str> = parsed.parameter_names.iter().map(|p| &**p).collect();
            assert_eq!(parsed_params, params);
        }
    }

    tree_tests!(
        use parser;

        fn test_simple_definition() {
            let program = "def f() 1 end";
            let tree_ok = "
                definition f()
                  int 1
            ";
        }

        fn test_definition_with_params() {
            let program = "def add(a, b) add(a,b) end";
            let tree_ok = "
                definition add(a, b)
                  call add
                    var a
                    var b
            ";
        }

        fn test_nested_calls() {
            let program = "
                def compute(x, y)
                    outer(inner(x, 1), y, nothing(), 42)
                end
            ";
            let tree_ok = "
                definition compute(x, y)
                  call outer
                    call inner
                      var x
                      int 1
                    var y
                    call nothing
                    int 42
            ";
        }

        fn test_leading_zeros_literal() {
            let expr = "007";
            let tree_ok = "int 7";
        }

        fn test_max_literal() {
            let expr = "9223372036854775807";
            let tree_ok = "int 9223372036854775807";
        }

        fn test_call_without_args() {
            let expr = "f()";
            let tree_ok = "call f";
        }

        fn test_variable_followed_by_comma() {
            let expr = "x, y";
            let tree_ok = "var x";
        }

        fn test_error_missing_body() {
            let program = "def h()";
            let expected_errors = &["7..7: unexpected end of input, expected Identifier"];
        }

        fn test_error_unmatched_param_paren() {
            let program = "def h(a end";
            let expected_errors = &[r#"8..11: expected token CloseParen, but got End "end""#];
        }

        fn test_error_missing_end() {
            let program = "def h() 1 2";
            let expected_errors = &[r#"10..11: expected token End, but got Integer "2""#];
        }

        fn test_error_missing_name() {
            let program = "def (a) a end";
            let expected_errors = &[r#"4..5: expected token Identifier, but got OpenParen "(""#];
        }

        fn test_error_keyword_as_param() {
            let program = "def f(a, end) a end";
            let expected_errors = &[r#"9..12: expected token Identifier, but got End "end""#];
        }

        fn test_error_integer_param() {
            let program = "def f(1) a end";
            let expected_errors = &[r#"6..7: expected token CloseParen, but got Integer "1""#];
        }

        fn test_error_body_is_not_an_expression() {
            let program = "def f() ) end";
            let expected_errors = &[r#"8..9: expected token Identifier, but got CloseParen ")""#];
        }

        fn test_error_trailing_comma_in_args() {
            let program = "def f() g(1,) end";
            let expected_errors = &[r#"12..13: expected token Identifier, but got CloseParen ")""#];
        }

        fn test_error_leading_comma_in_args() {
            let expr = "g(,1)";
            let expected_errors = &[r#"2..3: expected token Identifier, but got Comma ",""#];
        }

        fn test_error_unclosed_args() {
            let program = "def f() g(1 end";
            let expected_errors = &[r#"12..15: expected token CloseParen, but got End "end""#];
        }

        fn test_error_integer_out_of_range() {
            let expr = "9223372036854775808";
            let expected_errors = &["0..19: integer literal 9223372036854775808 out of range"];
        }

        fn test_error_lexer_unexpected_char() {
            let program = "def h() @ end";
            let expected_errors = &["8..9: unexpected character '@'"];
        }

        fn test_error_empty_program() {
            let program = "   \n\t  ";
            let expected_errors = &["0..0: unexpected end of input, expected Def"];
        }
    );
}
