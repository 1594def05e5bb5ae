use std::rc::Rc;

use crate::ast::{Expr, ExprKind, Operator, Program};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::lexer::Token;

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: Vec::new(),
            found: None,
        }
    }

    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string())
            .with_code("E0101")
            .with_label(Label::primary(self.span, ""));

        if self.expected.len() == 1 {
            diag = diag.with_help(format!("expected {} here", self.expected[0]));
        }

        diag
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.expected.is_empty() {
            write!(f, "{}", self.message)?;
        } else {
            write!(f, "{}: expected {}", self.message, self.expected.join(" or "))?;
            if let Some(found) = &self.found {
                write!(f, ", found {}", found)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Recursive-descent parser over the lexer's token stream. One line in,
/// one `Program` out; the first grammar mismatch stops the parse.
pub struct TokenParser {
    tokens: Vec<SpannedToken>,
    current: usize,
    source_len: usize,
}

impl TokenParser {
    pub fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            current: 0,
            source_len,
        }
    }

    pub fn from_lexer_output(
        tokens: Vec<(Token, chumsky::span::SimpleSpan)>,
        source_len: usize,
    ) -> Self {
        let spanned_tokens: Vec<SpannedToken> = tokens
            .into_iter()
            .map(|(token, span)| SpannedToken {
                token,
                span: Span::new(span.start, span.end),
            })
            .collect();
        Self::new(spanned_tokens, source_len)
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|st| &st.token)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|st| st.span)
            .unwrap_or_else(|| Span::new(self.source_len, self.source_len))
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        if self.current < self.tokens.len() {
            let st = self.tokens[self.current].clone();
            self.current += 1;
            Some(st)
        } else {
            None
        }
    }

    fn end_of_input(&self, expected: Vec<String>) -> ParseError {
        ParseError::new("unexpected end of input", self.current_span()).with_expected(expected)
    }

    /// Parse the whole line as `operator expr+`. Consumes every token;
    /// anything left over that cannot start an expression is an error.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let op = self.parse_operator()?;
        let mut args = vec![self.parse_expr()?];
        while self.current_token().is_some() {
            args.push(self.parse_expr()?);
        }

        let span = args
            .iter()
            .fold(op.span, |span, arg| span.merge(arg.span));
        Ok(Program { op, args, span })
    }

    fn parse_operator(&mut self) -> Result<Operator, ParseError> {
        let span = self.current_span();
        let text: Rc<str> = match self.current_token() {
            Some(Token::Plus) => Rc::from("+"),
            Some(Token::Minus) => Rc::from("-"),
            Some(Token::Star) => Rc::from("*"),
            Some(Token::Slash) => Rc::from("/"),
            Some(Token::Percent) => Rc::from("%"),
            Some(Token::Caret) => Rc::from("^"),
            Some(Token::Min) => Rc::from("min"),
            Some(Token::Max) => Rc::from("max"),
            Some(token) => {
                return Err(ParseError::new("unexpected token", span)
                    .with_expected(vec!["an operator".to_string()])
                    .with_found(token.describe()));
            }
            None => return Err(self.end_of_input(vec!["an operator".to_string()])),
        };
        self.advance();
        Ok(Operator::new(text, span))
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        match self.current_token() {
            Some(Token::Number(text)) => {
                let text: Rc<str> = Rc::from(text.as_str());
                let span = self.current_span();
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Number(text),
                    span,
                })
            }
            Some(Token::LParen) => {
                let open_span = self.current_span();
                self.advance();
                let op = self.parse_operator()?;
                let mut args = vec![self.parse_expr()?];
                loop {
                    match self.current_token() {
                        Some(Token::RParen) => {
                            let close_span = self.current_span();
                            self.advance();
                            return Ok(Expr {
                                kind: ExprKind::Form { op, args },
                                span: open_span.merge(close_span),
                            });
                        }
                        Some(_) => args.push(self.parse_expr()?),
                        None => {
                            return Err(self.end_of_input(vec!["`)`".to_string()]));
                        }
                    }
                }
            }
            Some(token) => Err(ParseError::new("unexpected token", self.current_span())
                .with_expected(vec!["a number".to_string(), "`(`".to_string()])
                .with_found(token.describe())),
            None => Err(self.end_of_input(vec![
                "a number".to_string(),
                "`(`".to_string(),
            ])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chumsky::Parser as _;

    fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = crate::lexer::lexer()
            .parse(source)
            .output()
            .expect("Lexer failed")
            .clone();
        TokenParser::from_lexer_output(tokens, source.len()).parse_program()
    }

    fn number(expr: &Expr) -> &str {
        match &expr.kind {
            ExprKind::Number(text) => text,
            other => panic!("Expected number leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_flat_program() {
        let program = parse("+ 1 2 3").unwrap();
        assert_eq!(program.op.text.as_ref(), "+");
        assert_eq!(program.args.len(), 3);
        assert_eq!(number(&program.args[0]), "1");
        assert_eq!(number(&program.args[2]), "3");
    }

    #[test]
    fn test_single_operand_program() {
        let program = parse("- 5").unwrap();
        assert_eq!(program.op.text.as_ref(), "-");
        assert_eq!(program.args.len(), 1);
    }

    #[test]
    fn test_nested_form() {
        let program = parse("* 2 (+ 1 -3)").unwrap();
        assert_eq!(program.op.text.as_ref(), "*");
        assert_eq!(program.args.len(), 2);
        match &program.args[1].kind {
            ExprKind::Form { op, args } => {
                assert_eq!(op.text.as_ref(), "+");
                assert_eq!(args.len(), 2);
                assert_eq!(number(&args[1]), "-3");
            }
            other => panic!("Expected nested form, got {:?}", other),
        }
    }

    #[test]
    fn test_word_operators() {
        let program = parse("min 3 (max 1 2)").unwrap();
        assert_eq!(program.op.text.as_ref(), "min");
    }

    #[test]
    fn test_deep_nesting() {
        let program = parse("+ (+ (+ (+ 1 1) 1) 1) 1").unwrap();
        assert_eq!(program.args.len(), 2);
    }

    #[test]
    fn test_spans_cover_tokens() {
        let program = parse("+ 1 (* 2 3)").unwrap();
        assert_eq!(program.op.span, Span::new(0, 1));
        assert_eq!(program.args[1].span, Span::new(4, 11));
        assert_eq!(program.span, Span::new(0, 11));
    }

    #[test]
    fn test_parse_is_stateless() {
        let first = parse("+ 1 (* 2 3)").unwrap();
        let second = parse("+ 1 (* 2 3)").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_fails() {
        let err = parse("").unwrap_err();
        assert_eq!(err.message, "unexpected end of input");
        assert_eq!(err.expected, vec!["an operator".to_string()]);
    }

    #[test]
    fn test_operator_without_operand_fails() {
        let err = parse("+").unwrap_err();
        assert_eq!(err.message, "unexpected end of input");
    }

    #[test]
    fn test_bare_number_fails() {
        let err = parse("42").unwrap_err();
        assert_eq!(err.expected, vec!["an operator".to_string()]);
        assert_eq!(err.found.as_deref(), Some("number `42`"));
    }

    #[test]
    fn test_unknown_word_fails() {
        let err = parse("avg 1 2").unwrap_err();
        assert_eq!(err.found.as_deref(), Some("`avg`"));
    }

    #[test]
    fn test_unbalanced_open_paren_fails() {
        let err = parse("+ 1 (* 2 3").unwrap_err();
        assert_eq!(err.expected, vec!["`)`".to_string()]);
        // The error points just past the end of the line
        assert_eq!(err.span, Span::new(10, 10));
    }

    #[test]
    fn test_parenthesized_top_level_fails() {
        // The outermost form omits parentheses, so a wrapped program is
        // rejected at the `(` itself.
        let err = parse("(+ 1 2)").unwrap_err();
        assert_eq!(err.expected, vec!["an operator".to_string()]);
        assert_eq!(err.found.as_deref(), Some("`(`"));
    }

    #[test]
    fn test_trailing_close_paren_fails() {
        let err = parse("+ 1 2)").unwrap_err();
        assert_eq!(err.found.as_deref(), Some("`)`"));
    }

    #[test]
    fn test_empty_form_fails() {
        assert!(parse("+ 1 ()").is_err());
    }

    #[test]
    fn test_form_missing_operand_fails() {
        assert!(parse("+ 1 (*)").is_err());
    }

    #[test]
    fn test_error_display() {
        let err = parse("42").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected token: expected an operator, found number `42`"
        );
    }

    #[test]
    fn test_error_to_diagnostic() {
        let err = parse("+ 1 2)").unwrap_err();
        let diag = err.to_diagnostic();
        assert_eq!(diag.code.as_deref(), Some("E0101"));
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.labels[0].span, Span::new(5, 6));
    }
}
