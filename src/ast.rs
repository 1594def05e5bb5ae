use std::rc::Rc;

use crate::diagnostic::Span;

/// An operator as written in the source. The text is kept verbatim so
/// evaluation dispatches on it rather than trusting the grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub text: Rc<str>,
    pub span: Span,
}

impl Operator {
    pub fn new(text: impl Into<Rc<str>>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Number literal, raw text as written. The lexer guarantees the
    /// shape (optional `-`, digits); the range is checked at evaluation.
    Number(Rc<str>),
    /// Parenthesized form: `( operator expr+ )`
    Form { op: Operator, args: Vec<Expr> },
}

/// Top level of a line: `operator expr+` with no wrapping parentheses,
/// covering the entire input. Children are in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub op: Operator,
    pub args: Vec<Expr>,
    pub span: Span,
}
