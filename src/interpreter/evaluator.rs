use chumsky::Parser;

use super::error::EvalError;
use super::parser::TokenParser;
use crate::ast::{Expr, ExprKind, Operator, Program};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::value::Value;

/// Reduces a parsed program to a single value. Semantic faults come
/// back as `Value::Error`, never as panics; the fold stops at the
/// first of them.
pub fn eval(program: &Program) -> Value {
    fold_form(&program.op, &program.args).into()
}

fn eval_expr(expr: &Expr) -> Result<i64, EvalError> {
    match &expr.kind {
        // The lexer only guarantees lexical shape; the range check
        // happens here, at the leaf.
        ExprKind::Number(text) => text.parse::<i64>().map_err(|_| EvalError::BadNumber),
        ExprKind::Form { op, args } => fold_form(op, args),
    }
}

/// Left-to-right fold: the first operand seeds the accumulator, each
/// remaining operand is folded in through the operator. `?` carries
/// the short-circuit: once an operand errors, later siblings are not
/// evaluated.
fn fold_form(op: &Operator, args: &[Expr]) -> Result<i64, EvalError> {
    let (first, rest) = match args.split_first() {
        Some(parts) => parts,
        // The parser never produces an empty form
        None => return Err(EvalError::BadOperator),
    };

    let mut acc = eval_expr(first)?;
    for arg in rest {
        acc = apply_op(acc, &op.text, eval_expr(arg)?)?;
    }
    Ok(acc)
}

fn apply_op(x: i64, op: &str, y: i64) -> Result<i64, EvalError> {
    match op {
        // Wrapping keeps native-width semantics without a debug-build
        // panic on overflow
        "+" => Ok(x.wrapping_add(y)),
        "-" => Ok(x.wrapping_sub(y)),
        "*" => Ok(x.wrapping_mul(y)),
        "/" => {
            if y == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(x.wrapping_div(y))
            }
        }
        "%" => {
            // Remainder by zero is the same fault as division by zero
            if y == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(x.wrapping_rem(y))
            }
        }
        "^" => pow(x, y),
        "min" => Ok(x.min(y)),
        "max" => Ok(x.max(y)),
        // The grammar never hands evaluation an unknown operator, but
        // dispatch does not rely on that
        _ => Err(EvalError::BadOperator),
    }
}

/// Integer exponentiation by squaring. Overflow is an invalid-number
/// fault. A negative exponent truncates toward zero: only bases of
/// magnitude one survive, and `0` raised to a negative power is a
/// division by zero.
fn pow(base: i64, exp: i64) -> Result<i64, EvalError> {
    if exp < 0 {
        return match base {
            0 => Err(EvalError::DivisionByZero),
            1 => Ok(1),
            -1 => Ok(if exp % 2 == 0 { 1 } else { -1 }),
            _ => Ok(0),
        };
    }
    match base {
        0 => return Ok(if exp == 0 { 1 } else { 0 }),
        1 => return Ok(1),
        -1 => return Ok(if exp % 2 == 0 { 1 } else { -1 }),
        _ => {}
    }
    let exp = u32::try_from(exp).map_err(|_| EvalError::BadNumber)?;
    base.checked_pow(exp).ok_or(EvalError::BadNumber)
}

/// Parses a line and evaluates it. A semantic fault is an `Ok` value
/// (it renders as `Error: ...`); only syntax failures are `Err`.
pub fn parse_and_eval(line: &str) -> Result<Value, String> {
    let tokens = match crate::lexer::lexer().parse(line).into_output() {
        Some(tokens) => tokens,
        None => return Err("unrecognized token in input".to_string()),
    };

    let mut parser = TokenParser::from_lexer_output(tokens, line.len());
    let program = parser.parse_program().map_err(|e| e.to_string())?;

    Ok(eval(&program))
}

/// Like `parse_and_eval`, but syntax failures come back as renderable
/// diagnostics with spans.
pub fn parse_and_eval_with_diagnostics(line: &str) -> Result<Value, Vec<Diagnostic>> {
    let tokens = match crate::lexer::lexer().parse(line).into_result() {
        Ok(tokens) => tokens,
        Err(errors) => {
            let diagnostics = errors
                .iter()
                .map(|error| {
                    let span = error.span();
                    Diagnostic::error("unrecognized token")
                        .with_code("E0001")
                        .with_label(Label::primary(
                            Span::new(span.start, span.end),
                            "not a number, operator, or parenthesis",
                        ))
                })
                .collect();
            return Err(diagnostics);
        }
    };

    let mut parser = TokenParser::from_lexer_output(tokens, line.len());
    let program = parser
        .parse_program()
        .map_err(|e| vec![e.to_diagnostic()])?;

    Ok(eval(&program))
}
