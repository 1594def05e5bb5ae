use std::fmt;

use crate::interpreter::error::EvalError;

/// The outcome of evaluating one line. Exactly one variant holds: a
/// semantic fault replaces the number entirely, it is never carried
/// alongside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Number(i64),
    Error(EvalError),
}

impl Value {
    pub fn as_number(&self) -> Option<i64> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_error(&self) -> Option<EvalError> {
        if let Value::Error(err) = self {
            Some(*err)
        } else {
            None
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl From<Result<i64, EvalError>> for Value {
    fn from(result: Result<i64, EvalError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(err) => Value::Error(err),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Error(err) => write!(f, "{}", err),
        }
    }
}
