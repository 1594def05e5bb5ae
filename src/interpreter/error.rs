use std::fmt;

/// Semantic faults found while evaluating a syntactically valid line.
/// These are ordinary results, not process failures: the shell prints
/// them and reads the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// Division or remainder with a zero right operand
    DivisionByZero,
    /// Operator text the evaluator does not implement
    BadOperator,
    /// Number literal outside the representable integer range, or a
    /// power whose result would not fit
    BadNumber,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero => write!(f, "Error: Division by zero!"),
            EvalError::BadOperator => write!(f, "Error: Invalid operator!"),
            EvalError::BadNumber => write!(f, "Error: Invalid number!"),
        }
    }
}

impl std::error::Error for EvalError {}
