use thiserror::Error;

/// Errors that can occur when compiling a filter AST
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Invalid operator: {0}.")]
    InvalidOperator(String),

    #[error("One operand of the \"{0}\" must be a field reference.")]
    MissingFieldOperand(String),

    #[error("The left operand of the \"{0}\" must be a field reference.")]
    LeftFieldOperand(String),

    #[error("Expected a filter expression for {0}.")]
    ExpectedFilter(String),

    #[error("Operand of the \"{0}\" must be a value, not a filter expression.")]
    ExpectedValue(String),

    #[error("The \"{0}\" operator requires an array of values.")]
    ExpectedArray(String),

    #[error("The \"{0}\" operator cannot compare a field against an array.")]
    ExpectedScalar(String),

    #[error("The \"{operator}\" operator cannot compare field '{field}' against null.")]
    NullComparison { operator: String, field: String },

    #[error("The \"{0}\" operator requires a string wildcard pattern.")]
    ExpectedPattern(String),
}
