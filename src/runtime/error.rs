use thiserror::Error;

/// Fatal semantic faults. These surface to the embedding caller and are not
/// catchable from inside the scripting language.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Unknown field '{field}' for {type_name}")]
    UnknownField { field: String, type_name: String },
    #[error("Expected a class instance, got {type_name}")]
    NotAnInstance { type_name: String },
    #[error("Unknown method '{method}' with {arity} argument(s) for {type_name}")]
    UnknownMethod {
        method: String,
        arity: usize,
        type_name: String,
    },
    #[error("Operation '{operation}' is not supported for {lhs} and {rhs}")]
    UnsupportedOperation {
        operation: &'static str,
        lhs: String,
        rhs: String,
    },
    #[error("Cannot compare {lhs} and {rhs}")]
    NotComparable { lhs: String, rhs: String },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Return outside of a method")]
    ReturnOutsideMethod,
    #[error("Write to the output stream failed")]
    Output(#[from] std::fmt::Error),
}
