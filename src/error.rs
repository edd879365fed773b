use thiserror::Error;

/// Error type for the graphcalc crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An expression position expected a value and found the end of input
    #[error("missing an operand")]
    MissingOperand,
    /// A function call was not followed by `(`
    #[error("expected (")]
    ExpectedOpenParen,
    /// A group or function call was not closed by `)`
    #[error("expected )")]
    ExpectedCloseParen,
    /// A word that is neither a variable, a function nor a number
    #[error("unknown function or variable name '{0}'")]
    UnknownIdentifier(String),
    /// A token in operator position that is not a known operator
    #[error("unknown operator {0}")]
    UnknownOperator(String),
    /// Input left over after a complete expression
    #[error("ill-formed expression: unexpected '{0}'")]
    TrailingTokens(String),
    /// A range step that would never reach the end of the range
    #[error("invalid range step {0}")]
    InvalidStep(f64),
    /// A range with an infinite bound
    #[error("unbounded range from {0} to {1}")]
    UnboundedRange(f64, f64),
}
