use jsoncreator_parser::ParseError;
use thiserror::Error;

/// Errors that abort constructor generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// The target class lacks something the request depends on,
    /// e.g. a base constructor was selected but there is no superclass
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// A declaration could not be built from the given names or types
    #[error("Cannot build construct: {0}")]
    UnsupportedConstruct(String),

    /// Generated body text failed to parse back
    #[error("Generated body does not parse: {0}")]
    Parse(#[from] ParseError),
}

pub type GenerateResult<T> = Result<T, GenerateError>;
