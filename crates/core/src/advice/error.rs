use thiserror::Error;

/// Validation errors for advice requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdviceError {
    #[error("The \"{0}\" field is required")]
    MissingField(&'static str),
    #[error("The \"content\" field cannot be empty")]
    EmptyContent,
    #[error("Invalid month {0} (1-12 expected)")]
    InvalidMonth(i64),
    #[error("Invalid year {0}")]
    InvalidYear(i64),
}
