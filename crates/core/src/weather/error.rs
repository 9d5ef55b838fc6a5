use thiserror::Error;

/// Network-level failure talking to a remote service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    /// True if the request hit its deadline.
    pub timed_out: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }
}

/// Errors surfaced by a weather lookup. None of them is ever cached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeatherError {
    #[error("A city name is required")]
    InvalidCity,
    /// The provider answered with a non-success status.
    #[error("Weather provider error (status {status})")]
    Provider { status: u16, body: String },
    #[error("Weather provider unreachable: {0}")]
    Transport(#[from] TransportError),
}
