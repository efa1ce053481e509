//! CLI error type.

use thiserror::Error;

use salon_client::{ApiError, SignupError};

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration or client setup failed.
    #[error(transparent)]
    Client(#[from] salon_client::Error),

    /// A call outside the session container failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Form input was rejected before being sent.
    #[error("{0}")]
    Signup(#[from] SignupError),

    /// The API refused the operation; its message was already shown.
    #[error("Operation rejected")]
    Rejected,

    /// A shell line could not be split into words.
    #[error("Unterminated quote in input")]
    UnterminatedQuote,

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking prompt task panicked or was cancelled.
    #[error("Prompt task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Turn an unsuccessful outcome into [`CliError::Rejected`].
pub const fn ensure(success: bool) -> Result<(), CliError> {
    if success { Ok(()) } else { Err(CliError::Rejected) }
}
