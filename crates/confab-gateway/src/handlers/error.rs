//! Handler errors

use confab_core::DomainError;

/// Errors from wire event handlers
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error(transparent)]
    Storage(#[from] DomainError),
}

/// Result type for handlers
pub type HandlerResult<T> = Result<T, HandlerError>;
