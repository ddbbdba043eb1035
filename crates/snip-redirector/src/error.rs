use snip_core::StorageError;
use thiserror::Error;

/// Type alias for redirect results.
pub type Result<T> = std::result::Result<T, RedirectError>;

/// Why a visit did not end in a redirect.
///
/// Each variant is a terminal state of the redirect decision, so callers can
/// tell "never existed" from "existed but expired".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RedirectError {
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("short code has expired: {0}")]
    Expired(String),
    #[error("password required or incorrect for short code: {0}")]
    Unauthorized(String),
    #[error("storage operation failed: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}
