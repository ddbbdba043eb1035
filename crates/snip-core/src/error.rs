use thiserror::Error;

/// Errors related to the core functionality of the URL shortener service.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    DuplicateCode(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Returns `true` when the backend could not be reached at all, as opposed
    /// to a request that reached it and failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("short code already exists: {0}")]
    DuplicateCode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
            CoreError::InvalidExpiration(message) => Self::InvalidExpiration(message),
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::DuplicateCode(code) => Self::DuplicateCode(code),
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_groups_timeouts() {
        assert!(StorageError::Unavailable("down".into()).is_unavailable());
        assert!(StorageError::Timeout("pool".into()).is_unavailable());
        assert!(!StorageError::Query("syntax".into()).is_unavailable());
        assert!(!StorageError::DuplicateCode("abc123".into()).is_unavailable());
    }

    #[test]
    fn duplicate_code_keeps_its_kind_through_the_shortener() {
        let err = ShortenerError::from(StorageError::DuplicateCode("abc123".into()));
        assert_eq!(err, ShortenerError::DuplicateCode("abc123".into()));

        let err = ShortenerError::from(StorageError::Unavailable("down".into()));
        assert!(matches!(err, ShortenerError::Storage(StorageError::Unavailable(_))));
    }
}
