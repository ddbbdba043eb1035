use crate::error::{CoreError, ShortenerError};
use crate::link::Link;
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};

type Result<T> = std::result::Result<T, ShortenerError>;

/// Lifetime of a link when the caller does not ask for one.
pub const DEFAULT_EXPIRES_IN_HOURS: i64 = 24;

const SECONDS_PER_HOUR: i64 = 3600;

/// Expiration policy for a shortened URL.
///
/// Every link expires; there is no "never" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationPolicy {
    /// The link expires a number of hours after creation.
    ///
    /// `0` expires at the creation instant. Negative values are accepted and
    /// produce a link that is already expired.
    AfterHours(i64),
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::AfterHours(DEFAULT_EXPIRES_IN_HOURS)
    }
}

impl ExpirationPolicy {
    /// Resolves the policy to an absolute UTC instant relative to `now`.
    pub fn expires_at(&self, now: Timestamp) -> std::result::Result<Timestamp, CoreError> {
        let ExpirationPolicy::AfterHours(hours) = *self;

        let seconds = hours.checked_mul(SECONDS_PER_HOUR).ok_or_else(|| {
            CoreError::InvalidExpiration(format!("{hours} hours is out of range"))
        })?;
        now.checked_add(SignedDuration::from_secs(seconds))
            .map_err(|e| CoreError::InvalidExpiration(format!("{hours} hours from {now}: {e}")))
    }
}

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// The expiration policy for the shortened URL.
    pub expiration: ExpirationPolicy,
    /// Optional plaintext password gating the redirect.
    pub password: Option<String>,
}

impl ShortenParams {
    /// Public link with the default lifetime.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            expiration: ExpirationPolicy::default(),
            password: None,
        }
    }

    pub fn with_expiration(mut self, expiration: ExpirationPolicy) -> Self {
        self.expiration = expiration;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL and returns the stored link.
    async fn shorten(&self, params: ShortenParams) -> Result<Link>;
}
