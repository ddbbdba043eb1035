use async_trait::async_trait;
use snip_core::password;
use snip_core::{
    Clock, Link, LinkRepository, NewLink, ShortenParams, Shortener, ShortenerError, StorageError,
    SystemClock,
};
use snip_generator::Generator;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `LinkRepository`, a `Generator` and a `Clock` to
/// handle:
/// - URL validation and normalization
/// - Short code derivation
/// - Expiration policy conversion
/// - Password hashing
///
/// Uniqueness is left to the repository. By default a code conflict is
/// reported as [`ShortenerError::DuplicateCode`] whether it comes from the
/// same URL or from a different URL sharing the hash prefix. With
/// [`ShortenerService::with_max_salt_attempts`] the second case is retried
/// with salted codes instead.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G, C = SystemClock> {
    repository: Arc<R>,
    generator: Arc<G>,
    clock: Arc<C>,
    max_salt_attempts: u32,
}

impl<R: LinkRepository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` reading time from the system clock.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_clock(repository, generator, SystemClock)
    }
}

impl<R: LinkRepository, G: Generator, C: Clock> ShortenerService<R, G, C> {
    pub fn with_clock(repository: R, generator: G, clock: C) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            clock: Arc::new(clock),
            max_salt_attempts: 0,
        }
    }

    /// Allows up to `attempts` salted retries when a code is already taken by
    /// a different URL.
    pub fn with_max_salt_attempts(mut self, attempts: u32) -> Self {
        self.max_salt_attempts = attempts;
        self
    }

    /// Validates that the URL is an absolute http(s) URL with a host and
    /// returns its normalized form.
    fn normalize_url(url: &str) -> Result<String, ShortenerError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| ShortenerError::InvalidUrl(format!("{url}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                parsed.scheme()
            )));
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a host: {url}"
            )));
        }

        Ok(parsed.into())
    }

    /// Hashes the password off the async executor. Empty passwords mean a
    /// public link.
    async fn hash_password(password: Option<String>) -> Result<Option<String>, ShortenerError> {
        let Some(password) = password.filter(|p| !p.is_empty()) else {
            return Ok(None);
        };

        let hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| ShortenerError::PasswordHash(e.to_string()))?
            .map_err(|e| ShortenerError::PasswordHash(e.to_string()))?;

        Ok(Some(hash))
    }
}

#[async_trait]
impl<R: LinkRepository, G: Generator, C: Clock> Shortener for ShortenerService<R, G, C> {
    async fn shorten(&self, params: ShortenParams) -> Result<Link, ShortenerError> {
        let original_url = Self::normalize_url(&params.original_url)?;

        let created_at = self.clock.now();
        let expires_at = params.expiration.expires_at(created_at)?;
        let password_hash = Self::hash_password(params.password).await?;

        let mut attempt = 0;
        loop {
            let short_code = self.generator.generate(&original_url, attempt);
            let link = NewLink {
                original_url: original_url.clone(),
                short_code: short_code.clone(),
                created_at,
                expires_at,
                password_hash: password_hash.clone(),
            };

            match self.repository.create(link).await {
                Ok(link) => {
                    debug!(
                        code = %link.short_code,
                        url = %link.original_url,
                        expires_at = %link.expires_at,
                        protected = link.is_protected(),
                        "shortened url"
                    );
                    return Ok(link);
                }
                Err(StorageError::DuplicateCode(code)) if attempt < self.max_salt_attempts => {
                    let existing = self.repository.find_by_code(&short_code).await?;
                    if existing.map_or(true, |link| link.original_url == original_url) {
                        return Err(ShortenerError::DuplicateCode(code));
                    }
                    warn!(code = %code, attempt, "short code collision, retrying with salt");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
