pub mod error;
pub mod hash;

pub use error::Error;
pub use hash::{HashGenerator, DEFAULT_CODE_LENGTH};

use snip_core::ShortCode;

/// Trait for deriving short codes from the URL being shortened.
///
/// Implementations are pure generators that don't interact with storage:
/// the same `(original_url, attempt)` pair always yields the same code.
/// Uniqueness is enforced by the link store, not here.
pub trait Generator: Send + Sync + 'static {
    /// Derives a short code for `original_url`.
    ///
    /// `attempt` is `0` for the first try. Higher values salt the input so a
    /// caller can step away from a code that is already taken by a different
    /// URL.
    fn generate(&self, original_url: &str, attempt: u32) -> ShortCode;
}
