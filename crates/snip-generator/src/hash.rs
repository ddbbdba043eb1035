use crate::error::Error;
use crate::Generator;
use sha2::{Digest, Sha256};
use snip_core::ShortCode;

/// Length of a code when none is configured: 6 hex characters, 24 bits
/// of the digest.
pub const DEFAULT_CODE_LENGTH: usize = 6;

const MIN_CODE_LENGTH: usize = 4;
// two hex characters per byte of a SHA-256 digest
const MAX_CODE_LENGTH: usize = 64;

/// A content-addressed code generator.
///
/// The code is the first `length` lowercase hex characters of the SHA-256
/// digest of the URL string. Re-shortening an identical URL therefore
/// produces the identical code, and the link store turns the second attempt
/// into a conflict.
///
/// Two different URLs can share a prefix. With the default length the space
/// is 16^6 codes; callers that care either widen the code with
/// [`HashGenerator::with_length`] or retry with a non-zero `attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashGenerator {
    length: usize,
}

impl HashGenerator {
    pub fn new() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
        }
    }

    /// Creates a generator producing codes of `length` hex characters.
    pub fn with_length(length: usize) -> Result<Self, Error> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(Error::InvalidLength {
                length,
                min: MIN_CODE_LENGTH,
                max: MAX_CODE_LENGTH,
            });
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for HashGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for HashGenerator {
    fn generate(&self, original_url: &str, attempt: u32) -> ShortCode {
        let mut hasher = Sha256::new();
        hasher.update(original_url.as_bytes());
        if attempt > 0 {
            // NUL cannot appear in a valid URL
            hasher.update([0u8]);
            hasher.update(attempt.to_be_bytes());
        }
        let mut hex = format!("{:x}", hasher.finalize());
        hex.truncate(self.length);
        ShortCode::new_unchecked(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_sha256_prefix() {
        let generator = HashGenerator::new();

        assert_eq!(generator.generate("https://example.com/a", 0).as_str(), "2dce0a");
        assert_eq!(generator.generate("https://example.com", 0).as_str(), "100680");
    }

    #[test]
    fn is_deterministic() {
        let generator = HashGenerator::new();

        for url in ["https://example.com", "http://a.b/c?d=e#f", ""] {
            assert_eq!(generator.generate(url, 0), generator.generate(url, 0));
            assert_eq!(generator.generate(url, 3), generator.generate(url, 3));
        }
    }

    #[test]
    fn distinct_urls_get_distinct_codes() {
        let generator = HashGenerator::new();

        let a = generator.generate("https://example.com/a", 0);
        let b = generator.generate("https://example.com/b", 0);
        assert_ne!(a, b);
    }

    #[test]
    fn salted_attempts_move_the_code() {
        let generator = HashGenerator::new();
        let url = "https://example.com/a";

        let first = generator.generate(url, 0);
        let second = generator.generate(url, 1);
        assert_ne!(first, second);
        assert_eq!(second.as_str(), "077881");
    }

    #[test]
    fn custom_length() {
        let generator = HashGenerator::with_length(12).unwrap();
        let code = generator.generate("https://example.com/a", 0);

        assert_eq!(code.as_str().len(), 12);
        assert!(code.as_str().starts_with("2dce0a"));
        assert!(code.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_codes_pass_validation() {
        let generator = HashGenerator::with_length(64).unwrap();
        let code = generator.generate("https://example.com", 0);

        assert!(ShortCode::new(code.as_str()).is_ok());
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(matches!(
            HashGenerator::with_length(3),
            Err(Error::InvalidLength { length: 3, .. })
        ));
        assert!(HashGenerator::with_length(65).is_err());
        assert!(HashGenerator::with_length(4).is_ok());
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HashGenerator>();
    }
}
