use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Store-assigned identifier of a [`Link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub i64);

/// Store-assigned identifier of an [`AccessLogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessLogId(pub i64);

impl Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for AccessLogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored short link.
///
/// Links are never updated in place. Expiration is decided at read time
/// by comparing `expires_at` with the current instant; nothing is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    /// The original URL that was shortened.
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
    /// Always an absolute UTC instant.
    pub expires_at: Timestamp,
    /// Argon2 PHC string. `None` means the link is public.
    pub password_hash: Option<String>,
}

impl Link {
    /// A link is expired strictly after `expires_at`; the boundary instant is
    /// still valid.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at < now
    }

    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// A link that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub password_hash: Option<String>,
}

impl NewLink {
    pub fn into_link(self, id: LinkId) -> Link {
        Link {
            id,
            original_url: self.original_url,
            short_code: self.short_code,
            created_at: self.created_at,
            expires_at: self.expires_at,
            password_hash: self.password_hash,
        }
    }
}

/// One recorded visit of a link. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub id: AccessLogId,
    pub link_id: LinkId,
    pub accessed_at: Timestamp,
    pub client_ip: String,
}

/// An access log entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessLogEntry {
    pub link_id: LinkId,
    pub accessed_at: Timestamp,
    pub client_ip: String,
}

impl NewAccessLogEntry {
    pub fn into_entry(self, id: AccessLogId) -> AccessLogEntry {
        AccessLogEntry {
            id,
            link_id: self.link_id,
            accessed_at: self.accessed_at,
            client_ip: self.client_ip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    fn link(expires_at: Timestamp) -> Link {
        Link {
            id: LinkId(1),
            original_url: "https://example.com".to_string(),
            short_code: ShortCode::new_unchecked("abc123"),
            created_at: expires_at - SignedDuration::from_hours(1),
            expires_at,
            password_hash: None,
        }
    }

    #[test]
    fn expiry_boundary_is_not_expired() {
        let at = Timestamp::from_second(1_700_000_000).unwrap();
        let link = link(at);

        assert!(!link.is_expired_at(at - SignedDuration::from_millis(1)));
        assert!(!link.is_expired_at(at));
        assert!(link.is_expired_at(at + SignedDuration::from_millis(1)));
    }

    #[test]
    fn protection_follows_password_hash() {
        let mut link = link(Timestamp::now());
        assert!(!link.is_protected());

        link.password_hash = Some("$argon2id$...".to_string());
        assert!(link.is_protected());
    }
}
