use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snip_core::{ExpirationPolicy, ShortenParams, DEFAULT_EXPIRES_IN_HOURS};

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub original_url: String,
    #[serde(default = "default_expires_in_hours", alias = "expires_in")]
    pub expires_in_hours: i64,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_expires_in_hours() -> i64 {
    DEFAULT_EXPIRES_IN_HOURS
}

impl From<ShortenRequest> for ShortenParams {
    fn from(request: ShortenRequest) -> Self {
        let params = ShortenParams::new(request.original_url)
            .with_expiration(ExpirationPolicy::AfterHours(request.expires_in_hours));
        match request.password {
            Some(password) => params.with_password(password),
            None => params,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: String,
    pub expires_at: Timestamp,
}

/// Query string of a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub password: Option<String>,
}
