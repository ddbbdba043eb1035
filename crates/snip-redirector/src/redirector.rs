use crate::Result;
use async_trait::async_trait;
use snip_core::{LinkId, ShortCode};

/// A visit of a short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRequest {
    pub code: ShortCode,
    /// Address of the visitor, recorded in the access log.
    pub client_ip: String,
    /// Plaintext password for protected links.
    pub password: Option<String>,
}

impl RedirectRequest {
    pub fn new(code: ShortCode, client_ip: impl Into<String>) -> Self {
        Self {
            code,
            client_ip: client_ip.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// A successful, already logged, redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub link_id: LinkId,
    pub original_url: String,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Decides the outcome of a visit and records it when it redirects.
    async fn redirect(&self, request: RedirectRequest) -> Result<Redirect>;
}
