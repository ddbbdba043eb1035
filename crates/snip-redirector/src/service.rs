use std::sync::Arc;

use crate::redirector::{Redirect, RedirectRequest, Redirector};
use crate::{RedirectError, Result};
use async_trait::async_trait;
use snip_core::password::{self, PasswordError};
use snip_core::{
    AccessLogRepository, Clock, Link, NewAccessLogEntry, ReadLinkRepository, StorageError,
    SystemClock,
};
use tracing::{debug, trace};

/// Service for handling short link visits.
///
/// Reads links through a [`ReadLinkRepository`] and records every successful
/// redirect in an [`AccessLogRepository`]. The two stores may be the same
/// object behind an `Arc`.
///
/// A visit walks these steps in order and stops at the first rejection:
///
/// 1. look up the code (`NotFound`)
/// 2. compare the expiry with the clock; a link is still live at exactly its
///    expiry instant (`Expired`)
/// 3. check the password of a protected link (`Unauthorized`)
/// 4. append the access log entry; a failed append fails the visit
#[derive(Debug, Clone)]
pub struct RedirectorService<L, A, C = SystemClock> {
    links: Arc<L>,
    access_log: Arc<A>,
    clock: Arc<C>,
}

impl<L: ReadLinkRepository, A: AccessLogRepository> RedirectorService<L, A> {
    /// Creates a new RedirectorService reading time from the system clock.
    pub fn new(links: L, access_log: A) -> Self {
        Self::with_clock(links, access_log, SystemClock)
    }
}

impl<L: ReadLinkRepository, A: AccessLogRepository, C: Clock> RedirectorService<L, A, C> {
    pub fn with_clock(links: L, access_log: A, clock: C) -> Self {
        Self {
            links: Arc::new(links),
            access_log: Arc::new(access_log),
            clock: Arc::new(clock),
        }
    }

    /// Resolves a visit to its redirect target.
    pub async fn redirect(&self, request: RedirectRequest) -> Result<Redirect> {
        Redirector::redirect(self, request).await
    }

    async fn check_password(link: &Link, password: Option<String>) -> Result<()> {
        let Some(hash) = link.password_hash.clone() else {
            return Ok(());
        };
        let Some(password) = password else {
            return Err(RedirectError::Unauthorized(link.short_code.to_string()));
        };

        let verified = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
            .await
            .map_err(|e| StorageError::Operation(e.to_string()))?
            .map_err(|e| match e {
                PasswordError::Malformed(msg) | PasswordError::Hash(msg) => {
                    StorageError::InvalidData(msg)
                }
            })?;

        if verified {
            Ok(())
        } else {
            Err(RedirectError::Unauthorized(link.short_code.to_string()))
        }
    }
}

#[async_trait]
impl<L: ReadLinkRepository, A: AccessLogRepository, C: Clock> Redirector
    for RedirectorService<L, A, C>
{
    async fn redirect(&self, request: RedirectRequest) -> Result<Redirect> {
        let RedirectRequest {
            code,
            client_ip,
            password,
        } = request;
        trace!(code = %code, "resolving short code");

        let Some(link) = self.links.find_by_code(&code).await? else {
            trace!(code = %code, "short code not found");
            return Err(RedirectError::NotFound(code.to_string()));
        };

        let now = self.clock.now();
        if link.is_expired_at(now) {
            debug!(code = %code, expires_at = %link.expires_at, "link has expired");
            return Err(RedirectError::Expired(code.to_string()));
        }

        Self::check_password(&link, password).await?;

        let entry = self
            .access_log
            .append(NewAccessLogEntry {
                link_id: link.id,
                accessed_at: now,
                client_ip,
            })
            .await?;

        debug!(
            code = %code,
            url = %link.original_url,
            client_ip = %entry.client_ip,
            "resolved short code"
        );
        Ok(Redirect {
            link_id: link.id,
            original_url: link.original_url,
        })
    }
}
