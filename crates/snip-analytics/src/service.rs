use std::sync::Arc;

use crate::{AnalyticsError, Result};
use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;
use snip_core::{AccessLogEntry, AccessLogRepository, Link, ReadLinkRepository, ShortCode};
use tracing::trace;

/// One recorded visit, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRecord {
    pub accessed_at: Timestamp,
    pub client_ip: String,
}

impl From<AccessLogEntry> for AccessRecord {
    fn from(entry: AccessLogEntry) -> Self {
        Self {
            accessed_at: entry.accessed_at,
            client_ip: entry.client_ip,
        }
    }
}

/// Access statistics of a single link.
///
/// `access_count` always equals `entries.len()`; entries are in write order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub short_code: ShortCode,
    pub access_count: u64,
    pub entries: Vec<AccessRecord>,
}

#[async_trait]
pub trait AnalyticsProvider: Send + Sync + 'static {
    /// Returns the full access history of the link behind `code`.
    ///
    /// Expired links still report their history.
    async fn analytics(&self, code: &ShortCode) -> Result<Analytics>;
}

/// Reads links and their access logs to build [`Analytics`].
#[derive(Debug, Clone)]
pub struct AnalyticsService<L, A> {
    links: Arc<L>,
    access_log: Arc<A>,
}

impl<L: ReadLinkRepository, A: AccessLogRepository> AnalyticsService<L, A> {
    pub fn new(links: L, access_log: A) -> Self {
        Self {
            links: Arc::new(links),
            access_log: Arc::new(access_log),
        }
    }

    pub async fn analytics(&self, code: &ShortCode) -> Result<Analytics> {
        AnalyticsProvider::analytics(self, code).await
    }

    /// Number of recorded visits, without loading the entries.
    pub async fn access_count(&self, code: &ShortCode) -> Result<u64> {
        let link = self.find_link(code).await?;
        Ok(self.access_log.count_by_link_id(link.id).await?)
    }

    async fn find_link(&self, code: &ShortCode) -> Result<Link> {
        self.links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AnalyticsError::NotFound(code.to_string()))
    }
}

#[async_trait]
impl<L: ReadLinkRepository, A: AccessLogRepository> AnalyticsProvider for AnalyticsService<L, A> {
    async fn analytics(&self, code: &ShortCode) -> Result<Analytics> {
        trace!(code = %code, "collecting analytics");

        let link = self.find_link(code).await?;
        let entries: Vec<AccessRecord> = self
            .access_log
            .list_by_link_id(link.id)
            .await?
            .into_iter()
            .map(AccessRecord::from)
            .collect();

        Ok(Analytics {
            short_code: link.short_code,
            access_count: entries.len() as u64,
            entries,
        })
    }
}
