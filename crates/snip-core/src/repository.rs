use crate::error::StorageError;
use crate::link::{AccessLogEntry, Link, LinkId, NewAccessLogEntry, NewLink};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of the link store.
///
/// The redirector and analytics services only ever look links up, so they
/// depend on this trait rather than on [`LinkRepository`].
#[async_trait]
pub trait ReadLinkRepository: Send + Sync + 'static {
    /// Retrieves the link stored under `code`.
    /// Returns `None` if the code does not exist. Expired links are returned
    /// as-is; expiration is the caller's decision.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Link>>;
}

#[async_trait]
pub trait LinkRepository: ReadLinkRepository {
    /// Stores a new link and returns it with its assigned id.
    ///
    /// Returns `Err(DuplicateCode)` if the code already exists. The check and
    /// the write are a single atomic operation; on conflict nothing is written.
    async fn create(&self, link: NewLink) -> Result<Link>;
}

/// Append-only log of link visits.
#[async_trait]
pub trait AccessLogRepository: Send + Sync + 'static {
    /// Appends one entry and returns it with its assigned id.
    async fn append(&self, entry: NewAccessLogEntry) -> Result<AccessLogEntry>;

    /// Lists every entry of a link in insertion order.
    ///
    /// This is unbounded; a link with a very large history is returned in
    /// full.
    async fn list_by_link_id(&self, link_id: LinkId) -> Result<Vec<AccessLogEntry>>;

    /// Counts the entries of a link.
    async fn count_by_link_id(&self, link_id: LinkId) -> Result<u64>;
}

#[async_trait]
impl<T: ReadLinkRepository + ?Sized> ReadLinkRepository for Arc<T> {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Link>> {
        (**self).find_by_code(code).await
    }
}

#[async_trait]
impl<T: LinkRepository + ?Sized> LinkRepository for Arc<T> {
    async fn create(&self, link: NewLink) -> Result<Link> {
        (**self).create(link).await
    }
}

#[async_trait]
impl<T: AccessLogRepository + ?Sized> AccessLogRepository for Arc<T> {
    async fn append(&self, entry: NewAccessLogEntry) -> Result<AccessLogEntry> {
        (**self).append(entry).await
    }

    async fn list_by_link_id(&self, link_id: LinkId) -> Result<Vec<AccessLogEntry>> {
        (**self).list_by_link_id(link_id).await
    }

    async fn count_by_link_id(&self, link_id: LinkId) -> Result<u64> {
        (**self).count_by_link_id(link_id).await
    }
}
