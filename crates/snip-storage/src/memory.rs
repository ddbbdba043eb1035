use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use snip_core::repository::Result;
use snip_core::{
    AccessLogEntry, AccessLogId, AccessLogRepository, Link, LinkId, LinkRepository, NewAccessLogEntry,
    NewLink, ReadLinkRepository, ShortCode, StorageError,
};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::trace;

/// In-memory implementation of the link and access log stores using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking.
///
/// Code uniqueness is enforced through the entry API, so the check and the
/// insert happen under the same shard lock.
#[derive(Debug)]
pub struct InMemoryRepository {
    links: DashMap<String, Link>,
    // keyed by link id; an entry exists for every stored link
    access_logs: DashMap<LinkId, Vec<AccessLogEntry>>,
    next_link_id: AtomicI64,
    next_access_log_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory repository sized for `capacity` links.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
            access_logs: DashMap::with_capacity(capacity),
            next_link_id: AtomicI64::new(1),
            next_access_log_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadLinkRepository for InMemoryRepository {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Link>> {
        Ok(self.links.get(code.as_str()).map(|link| link.clone()))
    }
}

#[async_trait]
impl LinkRepository for InMemoryRepository {
    async fn create(&self, link: NewLink) -> Result<Link> {
        match self.links.entry(link.short_code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::DuplicateCode(link.short_code.to_string())),
            Entry::Vacant(slot) => {
                let id = LinkId(self.next_link_id.fetch_add(1, Ordering::SeqCst));
                let link = link.into_link(id);
                self.access_logs.insert(id, Vec::new());
                slot.insert(link.clone());
                trace!(code = %link.short_code, id = %id, "stored link");
                Ok(link)
            }
        }
    }
}

#[async_trait]
impl AccessLogRepository for InMemoryRepository {
    async fn append(&self, entry: NewAccessLogEntry) -> Result<AccessLogEntry> {
        let Some(mut entries) = self.access_logs.get_mut(&entry.link_id) else {
            return Err(StorageError::Query(format!(
                "access log references unknown link {}",
                entry.link_id
            )));
        };

        let id = AccessLogId(self.next_access_log_id.fetch_add(1, Ordering::SeqCst));
        let entry = entry.into_entry(id);
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_by_link_id(&self, link_id: LinkId) -> Result<Vec<AccessLogEntry>> {
        Ok(self
            .access_logs
            .get(&link_id)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }

    async fn count_by_link_id(&self, link_id: LinkId) -> Result<u64> {
        Ok(self
            .access_logs
            .get(&link_id)
            .map_or(0, |entries| entries.len() as u64))
    }
}
