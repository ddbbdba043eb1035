//! Link and access log store backends.
//!
//! Both backends implement the contracts from `snip_core::repository`:
//! an in-memory store for tests and single-process deployments, and a
//! MySQL store for durable deployments.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::{MySqlRepository, MySqlSettings};
pub use snip_core::repository::Result;
pub use snip_core::{AccessLogRepository, LinkRepository, ReadLinkRepository, StorageError};
