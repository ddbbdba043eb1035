//! Core types and traits for the Snip URL shortener.
//!
//! This crate provides the data model, the store contracts and the error
//! taxonomy shared by the shortener, redirector and analytics services.

pub mod clock;
pub mod error;
pub mod link;
pub mod password;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, ShortenerError, StorageError};
pub use link::{AccessLogEntry, AccessLogId, Link, LinkId, NewAccessLogEntry, NewLink};
pub use password::PasswordError;
pub use repository::{AccessLogRepository, LinkRepository, ReadLinkRepository};
pub use shortcode::ShortCode;
pub use shortener::{ExpirationPolicy, ShortenParams, Shortener, DEFAULT_EXPIRES_IN_HOURS};
