//! URL shortener service implementation.
//!
//! This crate turns [`ShortenParams`] into stored links: it validates the
//! URL, derives the code, resolves the expiration and hashes the optional
//! password. Core types are re-exported from `snip_core`.

pub mod service;

pub use service::ShortenerService;
pub use snip_core::{ExpirationPolicy, ShortenParams, Shortener, ShortenerError};
