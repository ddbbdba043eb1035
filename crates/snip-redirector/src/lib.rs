//! Redirect decision for short links.
//!
//! [`RedirectorService`] turns a visit of a short code into one of four
//! outcomes: a redirect to the original URL, or a `NotFound`, `Expired` or
//! `Unauthorized` rejection. Every redirect is recorded in the access log
//! before it is handed back to the caller.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use snip_core::ShortCode;
//! use snip_redirector::{RedirectRequest, Redirector, RedirectorService};
//! use snip_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryRepository::new());
//! let service = RedirectorService::new(Arc::clone(&store), store);
//!
//! let request = RedirectRequest::new(ShortCode::new("2dce0a")?, "203.0.113.7");
//! match service.redirect(request).await {
//!     Ok(redirect) => println!("Redirect to: {}", redirect.original_url),
//!     Err(err) => println!("No redirect: {err}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod redirector;
pub mod service;

pub use error::{RedirectError, Result};
pub use redirector::{Redirect, RedirectRequest, Redirector};
pub use service::RedirectorService;
