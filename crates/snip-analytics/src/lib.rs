//! Per-link access statistics.

pub mod error;
pub mod service;

pub use error::{AnalyticsError, Result};
pub use service::{AccessRecord, Analytics, AnalyticsProvider, AnalyticsService};
