mod analytics;
mod health;
mod link;

pub use analytics::{AccessLogResponse, AnalyticsResponse};
pub use health::HealthResponse;
pub use link::{RedirectQuery, ShortenRequest, ShortenResponse};
