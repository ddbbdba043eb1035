use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snip_analytics::{AccessRecord, Analytics};

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessLogResponse {
    pub accessed_at: Timestamp,
    pub ip_address: String,
}

impl From<AccessRecord> for AccessLogResponse {
    fn from(record: AccessRecord) -> Self {
        Self {
            accessed_at: record.accessed_at,
            ip_address: record.client_ip,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub short_code: String,
    pub short_url: String,
    pub access_count: u64,
    pub logs: Vec<AccessLogResponse>,
}

impl AnalyticsResponse {
    pub fn new(analytics: Analytics, base_url: &str) -> Self {
        Self {
            short_url: analytics.short_code.to_url(base_url),
            short_code: analytics.short_code.to_string(),
            access_count: analytics.access_count,
            logs: analytics.entries.into_iter().map(Into::into).collect(),
        }
    }
}
