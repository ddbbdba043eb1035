use std::sync::Arc;

use snip_analytics::{AnalyticsProvider, AnalyticsService};
use snip_core::{AccessLogRepository, Clock, LinkRepository, Shortener, SystemClock};
use snip_generator::Generator;
use snip_redirector::{Redirector, RedirectorService};
use snip_shortener::ShortenerService;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    analytics: Arc<dyn AnalyticsProvider>,
    base_url: String,
    trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        analytics: Arc<dyn AnalyticsProvider>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            shortener,
            redirector,
            analytics,
            base_url: public_base_url.into(),
            trust_forwarded_for: false,
        }
    }

    /// Wires all three services onto one store that holds both links and
    /// access logs.
    pub fn from_store<S, G>(
        store: Arc<S>,
        generator: G,
        max_salt_attempts: u32,
        public_base_url: impl Into<String>,
    ) -> Self
    where
        S: LinkRepository + AccessLogRepository,
        G: Generator,
    {
        Self::from_store_with_clock(store, generator, max_salt_attempts, SystemClock, public_base_url)
    }

    pub fn from_store_with_clock<S, G, C>(
        store: Arc<S>,
        generator: G,
        max_salt_attempts: u32,
        clock: C,
        public_base_url: impl Into<String>,
    ) -> Self
    where
        S: LinkRepository + AccessLogRepository,
        G: Generator,
        C: Clock + Clone,
    {
        let shortener = ShortenerService::with_clock(Arc::clone(&store), generator, clock.clone())
            .with_max_salt_attempts(max_salt_attempts);
        let redirector = RedirectorService::with_clock(Arc::clone(&store), Arc::clone(&store), clock);
        let analytics = AnalyticsService::new(Arc::clone(&store), store);

        Self::new(
            Arc::new(shortener),
            Arc::new(redirector),
            Arc::new(analytics),
            public_base_url,
        )
    }

    /// Takes the client address from the first `X-Forwarded-For` entry
    /// instead of the TCP peer. Enable only behind a proxy that sets it.
    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn analytics(&self) -> &dyn AnalyticsProvider {
        self.analytics.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn trust_forwarded_for(&self) -> bool {
        self.trust_forwarded_for
    }
}
