use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub const PRICE_ERRORS_METRIC: &str = "price_monitor_price_errors_total";
pub const HEARTBEAT_METRIC: &str = "price_monitor_heartbeat";
pub const PROVIDER_FAILURES_METRIC: &str = "price_monitor_provider_failures_total";

/// Counters for the price monitor, kept in their own registry.
///
/// One instance lives for the whole process and is shared between the
/// monitor loop and the `/metrics` route.
pub struct Metrics {
    registry: Registry,
    price_errors: IntCounter,
    heartbeat: IntCounter,
    provider_failures: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let price_errors = IntCounter::with_opts(Opts::new(
            PRICE_ERRORS_METRIC,
            "Total number of pricing errors",
        ))?;
        let heartbeat = IntCounter::with_opts(Opts::new(
            HEARTBEAT_METRIC,
            "Total number of pricing measurements",
        ))?;
        let provider_failures = IntCounterVec::new(
            Opts::new(
                PROVIDER_FAILURES_METRIC,
                "Total number of failed price provider calls",
            ),
            &["provider"],
        )?;

        registry.register(Box::new(price_errors.clone()))?;
        registry.register(Box::new(heartbeat.clone()))?;
        registry.register(Box::new(provider_failures.clone()))?;

        Ok(Self {
            registry,
            price_errors,
            heartbeat,
            provider_failures,
        })
    }

    /// One completed cycle that found `divergences` mismatches.
    pub fn record_cycle(&self, divergences: usize) {
        self.heartbeat.inc();
        self.price_errors.inc_by(divergences as u64);
    }

    pub fn record_provider_failure(&self, provider: &str) {
        self.provider_failures.with_label_values(&[provider]).inc();
    }

    pub fn heartbeats(&self) -> u64 {
        self.heartbeat.get()
    }

    pub fn price_errors(&self) -> u64 {
        self.price_errors.get()
    }

    pub fn provider_failures(&self, provider: &str) -> u64 {
        self.provider_failures.with_label_values(&[provider]).get()
    }

    /// Renders every counter in the Prometheus text format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
