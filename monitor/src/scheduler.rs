use crate::{compare, fetch, Metrics};
use common::models::{Pairs, PriceDifference};
use connectors::PriceProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Shortest accepted cycle interval; `tokio::time::interval` panics on zero
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Largest tolerated absolute price difference between two sources
    pub threshold: f64,
    /// Time between the start of two cycles
    pub interval: Duration,
    /// Deadline for a single provider call
    pub provider_timeout: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            interval: Duration::from_secs(60),
            provider_timeout: Duration::from_secs(10),
        }
    }
}

/// Periodically fetches prices from every provider and flags diverging quotes
pub struct Monitor {
    providers: Vec<Arc<dyn PriceProvider>>,
    pairs: Pairs,
    settings: MonitorSettings,
    metrics: Arc<Metrics>,
}

impl Monitor {
    pub fn new(
        providers: Vec<Arc<dyn PriceProvider>>,
        pairs: Pairs,
        mut settings: MonitorSettings,
        metrics: Arc<Metrics>,
    ) -> Self {
        if settings.interval < MIN_INTERVAL {
            warn!(
                interval = ?settings.interval,
                "Interval too short, using {:?}", MIN_INTERVAL
            );
            settings.interval = MIN_INTERVAL;
        }

        Self {
            providers,
            pairs,
            settings,
            metrics,
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// One fetch-then-compare pass.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Vec<PriceDifference> {
        let prices = fetch(
            &self.providers,
            &self.pairs,
            self.settings.provider_timeout,
            cancel,
            &self.metrics,
        )
        .await;

        let diffs = compare(&prices, self.settings.threshold);
        for diff in &diffs {
            warn!(
                pair = %diff.pair,
                price_a = diff.price_a,
                price_b = diff.price_b,
                difference = diff.difference,
                threshold = diff.threshold,
                "Price difference above threshold"
            );
        }

        self.metrics.record_cycle(diffs.len());

        info!(
            observations = prices.len(),
            divergences = diffs.len(),
            "Price check completed"
        );

        diffs
    }

    /// Runs a cycle immediately and then once per interval until `cancel` fires.
    ///
    /// A cycle is awaited before the next tick is taken, so cycles never
    /// overlap; ticks missed by a slow cycle are skipped.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            providers = self.providers.len(),
            pairs = self.pairs.len(),
            interval = ?self.settings.interval,
            threshold = self.settings.threshold,
            "Starting price monitor"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.run_cycle(&cancel).await;
                }
            }
        }

        info!("Price monitor stopped");
    }
}
