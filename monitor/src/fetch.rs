use crate::Metrics;
use common::models::{Pair, PriceData};
use connectors::{call_provider, PriceProvider};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Asks every provider for `pairs` and collects whatever comes back.
///
/// Providers are queried concurrently, each bounded by `timeout` and by
/// `cancel`. A failing provider is logged, counted and skipped. Results keep
/// provider order, then each provider's own order. Quotes for pairs that
/// were not requested are dropped. Calls abandoned because `cancel` fired
/// are not counted as provider failures. Never fails: if every provider
/// errors the result is empty.
pub async fn fetch(
    providers: &[Arc<dyn PriceProvider>],
    pairs: &[Pair],
    timeout: Duration,
    cancel: &CancellationToken,
    metrics: &Metrics,
) -> Vec<PriceData> {
    let calls = providers
        .iter()
        .map(|provider| call_provider(provider.as_ref(), pairs, cancel, timeout));
    let results = join_all(calls).await;

    let mut prices = Vec::new();
    for (provider, result) in providers.iter().zip(results) {
        match result {
            Ok(quotes) => {
                for data in quotes {
                    if !pairs.contains(&data.pair) {
                        warn!(
                            provider = provider.name(),
                            pair = %data.pair,
                            "Dropping price for unrequested pair"
                        );
                        continue;
                    }
                    debug!(
                        provider = provider.name(),
                        pair = %data.pair,
                        price = data.price,
                        "Fetched price"
                    );
                    prices.push(data);
                }
            }
            Err(e) if e.is_cancelled() && cancel.is_cancelled() => {
                debug!(provider = provider.name(), "Price request cancelled by shutdown");
            }
            Err(e) => {
                error!(provider = provider.name(), "Error fetching prices: {}", e);
                metrics.record_provider_failure(provider.name());
            }
        }
    }

    prices
}
