pub mod coingecko;
pub mod sqs;

use std::time::Duration;

use async_trait::async_trait;
use common::{
    models::{Pair, PriceData},
    Error, Result,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Trait defining the interface for price sources
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Name used in logs, metrics and as `PriceData::service`
    fn name(&self) -> &str;

    /// Get the current prices for the given pairs.
    ///
    /// Pairs the source has no data for are left out of the result. Any
    /// failure aborts the whole call; partial results are never returned
    /// alongside an error.
    async fn get_prices(&self, pairs: &[Pair]) -> Result<Vec<PriceData>>;
}

/// Runs one `get_prices` call bounded by `timeout` and by `cancel`.
///
/// Cancelling the token drops the in-flight request.
pub async fn call_provider(
    provider: &dyn PriceProvider,
    pairs: &[Pair],
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<Vec<PriceData>> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    debug!("Requesting {} pairs from {}", pairs.len(), provider.name());

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = tokio::time::timeout(timeout, provider.get_prices(pairs)) => {
            result.map_err(|_| Error::Timeout(timeout))?
        }
    }
}
