use crate::config::Config;
use connectors::{coingecko::CoinGeckoProvider, sqs::SqsProvider, PriceProvider};
use monitor::{Metrics, Monitor};
use std::sync::Arc;
use tracing::info;

/// Price sources queried every cycle
pub fn providers(config: &Config) -> Vec<Arc<dyn PriceProvider>> {
    vec![
        Arc::new(CoinGeckoProvider::with_base_url(&config.coingecko_base_url)),
        Arc::new(SqsProvider::with_base_url(&config.sqs_base_url)),
    ]
}

pub fn build_monitor(config: &Config, metrics: Arc<Metrics>) -> Monitor {
    let providers = providers(config);

    info!(
        providers = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
        pairs = ?config.pairs.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
        "Configured price monitor"
    );

    Monitor::new(providers, config.pairs.clone(), config.monitor_settings(), metrics)
}
