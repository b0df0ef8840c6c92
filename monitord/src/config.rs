use clap::Parser;
use common::{models::Pair, Error, Result};
use connectors::{coingecko::COINGECKO_API_URL, sqs::SQS_API_URL};
use monitor::MonitorSettings;
use std::net::SocketAddr;
use std::time::Duration;

/// Watches crypto prices across providers and exports divergence metrics
#[derive(Debug, Clone, Parser)]
#[command(name = "monitord", version)]
pub struct Config {
    /// Name of this host, attached to every log line
    #[arg(long, env = "PRICE_MONITOR_HOST", default_value = "price-monitor")]
    pub host: String,

    /// HTTP service address
    #[arg(long = "http", env = "HTTP_ADDRESS", default_value = "0.0.0.0:8080")]
    pub http_address: SocketAddr,

    /// SQS provider base URL
    #[arg(long, env = "SQS_BASE_URL", default_value = SQS_API_URL)]
    pub sqs_base_url: String,

    /// CoinGecko provider base URL
    #[arg(long, env = "COINGECKO_BASE_URL", default_value = COINGECKO_API_URL)]
    pub coingecko_base_url: String,

    /// Price difference threshold for reporting
    #[arg(long, env = "THRESHOLD", default_value_t = 0.1)]
    pub threshold: f64,

    /// Interval between price checks in seconds
    #[arg(long, env = "INTERVAL", default_value_t = 60)]
    pub interval: u64,

    /// Per-provider request timeout in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT", default_value_t = 10)]
    pub provider_timeout: u64,

    /// Pairs to monitor, e.g. "osmo/usd,btc/usd"
    #[arg(long, env = "PAIRS", value_delimiter = ',', default_value = "osmo/usd")]
    pub pairs: Vec<Pair>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::ConfigError(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        if self.interval == 0 {
            return Err(Error::ConfigError("interval must be at least 1 second".to_string()));
        }
        if self.provider_timeout == 0 {
            return Err(Error::ConfigError(
                "provider timeout must be at least 1 second".to_string(),
            ));
        }
        if self.pairs.is_empty() {
            return Err(Error::ConfigError("at least one pair is required".to_string()));
        }
        Ok(())
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            threshold: self.threshold,
            interval: Duration::from_secs(self.interval),
            provider_timeout: Duration::from_secs(self.provider_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::Coin;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("monitord").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);

        assert_eq!(config.threshold, 0.1);
        assert_eq!(config.interval, 60);
        assert_eq!(config.pairs, vec![Pair::new(Coin::Osmo, Coin::Usd)]);
        assert!(config.validate().is_ok());

        let settings = config.monitor_settings();
        assert_eq!(settings.interval, Duration::from_secs(60));
        assert_eq!(settings.provider_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_pairs_list() {
        let config = parse(&["--pairs", "osmo/usd,btc/usd"]);

        assert_eq!(
            config.pairs,
            vec![Pair::new(Coin::Osmo, Coin::Usd), Pair::new(Coin::Btc, Coin::Usd)]
        );
    }

    #[test]
    fn test_unknown_pair_is_rejected() {
        let result = Config::try_parse_from(["monitord", "--pairs", "doge/usd"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(parse(&["--threshold=-0.5"]).validate().is_err());
        assert!(parse(&["--threshold", "NaN"]).validate().is_err());
        assert!(parse(&["--interval", "0"]).validate().is_err());
        assert!(parse(&["--provider-timeout", "0"]).validate().is_err());
    }
}
