use crate::PriceProvider;
use async_trait::async_trait;
use common::{
    models::{Coin, Pair, PriceData},
    Error, Result,
};
use std::collections::HashMap;
use tracing::{debug, error};

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

const SERVICE_NAME: &str = "CoinGecko";

pub struct CoinGeckoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(COINGECKO_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// CoinGecko identifies assets by id and fiat currencies by code
fn coingecko_id(coin: Coin) -> &'static str {
    match coin {
        Coin::Btc => "bitcoin",
        Coin::Eth => "ethereum",
        Coin::Osmo => "osmosis",
        Coin::Usd => "usd",
    }
}

// {"osmosis": {"usd": 1.23}}
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    async fn get_prices(&self, pairs: &[Pair]) -> Result<Vec<PriceData>> {
        // The simple/price endpoint takes a single vs_currency for the whole request
        let Some(first) = pairs.first() else {
            return Ok(Vec::new());
        };

        let ids = pairs
            .iter()
            .map(|pair| coingecko_id(pair.base))
            .collect::<Vec<_>>()
            .join(",");
        let vs_currency = coingecko_id(first.quote);

        let url = format!("{}/simple/price", self.base_url);

        debug!(
            "Fetching prices from CoinGecko: {} (ids: {}, vs_currencies: {})",
            url, ids, vs_currency
        );

        let response = self
            .client
            .get(&url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", vs_currency)])
            .send()
            .await
            .map_err(Error::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            error!("CoinGecko API error: {}", status);
            return Err(Error::StatusError(status));
        }

        let raw_prices: SimplePriceResponse = response.json().await.map_err(|e| {
            Error::ParseError(format!("Failed to parse CoinGecko response: {}", e))
        })?;

        let prices = pairs
            .iter()
            .filter_map(|pair| {
                raw_prices
                    .get(coingecko_id(pair.base))
                    .and_then(|quotes| quotes.get(coingecko_id(pair.quote)))
                    .map(|price| PriceData::new(*pair, SERVICE_NAME, *price))
            })
            .collect();

        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_provider;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn osmo_usd() -> Vec<Pair> {
        vec![Pair::new(Coin::Osmo, Coin::Usd)]
    }

    #[tokio::test]
    async fn test_get_prices_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/simple/price")
                    .query_param("ids", "osmosis")
                    .query_param("vs_currencies", "usd");
                then.status(200).json_body(json!({ "osmosis": { "usd": 1.23 } }));
            })
            .await;

        let provider = CoinGeckoProvider::with_base_url(server.base_url());
        let prices = provider.get_prices(&osmo_usd()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            prices,
            vec![PriceData::new(Pair::new(Coin::Osmo, Coin::Usd), "CoinGecko", 1.23)]
        );
    }

    #[tokio::test]
    async fn test_get_prices_joins_ids_and_keeps_pair_order() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/simple/price")
                    .query_param("ids", "bitcoin,osmosis")
                    .query_param("vs_currencies", "usd");
                then.status(200).json_body(json!({
                    "osmosis": { "usd": 0.2 },
                    "bitcoin": { "usd": 50000.0 }
                }));
            })
            .await;

        let pairs = vec![Pair::new(Coin::Btc, Coin::Usd), Pair::new(Coin::Osmo, Coin::Usd)];
        let provider = CoinGeckoProvider::with_base_url(server.base_url());
        let prices = provider.get_prices(&pairs).await.unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].pair, pairs[0]);
        assert_eq!(prices[0].price, 50000.0);
        assert_eq!(prices[1].pair, pairs[1]);
    }

    #[tokio::test]
    async fn test_get_prices_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/simple/price");
                then.status(500);
            })
            .await;

        let provider = CoinGeckoProvider::with_base_url(server.base_url());
        let err = provider.get_prices(&osmo_usd()).await.unwrap_err();

        assert!(err.to_string().contains("unexpected status code: 500"));
    }

    #[tokio::test]
    async fn test_get_prices_missing_price_is_omitted() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/simple/price");
                then.status(200).json_body(json!({ "bitcoin": { "usd": 30000.0 } }));
            })
            .await;

        let provider = CoinGeckoProvider::with_base_url(server.base_url());
        let prices = provider.get_prices(&osmo_usd()).await.unwrap();

        assert!(prices.is_empty());
    }

    #[tokio::test]
    async fn test_get_prices_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/simple/price");
                then.status(200).body("not json");
            })
            .await;

        let provider = CoinGeckoProvider::with_base_url(server.base_url());
        let err = provider.get_prices(&osmo_usd()).await.unwrap_err();

        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn test_get_prices_empty_pairs_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(json!({}));
            })
            .await;

        let provider = CoinGeckoProvider::with_base_url(server.base_url());
        let prices = provider.get_prices(&[]).await.unwrap();

        assert!(prices.is_empty());
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_get_prices_cancelled_context() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/simple/price");
                then.status(200).json_body(json!({}));
            })
            .await;

        let provider = CoinGeckoProvider::with_base_url(server.base_url());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = call_provider(&provider, &osmo_usd(), &cancel, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("cancelled"));
    }
}
