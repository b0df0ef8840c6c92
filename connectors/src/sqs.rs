use crate::PriceProvider;
use async_trait::async_trait;
use common::{
    models::{Coin, Pair, PriceData},
    Error, Result,
};
use std::collections::HashMap;
use tracing::{debug, error};

pub const SQS_API_URL: &str = "http://localhost:9092";

const SERVICE_NAME: &str = "SQS";

/// Noble USDC on Osmosis, the quote every SQS price is expressed in
pub const USDC_DENOM: &str =
    "ibc/498A0751C798A0D9A389AA3691123DADA57DAA4FE165D5C75894505B876BA6E4";

/// Client for the Osmosis Sidecar Query Server token price route
pub struct SqsProvider {
    client: reqwest::Client,
    base_url: String,
}

impl SqsProvider {
    pub fn new() -> Self {
        Self::with_base_url(SQS_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for SqsProvider {
    fn default() -> Self {
        Self::new()
    }
}

// On-chain denominations; coins without one are not quoted by SQS
fn sqs_denom(coin: Coin) -> Option<&'static str> {
    match coin {
        Coin::Osmo => Some("uosmo"),
        Coin::Usd => Some(USDC_DENOM),
        Coin::Btc | Coin::Eth => None,
    }
}

// {"uosmo": {"ibc/498A...": "1.23"}}
type TokenPricesResponse = HashMap<String, HashMap<String, String>>;

#[async_trait]
impl PriceProvider for SqsProvider {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    async fn get_prices(&self, pairs: &[Pair]) -> Result<Vec<PriceData>> {
        let supported: Vec<(Pair, &str, &str)> = pairs
            .iter()
            .filter_map(|pair| Some((*pair, sqs_denom(pair.base)?, sqs_denom(pair.quote)?)))
            .collect();

        if supported.is_empty() {
            debug!("No SQS denominations for requested pairs");
            return Ok(Vec::new());
        }

        let bases = supported
            .iter()
            .map(|(_, base, _)| *base)
            .collect::<Vec<_>>()
            .join(",");

        let url = format!("{}/tokens/prices", self.base_url);

        debug!("Fetching prices from SQS: {} (base: {})", url, bases);

        let response = self
            .client
            .get(&url)
            .query(&[("base", bases.as_str())])
            .send()
            .await
            .map_err(Error::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            error!("SQS API error: {}", status);
            return Err(Error::StatusError(status));
        }

        let raw_prices: TokenPricesResponse = response
            .json()
            .await
            .map_err(|e| Error::ParseError(format!("Failed to parse SQS response: {}", e)))?;

        let mut prices = Vec::with_capacity(supported.len());

        for (pair, base, quote) in supported {
            let Some(amount) = raw_prices.get(base).and_then(|quotes| quotes.get(quote)) else {
                continue;
            };

            let price = amount.parse::<f64>().map_err(|e| {
                Error::ParseError(format!("failed to parse price {:?}: {}", amount, e))
            })?;

            prices.push(PriceData::new(pair, SERVICE_NAME, price));
        }

        Ok(prices)
    }
}
