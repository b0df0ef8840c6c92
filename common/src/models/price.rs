use crate::models::Pair;
use serde::{Deserialize, Serialize};

/// One provider's quote for one pair, taken during a fetch cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    /// Trading pair (e.g., OSMO/USD)
    pub pair: Pair,
    /// Name of the provider that quoted this price
    pub service: String,
    /// Quoted price in quote currency
    pub price: f64,
}

impl PriceData {
    pub fn new(pair: Pair, service: impl Into<String>, price: f64) -> Self {
        Self {
            pair,
            service: service.into(),
            price,
        }
    }
}

/// A detected mismatch between two quotes of the same pair.
///
/// `difference` is always `|price_a - price_b|` and strictly greater than `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDifference {
    pub pair: Pair,
    pub price_a: f64,
    pub price_b: f64,
    pub difference: f64,
    pub threshold: f64,
}
