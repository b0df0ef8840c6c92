use common::models::{Pair, PriceData, PriceDifference};
use std::collections::BTreeMap;

/// Reports every pair of quotes for the same instrument whose absolute
/// difference is strictly greater than `threshold`.
///
/// A pair quoted `n` times is checked `n * (n - 1) / 2` times, and each
/// exceeding combination is reported on its own. NaN prices never compare
/// greater than the threshold, so they are never reported.
pub fn compare(prices: &[PriceData], threshold: f64) -> Vec<PriceDifference> {
    let mut by_pair: BTreeMap<Pair, Vec<f64>> = BTreeMap::new();
    for data in prices {
        by_pair.entry(data.pair).or_default().push(data.price);
    }

    let mut diffs = Vec::new();
    for (pair, quotes) in &by_pair {
        for (i, &price_a) in quotes.iter().enumerate() {
            for &price_b in &quotes[i + 1..] {
                let difference = (price_a - price_b).abs();
                if difference > threshold {
                    diffs.push(PriceDifference {
                        pair: *pair,
                        price_a,
                        price_b,
                        difference,
                        threshold,
                    });
                }
            }
        }
    }

    diffs
}
