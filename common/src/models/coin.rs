use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Supported assets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Coin {
    Btc,
    Eth,
    Osmo,
    Usd,
}

impl Coin {
    pub const ALL: [Coin; 4] = [Coin::Btc, Coin::Eth, Coin::Osmo, Coin::Usd];

    /// Canonical lower-case symbol (e.g. "osmo")
    pub fn as_str(&self) -> &'static str {
        match self {
            Coin::Btc => "btc",
            Coin::Eth => "eth",
            Coin::Osmo => "osmo",
            Coin::Usd => "usd",
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Coin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_ascii_lowercase();
        Coin::ALL
            .into_iter()
            .find(|coin| coin.as_str() == symbol)
            .ok_or_else(|| Error::ParseError(format!("Unknown coin: {}", s)))
    }
}

/// Represents a pair of coins being monitored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    pub base: Coin,  // Base coin (e.g., OSMO)
    pub quote: Coin, // Quote coin (e.g., USD)
}

impl Pair {
    pub const fn new(base: Coin, quote: Coin) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for Pair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s.split_once('/').ok_or_else(|| {
            Error::ParseError(format!("Invalid pair: {}. Expected <base>/<quote>", s))
        })?;

        Ok(Pair {
            base: base.parse()?,
            quote: quote.parse()?,
        })
    }
}

/// Ordered list of monitored pairs. Order only matters for request construction.
pub type Pairs = Vec<Pair>;
