mod coin;
mod price;

pub use coin::{Coin, Pair, Pairs};
pub use price::{PriceData, PriceDifference};
