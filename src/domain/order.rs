use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest representable price (2 fractional digits).
pub const PRICE_TICK: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single synthetic order. Field order matches the output record layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub timestamp: u64, // microseconds since the generation epoch
    pub symbol: String,
    pub side: OrderSide,
    pub price: f64,
    pub quantity: u32,
}

/// Run-wide order id source. Ids start at 1 and never repeat within a run,
/// regardless of which instrument the order belongs to.
#[derive(Debug, Clone)]
pub struct OrderIdSequence {
    next: u64,
}

impl OrderIdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for OrderIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds to 2 decimals, never below one tick.
pub fn round_price(price: f64) -> f64 {
    ((price * 100.0).round() / 100.0).max(PRICE_TICK)
}
