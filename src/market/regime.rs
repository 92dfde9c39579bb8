use rand::Rng;

use crate::domain::OrderSide;

/// Where the live price sits relative to its anchor. Drives the side bias
/// that pulls the walk back toward the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Rich,  // more than 5% above base
    Cheap, // more than 5% below base
    Fair,
}

const RICH_THRESHOLD: f64 = 1.05;
const CHEAP_THRESHOLD: f64 = 0.95;

impl Regime {
    pub fn classify(current_price: f64, base_price: f64) -> Self {
        if current_price > base_price * RICH_THRESHOLD {
            Regime::Rich
        } else if current_price < base_price * CHEAP_THRESHOLD {
            Regime::Cheap
        } else {
            Regime::Fair
        }
    }

    pub fn buy_probability(&self) -> f64 {
        match self {
            Regime::Rich => 0.3,
            Regime::Cheap => 0.7,
            Regime::Fair => 0.5,
        }
    }

    pub fn pick_side<R: Rng + ?Sized>(&self, rng: &mut R) -> OrderSide {
        if rng.gen_bool(self.buy_probability()) {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}
