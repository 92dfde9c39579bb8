pub mod instrument;
pub mod order;

pub use instrument::{base_price_for, BASE_PRICES, DEFAULT_BASE_PRICE};
pub use order::{round_price, Order, OrderIdSequence, OrderSide, PRICE_TICK};
