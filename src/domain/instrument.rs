/// Base price used for symbols missing from [`BASE_PRICES`].
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Reference prices for the large-cap tickers the generator knows about.
pub const BASE_PRICES: &[(&str, f64)] = &[
    ("AAPL", 150.0),
    ("GOOGL", 2800.0),
    ("MSFT", 400.0),
    ("TSLA", 200.0),
    ("AMZN", 180.0),
];

pub fn base_price_for(symbol: &str) -> f64 {
    BASE_PRICES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_BASE_PRICE)
}
