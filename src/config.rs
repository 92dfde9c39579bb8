use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::domain::base_price_for;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("order count must be positive")]
    NonPositiveOrderCount,
    #[error("duration must be positive and finite, got {0} hours")]
    NonPositiveDuration(f64),
    #[error("at least one symbol is required")]
    NoSymbols,
    #[error("symbol listed more than once: {0}")]
    DuplicateSymbol(String),
    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),
    #[error("burst probability must be within [0, 1], got {0}")]
    InvalidBurstProbability(f64),
    #[error("invalid burst size range [{min}, {max}]")]
    InvalidBurstSizeRange { min: usize, max: usize },
    #[error("volatility must be non-negative and finite, got {0}")]
    InvalidVolatility(f64),
    #[error("quantity cap must be at least 1")]
    InvalidQuantityCap,
    #[error("base price for {symbol} must be positive and finite, got {price}")]
    InvalidBasePrice { symbol: String, price: f64 },
    #[error("start time {start_time_us}us plus the simulated span does not fit in a u64 timestamp")]
    TimestampOverflow { start_time_us: u64 },
    #[error("distribution error: {0}")]
    Distribution(String),
}

/// Inclusive bounds on the number of orders in one burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstSizeRange {
    pub min: usize,
    pub max: usize,
}

impl Default for BurstSizeRange {
    fn default() -> Self {
        Self { min: 10, max: 50 }
    }
}

/// Parameters of one generation run. Validated once, never mutated while a
/// run is in progress.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub symbols: Vec<String>,
    pub num_orders: usize,
    pub duration_hours: f64,
    pub burst_probability: f64,
    pub burst_size_range: BurstSizeRange,
    pub volatility: f64,
    pub quantity_cap: u32,
    /// Overrides for the built-in base price table.
    pub base_prices: HashMap<String, f64>,
    /// Offset added to every timestamp, in microseconds.
    pub start_time_us: u64,
    /// `None` draws a fresh seed from entropy.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".to_string(), "GOOGL".to_string(), "MSFT".to_string()],
            num_orders: 100_000,
            duration_hours: 1.0,
            burst_probability: 0.05,
            burst_size_range: BurstSizeRange::default(),
            volatility: 0.02,
            quantity_cap: 10_000,
            base_prices: HashMap::new(),
            start_time_us: 0,
            seed: None,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_orders == 0 {
            return Err(ConfigError::NonPositiveOrderCount);
        }
        if !(self.duration_hours.is_finite() && self.duration_hours > 0.0) {
            return Err(ConfigError::NonPositiveDuration(self.duration_hours));
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }

        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            // symbols end up unquoted in CSV rows
            let malformed = symbol.is_empty()
                || symbol
                    .chars()
                    .any(|c| c.is_whitespace() || c == ',' || c == '"');
            if malformed {
                return Err(ConfigError::InvalidSymbol(symbol.clone()));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(ConfigError::DuplicateSymbol(symbol.clone()));
            }
        }

        if !(0.0..=1.0).contains(&self.burst_probability) {
            return Err(ConfigError::InvalidBurstProbability(self.burst_probability));
        }
        let BurstSizeRange { min, max } = self.burst_size_range;
        if min == 0 || min > max {
            return Err(ConfigError::InvalidBurstSizeRange { min, max });
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(ConfigError::InvalidVolatility(self.volatility));
        }
        if self.quantity_cap == 0 {
            return Err(ConfigError::InvalidQuantityCap);
        }
        let fits = self
            .max_span_us()
            .and_then(|span| self.start_time_us.checked_add(span))
            .is_some();
        if !fits {
            return Err(ConfigError::TimestampOverflow {
                start_time_us: self.start_time_us,
            });
        }
        for symbol in &self.symbols {
            let price = self.base_price(symbol);
            if !(price.is_finite() && price > 0.0) {
                return Err(ConfigError::InvalidBasePrice {
                    symbol: symbol.clone(),
                    price,
                });
            }
        }

        Ok(())
    }

    /// Override table first, then the built-in table, then the default.
    pub fn base_price(&self, symbol: &str) -> f64 {
        self.base_prices
            .get(symbol)
            .copied()
            .unwrap_or_else(|| base_price_for(symbol))
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_hours * 3600.0
    }

    /// Upper bound on the latest timestamp offset a run can produce, in
    /// microseconds. Single steps move the clock by at most 1.5 nominal
    /// steps and each burst order by at most 1ms past its nominal share.
    pub fn max_span_us(&self) -> Option<u64> {
        let secs = 1.5 * self.duration_secs() + 0.001 * self.num_orders as f64;
        let us = (secs * 1_000_000.0).ceil();
        if us.is_finite() && us < u64::MAX as f64 {
            Some(us as u64)
        } else {
            None
        }
    }

    /// Nominal spacing between consecutive events, in seconds.
    pub fn time_step(&self) -> f64 {
        self.duration_secs() / self.num_orders as f64
    }
}
