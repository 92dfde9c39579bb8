use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::ConfigError;

/// Fraction of the base price the walk may never fall below.
pub const PRICE_FLOOR_RATIO: f64 = 0.01;

/// Multiplicative random walk anchored at a base price.
#[derive(Debug, Clone)]
pub struct PriceProcess {
    symbol: String,
    base_price: f64,
    current_price: f64,
    volatility: f64,
    shock: Normal<f64>,
}

impl PriceProcess {
    pub fn new(
        symbol: impl Into<String>,
        base_price: f64,
        volatility: f64,
    ) -> Result<Self, ConfigError> {
        // Normal::new accepts a negative std-dev
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(ConfigError::InvalidVolatility(volatility));
        }
        let shock =
            Normal::new(0.0, volatility).map_err(|e| ConfigError::Distribution(e.to_string()))?;
        Ok(Self {
            symbol: symbol.into(),
            base_price,
            current_price: base_price,
            volatility,
            shock,
        })
    }

    /// Applies one relative shock and returns the new price.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let change = self.shock.sample(rng);
        self.current_price = (self.current_price * (1.0 + change)).max(self.floor());
        self.current_price
    }

    pub fn floor(&self) -> f64 {
        self.base_price * PRICE_FLOOR_RATIO
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_volatility_is_flat() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut process = PriceProcess::new("AAPL", 150.0, 0.0).unwrap();
        for _ in 0..100 {
            assert_eq!(process.step(&mut rng), 150.0);
        }
    }

    #[test]
    fn test_price_never_drops_below_floor() {
        let mut rng = StdRng::seed_from_u64(11);
        // shocks this large push the raw walk negative almost immediately
        let mut process = PriceProcess::new("X", 100.0, 5.0).unwrap();
        for _ in 0..10_000 {
            let price = process.step(&mut rng);
            assert!(price >= process.floor(), "price {} under floor", price);
            assert!(price > 0.0);
        }
    }

    #[test]
    fn test_step_returns_current_price() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut process = PriceProcess::new("MSFT", 400.0, 0.02).unwrap();
        let price = process.step(&mut rng);
        assert_eq!(price, process.current_price());
        assert_eq!(process.base_price(), 400.0);
    }

    #[test]
    fn test_negative_volatility_rejected() {
        assert_eq!(
            PriceProcess::new("X", 100.0, -0.1).unwrap_err(),
            ConfigError::InvalidVolatility(-0.1)
        );
        assert!(matches!(
            PriceProcess::new("X", 100.0, f64::NAN),
            Err(ConfigError::InvalidVolatility(_))
        ));
    }
}
