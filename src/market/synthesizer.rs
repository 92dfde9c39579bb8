use rand::Rng;
use rand_distr::{Distribution, Pareto};

use crate::config::ConfigError;
use crate::domain::{round_price, Order, OrderIdSequence, OrderSide};
use crate::market::{PriceProcess, Regime};

const PARETO_SHAPE: f64 = 1.5;
const QUANTITY_SCALE: f64 = 100.0;

/// Converts simulated seconds since the epoch into whole microseconds.
pub fn to_micros(seconds: f64) -> u64 {
    (seconds * 1_000_000.0) as u64
}

/// Turns one step of a [`PriceProcess`] into a resting-style limit order.
#[derive(Debug, Clone)]
pub struct OrderSynthesizer {
    quantity_cap: u32,
    size: Pareto<f64>,
    epoch_offset_us: u64,
}

impl OrderSynthesizer {
    pub fn new(quantity_cap: u32, epoch_offset_us: u64) -> Result<Self, ConfigError> {
        if quantity_cap == 0 {
            return Err(ConfigError::InvalidQuantityCap);
        }
        let size =
            Pareto::new(1.0, PARETO_SHAPE).map_err(|e| ConfigError::Distribution(e.to_string()))?;
        Ok(Self {
            quantity_cap,
            size,
            epoch_offset_us,
        })
    }

    pub fn quantity_cap(&self) -> u32 {
        self.quantity_cap
    }

    /// Steps the process and derives an order at `at` seconds.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        process: &mut PriceProcess,
        ids: &mut OrderIdSequence,
        at: f64,
        rng: &mut R,
    ) -> Order {
        let current_price = process.step(rng);

        let side = Regime::classify(current_price, process.base_price()).pick_side(rng);

        // buyers bid a little under the market, sellers ask a little over
        let offset = match side {
            OrderSide::Buy => rng.gen_range(0.995..1.0),
            OrderSide::Sell => rng.gen_range(1.0..1.005),
        };
        let price = round_price(current_price * offset);

        let quantity = self.sample_quantity(rng);

        Order {
            order_id: ids.next_id(),
            timestamp: self.epoch_offset_us.saturating_add(to_micros(at)),
            symbol: process.symbol().to_string(),
            side,
            price,
            quantity,
        }
    }

    /// Heavy-tailed size: mostly small orders with the occasional block.
    fn sample_quantity<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        // shift the classical Pareto (support >= 1) to the Lomax form (support >= 0)
        let lomax = self.size.sample(rng) - 1.0;
        let raw = (lomax * QUANTITY_SCALE + 1.0) as u64;
        raw.clamp(1, self.quantity_cap as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (OrderSynthesizer, PriceProcess, OrderIdSequence, StdRng) {
        (
            OrderSynthesizer::new(10_000, 0).unwrap(),
            PriceProcess::new("AAPL", 150.0, 0.02).unwrap(),
            OrderIdSequence::new(),
            StdRng::seed_from_u64(1234),
        )
    }

    #[test]
    fn test_synthesize_basic_fields() {
        let (synth, mut process, mut ids, mut rng) = setup();
        let order = synth.synthesize(&mut process, &mut ids, 1.5, &mut rng);

        assert_eq!(order.order_id, 1);
        assert_eq!(order.timestamp, 1_500_000);
        assert_eq!(order.symbol, "AAPL");
        assert!(order.price > 0.0);
        assert!((1..=10_000).contains(&order.quantity));
    }

    #[test]
    fn test_price_offset_by_side() {
        let (synth, mut process, mut ids, mut rng) = setup();
        for i in 0..2_000 {
            let order = synth.synthesize(&mut process, &mut ids, i as f64, &mut rng);
            let market = process.current_price();
            match order.side {
                // rounding may move the price by half a cent either way
                OrderSide::Buy => {
                    assert!(order.price >= market * 0.995 - 0.005);
                    assert!(order.price <= market + 0.005);
                }
                OrderSide::Sell => {
                    assert!(order.price >= market - 0.005);
                    assert!(order.price <= market * 1.005 + 0.005);
                }
            }
        }
    }

    #[test]
    fn test_quantity_is_heavy_tailed_and_capped() {
        let synth = OrderSynthesizer::new(500, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let sizes: Vec<u32> = (0..20_000).map(|_| synth.sample_quantity(&mut rng)).collect();

        assert!(sizes.iter().all(|q| (1..=500).contains(q)));
        // median of Lomax(1.5) * 100 is ~59, so most orders are small
        let small = sizes.iter().filter(|q| **q <= 100).count();
        assert!(small > sizes.len() / 2);
        assert!(sizes.iter().any(|q| *q == 500), "tail never reached the cap");
    }

    #[test]
    fn test_ids_shared_across_processes() {
        let synth = OrderSynthesizer::new(10_000, 0).unwrap();
        let mut ids = OrderIdSequence::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut aapl = PriceProcess::new("AAPL", 150.0, 0.02).unwrap();
        let mut msft = PriceProcess::new("MSFT", 400.0, 0.02).unwrap();

        let a = synth.synthesize(&mut aapl, &mut ids, 0.0, &mut rng);
        let b = synth.synthesize(&mut msft, &mut ids, 0.0, &mut rng);
        assert_ne!(a.order_id, b.order_id);
    }

    #[test]
    fn test_epoch_offset_applied() {
        let synth = OrderSynthesizer::new(10_000, 1_000).unwrap();
        let (_, mut process, mut ids, mut rng) = setup();
        let order = synth.synthesize(&mut process, &mut ids, 0.5, &mut rng);
        assert_eq!(order.timestamp, 501_000);
    }

    #[test]
    fn test_timestamp_saturates_instead_of_wrapping() {
        let synth = OrderSynthesizer::new(10_000, u64::MAX - 1).unwrap();
        let (_, mut process, mut ids, mut rng) = setup();
        let order = synth.synthesize(&mut process, &mut ids, 1.0, &mut rng);
        assert_eq!(order.timestamp, u64::MAX);
    }

    #[test]
    fn test_zero_cap_rejected() {
        assert_eq!(
            OrderSynthesizer::new(0, 0).unwrap_err(),
            ConfigError::InvalidQuantityCap
        );
    }
}
