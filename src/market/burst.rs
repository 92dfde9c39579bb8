use rand::Rng;

use crate::domain::{round_price, Order, OrderIdSequence, OrderSide};
use crate::market::{OrderSynthesizer, PriceProcess};

/// Price band around the burst anchor.
pub const BURST_SPREAD: (f64, f64) = (0.998, 1.002);
/// Gap between consecutive burst orders, in seconds.
pub const BURST_JITTER: (f64, f64) = (0.0001, 0.001);

/// Orders produced by one burst plus where its clock stopped.
#[derive(Debug, Clone)]
pub struct Burst {
    pub side: OrderSide,
    /// Live price of the process when the burst started.
    pub anchor_price: f64,
    pub orders: Vec<Order>,
    /// Time, in seconds, after the last order of the burst.
    pub end_time: f64,
}

/// Simulates one aggressive participant: a tight run of same-side orders
/// priced right at the market.
#[derive(Debug, Clone, Default)]
pub struct BurstInjector;

impl BurstInjector {
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn inject<R: Rng + ?Sized>(
        &self,
        synthesizer: &OrderSynthesizer,
        process: &mut PriceProcess,
        ids: &mut OrderIdSequence,
        start: f64,
        count: usize,
        side: Option<OrderSide>,
        rng: &mut R,
    ) -> Burst {
        let side = side.unwrap_or_else(|| {
            if rng.gen_bool(0.5) {
                OrderSide::Buy
            } else {
                OrderSide::Sell
            }
        });
        let anchor_price = process.current_price();

        let mut orders = Vec::with_capacity(count);
        let mut at = start;
        for _ in 0..count {
            let mut order = synthesizer.synthesize(process, ids, at, rng);
            order.side = side;
            order.price = round_price(anchor_price * rng.gen_range(BURST_SPREAD.0..=BURST_SPREAD.1));
            orders.push(order);

            at += rng.gen_range(BURST_JITTER.0..=BURST_JITTER.1);
        }

        Burst {
            side,
            anchor_price,
            orders,
            end_time: at,
        }
    }
}
