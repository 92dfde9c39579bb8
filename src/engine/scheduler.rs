use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::{BurstSizeRange, ConfigError, GenerationConfig};
use crate::domain::{Order, OrderIdSequence};
use crate::market::{BurstInjector, OrderSynthesizer, PriceProcess};

const PROGRESS_INTERVAL: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running, // accumulating orders
    Sorting,
    Done,
}

/// Drives a whole generation run: interleaves instruments, mixes single
/// orders with bursts and finally puts everything in time order.
pub struct FlowScheduler<R = StdRng> {
    config: GenerationConfig,
    state: SchedulerState,
    rng: R,
    seed: Option<u64>,
    // keyed by exactly the configured symbols
    processes: BTreeMap<String, PriceProcess>,
    synthesizer: OrderSynthesizer,
    injector: BurstInjector,
    ids: OrderIdSequence,
    orders: Vec<Order>,
    current_time: f64,
    time_step: f64,
    bursts: usize,
}

impl FlowScheduler<StdRng> {
    /// Seeds a `StdRng` from the config, or from entropy when no seed is set.
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut scheduler = Self::with_rng(config, StdRng::seed_from_u64(seed))?;
        scheduler.seed = Some(seed);
        Ok(scheduler)
    }
}

impl<R: Rng> FlowScheduler<R> {
    pub fn with_rng(config: GenerationConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let processes = config
            .symbols
            .iter()
            .map(|symbol| {
                let base_price = config.base_price(symbol);
                let process = PriceProcess::new(symbol.clone(), base_price, config.volatility)?;
                Ok::<_, ConfigError>((symbol.clone(), process))
            })
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;
        let synthesizer = OrderSynthesizer::new(config.quantity_cap, config.start_time_us)?;
        let time_step = config.time_step();
        let capacity = config.num_orders;

        Ok(Self {
            config,
            state: SchedulerState::Running,
            rng,
            seed: None,
            processes,
            synthesizer,
            injector: BurstInjector::new(),
            ids: OrderIdSequence::new(),
            orders: Vec::with_capacity(capacity),
            current_time: 0.0,
            time_step,
            bursts: 0,
        })
    }

    /// Advances the state machine by one iteration and returns the new state.
    pub fn step(&mut self) -> SchedulerState {
        match self.state {
            SchedulerState::Running => {
                if self.orders.len() >= self.config.num_orders {
                    debug!(
                        orders = self.orders.len(),
                        bursts = self.bursts,
                        "generation complete, sorting"
                    );
                    self.state = SchedulerState::Sorting;
                } else {
                    self.advance();
                }
            }
            SchedulerState::Sorting => {
                // stable, so same-timestamp orders keep their generation order
                self.orders.sort_by_key(|o| o.timestamp);
                self.state = SchedulerState::Done;
            }
            SchedulerState::Done => {}
        }
        self.state
    }

    /// Runs to completion and returns the time-ordered orders.
    pub fn run(mut self) -> Vec<Order> {
        info!(
            num_orders = self.config.num_orders,
            symbols = ?self.config.symbols,
            duration_hours = self.config.duration_hours,
            seed = ?self.seed,
            "generating orders"
        );
        while self.step() != SchedulerState::Done {}
        info!(orders = self.orders.len(), bursts = self.bursts, "generated orders");
        self.orders
    }

    fn advance(&mut self) {
        let generated = self.orders.len();
        let remaining = self.config.num_orders - generated;
        let BurstSizeRange { min, max } = self.config.burst_size_range;

        let symbol = &self.config.symbols[self.rng.gen_range(0..self.config.symbols.len())];
        let Some(process) = self.processes.get_mut(symbol) else {
            return;
        };

        // a burst only fires when even the largest one fits the budget
        let wants_burst = self.rng.gen_bool(self.config.burst_probability);
        if wants_burst && remaining >= max {
            let size = self.rng.gen_range(min..=max);
            let burst = self.injector.inject(
                &self.synthesizer,
                process,
                &mut self.ids,
                self.current_time,
                size,
                None,
                &mut self.rng,
            );
            debug!(
                symbol = process.symbol(),
                side = %burst.side,
                size,
                anchor = burst.anchor_price,
                "burst"
            );
            self.orders.extend(burst.orders);
            self.bursts += 1;
            self.current_time =
                (self.current_time + self.time_step * size as f64).max(burst.end_time);
        } else {
            let order = self.synthesizer.synthesize(
                process,
                &mut self.ids,
                self.current_time,
                &mut self.rng,
            );
            self.orders.push(order);
            let half = self.time_step / 2.0;
            let jitter = if half > 0.0 {
                self.rng.gen_range(-half..half)
            } else {
                0.0
            };
            self.current_time += self.time_step + jitter;
        }

        if self.orders.len() / PROGRESS_INTERVAL > generated / PROGRESS_INTERVAL {
            info!("generated {} orders...", self.orders.len());
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Seed the RNG was built from, if the scheduler created it.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn bursts(&self) -> usize {
        self.bursts
    }

    /// Simulated clock in seconds since the epoch.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn process(&self, symbol: &str) -> Option<&PriceProcess> {
        self.processes.get(symbol)
    }
}
