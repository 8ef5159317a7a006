use super::config::OrderGenerationConfig;
use super::error::SchedulerError;
use super::types::{Order, OrderId, Priority, SimTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp;

/// Seeded stream of customer orders with exponential inter-arrival times
#[derive(Debug)]
pub struct OrderGenerator {
    config: OrderGenerationConfig,
    rng: StdRng,
    interarrival: Exp<f64>,
    next_id: OrderId,
    clock: f64,
}

impl OrderGenerator {
    pub fn new(config: OrderGenerationConfig, seed: u64) -> Result<Self, SchedulerError> {
        config.validate()?;
        let interarrival = Exp::new(1.0 / config.mean_interarrival)
            .map_err(|e| SchedulerError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            interarrival,
            next_id: 1,
            clock: 0.0,
        })
    }

    /// Next order and the time it arrives. Arrival times never decrease.
    pub fn next_arrival(&mut self) -> (SimTime, Order) {
        self.clock += self.rng.sample(self.interarrival);
        let dish_count = self
            .rng
            .gen_range(self.config.min_dishes..=self.config.max_dishes);
        let ttl_secs = self
            .rng
            .gen_range(self.config.min_ttl_secs..=self.config.max_ttl_secs);
        let priority = if self.rng.gen_bool(self.config.vip_ratio) {
            Priority::Vip
        } else {
            Priority::Standard
        };

        let order = Order::new(self.next_id, ttl_secs, priority, dish_count);
        self.next_id += 1;
        (self.clock.round() as SimTime, order)
    }

    /// The configured number of arrivals, in time order
    pub fn arrivals(&mut self) -> Vec<(SimTime, Order)> {
        (0..self.config.order_count)
            .map(|_| self.next_arrival())
            .collect()
    }
}
