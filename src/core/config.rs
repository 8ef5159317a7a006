//! Configuration for the order scheduler and the simulation driver
//!
//! Capacity counts and durations are supplied by the owner of the scheduler;
//! the core only validates them. Everything here derives serde so a whole
//! setup can be loaded from JSON.

use super::error::SchedulerError;
use super::priority::PolicyKind;
use super::types::SimTime;
use serde::{Deserialize, Serialize};

/// Capacity and timing for one scheduler instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of dishes that can cook at the same time
    pub cooking_stands: usize,
    /// Number of orders that can be out for delivery at the same time
    pub messengers: usize,
    /// Time units a dish occupies a stand
    pub cook_duration: SimTime,
    /// Time units an order occupies a courier
    pub delivery_duration: SimTime,
    pub policy: PolicyKind,
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cooking_stands(mut self, stands: usize) -> Self {
        self.cooking_stands = stands;
        self
    }

    pub fn with_messengers(mut self, messengers: usize) -> Self {
        self.messengers = messengers;
        self
    }

    pub fn with_cook_duration(mut self, duration: SimTime) -> Self {
        self.cook_duration = duration;
        self
    }

    pub fn with_delivery_duration(mut self, duration: SimTime) -> Self {
        self.delivery_duration = duration;
        self
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.cooking_stands == 0 {
            return Err(SchedulerError::InvalidConfig(
                "Number of cooking stands must be at least 1".to_string(),
            ));
        }
        if self.messengers == 0 {
            return Err(SchedulerError::InvalidConfig(
                "Number of messengers must be at least 1".to_string(),
            ));
        }
        if self.cook_duration == 0 || self.delivery_duration == 0 {
            return Err(SchedulerError::InvalidConfig(
                "Cook and delivery durations must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, SchedulerError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SchedulerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cooking_stands: 3,
            messengers: 2,
            cook_duration: 5,
            delivery_duration: 20,
            policy: PolicyKind::ClassFirst,
        }
    }
}

/// Shape of the random order stream fed into a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderGenerationConfig {
    pub order_count: usize,
    /// Mean time between arrivals
    pub mean_interarrival: f64,
    pub min_dishes: usize,
    pub max_dishes: usize,
    pub min_ttl_secs: u32,
    pub max_ttl_secs: u32,
    /// Probability that an order is VIP
    pub vip_ratio: f64,
}

impl OrderGenerationConfig {
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !(self.mean_interarrival > 0.0) {
            return Err(SchedulerError::InvalidConfig(
                "Mean interarrival time must be greater than 0".to_string(),
            ));
        }
        if self.min_dishes == 0 {
            return Err(SchedulerError::InvalidConfig(
                "Orders need at least one dish".to_string(),
            ));
        }
        if self.min_dishes > self.max_dishes {
            return Err(SchedulerError::InvalidConfig(
                "Min dishes cannot be greater than max dishes".to_string(),
            ));
        }
        if self.min_ttl_secs > self.max_ttl_secs {
            return Err(SchedulerError::InvalidConfig(
                "Min TTL cannot be greater than max TTL".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.vip_ratio) {
            return Err(SchedulerError::InvalidConfig(
                "VIP ratio must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OrderGenerationConfig {
    fn default() -> Self {
        Self {
            order_count: 50,
            mean_interarrival: 4.0,
            min_dishes: 1,
            max_dishes: 4,
            min_ttl_secs: 30,
            max_ttl_secs: 120,
            vip_ratio: 0.2,
        }
    }
}

/// Enumeration of supported concurrency modes for batch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications run on a Rayon thread pool
    Rayon,
}

/// Configuration for running many seeded replications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub scheduler: SchedulerConfig,
    pub orders: OrderGenerationConfig,
    pub replications: usize,
    /// Replication `i` is seeded with `base_seed + i`
    pub base_seed: u64,
    pub concurrency_mode: ConcurrencyMode,
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_orders(mut self, orders: OrderGenerationConfig) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        self.scheduler.validate()?;
        self.orders.validate()?;
        if self.thread_pool_size == Some(0) {
            return Err(SchedulerError::InvalidConfig(
                "Thread pool size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            orders: OrderGenerationConfig::default(),
            replications: 8,
            base_seed: 42,
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }
}
