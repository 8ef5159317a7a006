use super::config::{BatchConfig, ConcurrencyMode};
use super::error::SchedulerError;
use super::order_generator::OrderGenerator;
use super::order_scheduler::OrderScheduler;
use super::report::SimulationReport;
use log::{debug, info};
use rayon::prelude::*;

/// Run one generated scenario to completion and report on it
pub fn run_replication(config: &BatchConfig, replication: usize) -> Result<SimulationReport, SchedulerError> {
    let seed = config.base_seed.wrapping_add(replication as u64);
    let mut generator = OrderGenerator::new(config.orders.clone(), seed)?;
    let mut scheduler = OrderScheduler::new(config.scheduler.clone())?;

    for (arrival, order) in generator.arrivals() {
        scheduler.advance_to(arrival)?;
        scheduler.admit_order(order)?;
    }
    let finished_at = scheduler.run_until_idle()?;
    debug!(
        "[Batch] Replication {} (seed {}) idle at {}",
        replication, seed, finished_at
    );

    let mut report = SimulationReport::from_scheduler(&scheduler);
    report.seed = Some(seed);
    Ok(report)
}

/// Runs independent seeded replications.
///
/// Every replication builds its own scheduler, so the Rayon mode shares no
/// mutable state between threads.
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Reports in replication order
    pub fn run(&self) -> Result<Vec<SimulationReport>, SchedulerError> {
        let replications = self.config.replications;
        info!(
            "[Batch] Running {} replications ({:?})",
            replications, self.config.concurrency_mode
        );
        match self.config.concurrency_mode {
            ConcurrencyMode::Sequential => (0..replications)
                .map(|replication| run_replication(&self.config, replication))
                .collect(),
            ConcurrencyMode::Rayon => {
                let mut builder = rayon::ThreadPoolBuilder::new();
                if let Some(size) = self.config.thread_pool_size {
                    builder = builder.num_threads(size);
                }
                let pool = builder
                    .build()
                    .map_err(|e| SchedulerError::InvalidConfig(e.to_string()))?;
                pool.install(|| {
                    (0..replications)
                        .into_par_iter()
                        .map(|replication| run_replication(&self.config, replication))
                        .collect()
                })
            }
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OrderGenerationConfig;

    fn small_batch(mode: ConcurrencyMode) -> BatchConfig {
        BatchConfig::new()
            .with_orders(OrderGenerationConfig {
                order_count: 20,
                ..OrderGenerationConfig::default()
            })
            .with_replications(4)
            .with_base_seed(100)
            .with_concurrency(mode)
            .with_thread_pool_size(2)
    }

    #[test]
    fn test_every_order_finishes() {
        let reports = BatchRunner::new(small_batch(ConcurrencyMode::Sequential))
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(reports.len(), 4);
        for (index, report) in reports.iter().enumerate() {
            assert_eq!(report.seed, Some(100 + index as u64));
            assert_eq!(report.orders_admitted, 20);
            assert_eq!(report.orders_finished, 20);
            assert_eq!(report.orders_in_flight, 0);
            assert!(report.peak_kitchen_load <= 3);
            assert!(report.peak_delivery_load <= 2);
        }
    }

    #[test]
    fn test_rayon_matches_sequential() {
        let sequential = BatchRunner::new(small_batch(ConcurrencyMode::Sequential))
            .unwrap()
            .run()
            .unwrap();
        let parallel = BatchRunner::new(small_batch(ConcurrencyMode::Rayon))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(sequential, parallel);
    }
}
