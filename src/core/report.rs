use super::order_scheduler::OrderScheduler;
use super::types::{OrderStatus, SimTime};
use log::info;
use serde::{Deserialize, Serialize};

/// Metrics for one scheduler run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Seed of the order stream, if the run was generated
    pub seed: Option<u64>,
    pub orders_admitted: usize,
    pub orders_finished: usize,
    pub orders_cancelled: usize,
    /// Orders neither finished nor cancelled when the report was taken
    pub orders_in_flight: usize,
    pub dishes_cooked: u64,
    /// Mean admission-to-delivery time over finished orders
    pub mean_turnaround: f64,
    pub max_turnaround: SimTime,
    pub peak_kitchen_load: usize,
    pub peak_delivery_load: usize,
    /// Time the last order finished
    pub makespan: SimTime,
}

impl SimulationReport {
    pub fn from_scheduler(scheduler: &OrderScheduler) -> Self {
        let ledger = scheduler.ledger();
        let turnarounds: Vec<SimTime> = ledger
            .records()
            .filter(|(_, record)| record.status == OrderStatus::Finished)
            .filter_map(|(_, record)| record.turnaround())
            .collect();
        let makespan = ledger
            .records()
            .filter(|(_, record)| record.status == OrderStatus::Finished)
            .filter_map(|(_, record)| record.finished_at)
            .max()
            .unwrap_or(0);
        let mean_turnaround = if turnarounds.is_empty() {
            0.0
        } else {
            turnarounds.iter().sum::<SimTime>() as f64 / turnarounds.len() as f64
        };
        let orders_finished = ledger.count(OrderStatus::Finished);
        let orders_cancelled = ledger.count(OrderStatus::Cancelled);

        Self {
            seed: None,
            orders_admitted: ledger.len(),
            orders_finished,
            orders_cancelled,
            orders_in_flight: ledger.len() - orders_finished - orders_cancelled,
            dishes_cooked: scheduler.kitchen().dishes_cooked(),
            mean_turnaround,
            max_turnaround: turnarounds.into_iter().max().unwrap_or(0),
            peak_kitchen_load: scheduler.kitchen().peak_in_use(),
            peak_delivery_load: scheduler.delivery().peak_in_use(),
            makespan,
        }
    }

    /// Finished orders per time unit
    pub fn throughput(&self) -> f64 {
        if self.makespan == 0 {
            0.0
        } else {
            self.orders_finished as f64 / self.makespan as f64
        }
    }

    pub fn log_summary(&self) {
        info!("[Report] === RUN SUMMARY (seed: {:?}) ===", self.seed);
        info!(
            "[Report] Orders: {} admitted, {} finished, {} cancelled, {} in flight",
            self.orders_admitted, self.orders_finished, self.orders_cancelled, self.orders_in_flight
        );
        info!(
            "[Report] Turnaround: mean {:.2}, max {} | makespan {} | throughput {:.3}",
            self.mean_turnaround,
            self.max_turnaround,
            self.makespan,
            self.throughput()
        );
        info!(
            "[Report] Peak load: {} stands, {} couriers | dishes cooked {}",
            self.peak_kitchen_load, self.peak_delivery_load, self.dishes_cooked
        );
    }
}

/// Aggregate over several replications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub replications: usize,
    pub orders_finished: usize,
    pub mean_turnaround: f64,
    pub worst_turnaround: SimTime,
    pub mean_makespan: f64,
}

impl BatchSummary {
    pub fn from_reports(reports: &[SimulationReport]) -> Self {
        let replications = reports.len();
        let average = |value: f64| {
            if replications == 0 {
                0.0
            } else {
                value / replications as f64
            }
        };
        Self {
            replications,
            orders_finished: reports.iter().map(|r| r.orders_finished).sum(),
            mean_turnaround: average(reports.iter().map(|r| r.mean_turnaround).sum()),
            worst_turnaround: reports.iter().map(|r| r.max_turnaround).max().unwrap_or(0),
            mean_makespan: average(reports.iter().map(|r| r.makespan as f64).sum()),
        }
    }
}
