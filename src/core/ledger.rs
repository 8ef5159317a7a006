use super::error::SchedulerError;
use super::types::{OrderId, OrderStatus, SimTime};
use std::collections::HashMap;

/// Lifecycle record kept for every order the scheduler has seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub status: OrderStatus,
    pub admitted_at: SimTime,
    pub finished_at: Option<SimTime>,
}

impl OrderRecord {
    /// Time from admission to finalization, if finished
    pub fn turnaround(&self) -> Option<SimTime> {
        self.finished_at.map(|done| done - self.admitted_at)
    }
}

/// Status table enforcing the order state machine.
///
/// Records are never evicted, terminal ones included, so ids stay reserved.
/// Memory therefore grows with every order the scheduler has ever admitted;
/// long-lived owners should recycle the scheduler instance.
#[derive(Debug, Default)]
pub struct StatusLedger {
    records: HashMap<OrderId, OrderRecord>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an order as `Pending`. Ids are never reused.
    pub fn register(&mut self, order_id: OrderId, now: SimTime) -> Result<(), SchedulerError> {
        if self.records.contains_key(&order_id) {
            return Err(SchedulerError::DuplicateOrderId(order_id));
        }
        self.records.insert(
            order_id,
            OrderRecord {
                status: OrderStatus::Pending,
                admitted_at: now,
                finished_at: None,
            },
        );
        Ok(())
    }

    /// Move an order to `next`, rejecting steps the state machine forbids
    pub fn transition(
        &mut self,
        order_id: OrderId,
        next: OrderStatus,
        now: SimTime,
    ) -> Result<(), SchedulerError> {
        let record = self
            .records
            .get_mut(&order_id)
            .ok_or(SchedulerError::NotFound(order_id))?;
        if !record.status.can_transition_to(next) {
            return Err(SchedulerError::InvalidTransition {
                order_id,
                from: record.status,
                to: next,
            });
        }
        record.status = next;
        if next.is_terminal() {
            record.finished_at = Some(now);
        }
        Ok(())
    }

    pub fn status(&self, order_id: OrderId) -> Option<OrderStatus> {
        self.records.get(&order_id).map(|record| record.status)
    }

    pub fn record(&self, order_id: OrderId) -> Option<&OrderRecord> {
        self.records.get(&order_id)
    }

    pub fn records(&self) -> impl Iterator<Item = (&OrderId, &OrderRecord)> {
        self.records.iter()
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.records
            .values()
            .filter(|record| record.status == status)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let mut ledger = StatusLedger::new();
        ledger.register(1, 3).unwrap();
        for status in [
            OrderStatus::InKitchen,
            OrderStatus::WaitingToDelivery,
            OrderStatus::InDelivery,
            OrderStatus::Finished,
        ] {
            ledger.transition(1, status, 30).unwrap();
        }

        let record = ledger.record(1).unwrap();
        assert_eq!(record.status, OrderStatus::Finished);
        assert_eq!(record.turnaround(), Some(27));
    }

    #[test]
    fn test_rejects_skipped_stage() {
        let mut ledger = StatusLedger::new();
        ledger.register(1, 0).unwrap();

        let err = ledger.transition(1, OrderStatus::InDelivery, 1).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::InvalidTransition {
                order_id: 1,
                from: OrderStatus::Pending,
                to: OrderStatus::InDelivery,
            }
        );
        assert_eq!(ledger.status(1), Some(OrderStatus::Pending));
    }

    #[test]
    fn test_terminal_ids_stay_reserved() {
        let mut ledger = StatusLedger::new();
        ledger.register(9, 0).unwrap();
        ledger.transition(9, OrderStatus::Cancelled, 2).unwrap();

        assert_eq!(ledger.register(9, 5), Err(SchedulerError::DuplicateOrderId(9)));
        assert!(ledger.transition(9, OrderStatus::InKitchen, 5).is_err());
        assert_eq!(ledger.count(OrderStatus::Cancelled), 1);
    }
}
