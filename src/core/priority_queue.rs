use super::priority::{ClassFirst, PriorityPolicy};
use super::types::{Order, OrderId};
use std::cmp::Ordering;

/// Backlog of admitted orders that have not entered the kitchen yet.
///
/// Kept sorted by the policy with arrival order as the tie-break. Insertion
/// places a new order after every order it does not strictly outrank, so
/// equal-ranked orders keep their arrival sequence.
#[derive(Debug)]
pub struct PriorityQueue {
    items: Vec<Order>,
    policy: Box<dyn PriorityPolicy>,
}

impl PriorityQueue {
    pub fn new(policy: Box<dyn PriorityPolicy>) -> Self {
        Self {
            items: Vec::new(),
            policy,
        }
    }

    /// Insert at the rank given by the policy. Duplicate ids are the caller's concern.
    pub fn admit(&mut self, order: Order) {
        let rank = self
            .items
            .iter()
            .position(|queued| self.policy.compare(&order, queued) == Ordering::Less)
            .unwrap_or(self.items.len());
        self.items.insert(rank, order);
    }

    /// Remove the order with `order_id`. Returns the removed order if it was queued.
    pub fn cancel(&mut self, order_id: OrderId) -> Option<Order> {
        let index = self.items.iter().position(|order| order.id == order_id)?;
        Some(self.items.remove(index))
    }

    /// Take the highest ranked order
    pub fn pop_front(&mut self) -> Option<Order> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    pub fn peek(&self) -> Option<&Order> {
        self.items.first()
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.items.iter().any(|order| order.id == order_id)
    }

    /// Queued order ids, highest ranked first
    pub fn order_ids(&self) -> Vec<OrderId> {
        self.items.iter().map(|order| order.id).collect()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new(Box::new(ClassFirst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::priority::ArrivalOrder;
    use crate::core::types::Priority;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn order(id: OrderId, priority: Priority) -> Order {
        Order::new(id, 60, priority, 1)
    }

    #[test]
    fn test_vip_jumps_standard_but_not_earlier_vip() {
        let mut queue = PriorityQueue::default();
        queue.admit(order(1, Priority::Standard));
        queue.admit(order(2, Priority::Vip));
        queue.admit(order(3, Priority::Standard));
        queue.admit(order(4, Priority::Vip));

        assert_eq!(queue.order_ids(), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_stays_sorted_after_every_admit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut queue = PriorityQueue::default();

        for id in 0..200 {
            let priority = if rng.gen_bool(0.3) {
                Priority::Vip
            } else {
                Priority::Standard
            };
            queue.admit(order(id, priority));

            let ranked: Vec<(Priority, OrderId)> = queue
                .items
                .iter()
                .map(|queued| (queued.priority, queued.id))
                .collect();
            for pair in ranked.windows(2) {
                let (higher, lower) = (pair[0], pair[1]);
                assert!(
                    higher.0 > lower.0 || (higher.0 == lower.0 && higher.1 < lower.1),
                    "backlog out of order: {:?}",
                    ranked
                );
            }
        }
    }

    #[test]
    fn test_cancel_compacts_and_keeps_order() {
        let mut queue = PriorityQueue::default();
        for (id, priority) in [
            (1, Priority::Standard),
            (2, Priority::Vip),
            (3, Priority::Standard),
        ] {
            queue.admit(order(id, priority));
        }

        let removed = queue.cancel(1).expect("order 1 is queued");
        assert_eq!(removed.id, 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.order_ids(), vec![2, 3]);
        assert_eq!(queue.pop_front().map(|o| o.id), Some(2));
        assert_eq!(queue.pop_front().map(|o| o.id), Some(3));
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn test_cancel_missing_is_noop() {
        let mut queue = PriorityQueue::default();
        queue.admit(order(1, Priority::Standard));

        assert!(queue.cancel(42).is_none());
        assert!(queue.cancel(42).is_none());
        assert_eq!(queue.order_ids(), vec![1]);
    }

    #[test]
    fn test_arrival_policy_is_fifo() {
        let mut queue = PriorityQueue::new(Box::new(ArrivalOrder));
        queue.admit(order(1, Priority::Standard));
        queue.admit(order(2, Priority::Vip));

        assert_eq!(queue.policy_name(), "arrival-order");
        assert_eq!(queue.order_ids(), vec![1, 2]);
    }
}
