use super::dispatch::DispatchContext;
use super::error::{Resource, SchedulerError};
use super::timer_queue::Timer;
use super::types::{Order, OrderId, OrderStatus, SimTime};
use log::{debug, info};

/// Owns the couriers.
///
/// Kitchen-complete orders wait in a stack: when a courier frees up the most
/// recently completed order goes out first.
#[derive(Debug)]
pub struct DeliveryScheduler {
    capacity: usize,
    delivery_duration: SimTime,
    /// Orders currently out with a courier
    in_delivery: Vec<Order>,
    /// Kitchen-complete orders without a courier, newest last
    waiting: Vec<Order>,
    peak_in_use: usize,
    delivered: u64,
}

impl DeliveryScheduler {
    pub fn new(capacity: usize, delivery_duration: SimTime) -> Self {
        Self {
            capacity,
            delivery_duration,
            in_delivery: Vec::with_capacity(capacity),
            waiting: Vec::new(),
            peak_in_use: 0,
            delivered: 0,
        }
    }

    pub fn has_free_messenger(&self) -> bool {
        self.in_delivery.len() < self.capacity
    }

    /// Accept a kitchen-complete order and dispatch it if a courier is free
    pub fn enqueue(&mut self, order: Order, ctx: &mut DispatchContext<'_>) -> Result<(), SchedulerError> {
        ctx.transition(order.id, OrderStatus::WaitingToDelivery)?;
        debug!(
            "[Delivery] Order {} waiting for a courier ({} already waiting)",
            order.id,
            self.waiting.len()
        );
        self.waiting.push(order);
        self.try_admit_next_delivery(ctx)?;
        Ok(())
    }

    /// Hand waiting orders to free couriers, newest first.
    /// Returns the ids dispatched.
    pub fn try_admit_next_delivery(
        &mut self,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<OrderId>, SchedulerError> {
        let mut dispatched = Vec::new();
        while self.has_free_messenger() {
            let Some(order) = self.waiting.pop() else {
                break;
            };
            dispatched.push(order.id);
            self.start_delivery(order, ctx)?;
        }
        Ok(dispatched)
    }

    /// Occupy one courier with `order` and start the delivery timer
    pub fn start_delivery(&mut self, order: Order, ctx: &mut DispatchContext<'_>) -> Result<(), SchedulerError> {
        if !self.has_free_messenger() {
            return Err(SchedulerError::CapacityInvariantViolation {
                resource: Resource::Messenger,
                capacity: self.capacity,
            });
        }
        ctx.transition(order.id, OrderStatus::InDelivery)?;
        ctx.schedule_after(self.delivery_duration, Timer::DeliveryArrived(order.id));
        info!(
            "[Delivery] Order {} out for delivery at {} ({}/{} couriers busy)",
            order.id,
            ctx.now(),
            self.in_delivery.len() + 1,
            self.capacity
        );
        self.in_delivery.push(order);
        self.peak_in_use = self.peak_in_use.max(self.in_delivery.len());
        Ok(())
    }

    /// Release the courier carrying `order_id`, finalize the order and
    /// backfill from the waiting stack
    pub fn complete_delivery(
        &mut self,
        order_id: OrderId,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Order, SchedulerError> {
        let index = self
            .in_delivery
            .iter()
            .position(|order| order.id == order_id)
            .ok_or(SchedulerError::NotFound(order_id))?;
        let order = self.in_delivery.swap_remove(index);
        self.delivered += 1;
        ctx.finish(order_id)?;
        info!("[Delivery] Order {} delivered at {}", order_id, ctx.now());
        self.try_admit_next_delivery(ctx)?;
        Ok(order)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.in_delivery.len()
    }

    pub fn peak_in_use(&self) -> usize {
        self.peak_in_use
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Waiting order ids, next to dispatch last
    pub fn waiting_ids(&self) -> Vec<OrderId> {
        self.waiting.iter().map(|order| order.id).collect()
    }

    pub fn in_delivery_ids(&self) -> Vec<OrderId> {
        self.in_delivery.iter().map(|order| order.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Event, EventKind};
    use crate::core::ledger::StatusLedger;
    use crate::core::timer_queue::TimerQueue;
    use crate::core::types::Priority;

    fn kitchen_complete(ledger: &mut StatusLedger, id: OrderId) -> Order {
        ledger.register(id, 0).unwrap();
        ledger.transition(id, OrderStatus::InKitchen, 0).unwrap();
        Order::new(id, 60, Priority::Standard, 1)
    }

    #[test]
    fn test_waiting_orders_leave_newest_first() {
        let mut timers = TimerQueue::new();
        let mut ledger = StatusLedger::new();
        let mut events: Vec<Event> = Vec::new();
        let mut delivery = DeliveryScheduler::new(1, 20);

        let orders: Vec<Order> = (1..=3).map(|id| kitchen_complete(&mut ledger, id)).collect();
        let mut ctx = DispatchContext::new(0, &mut timers, &mut ledger, &mut events);
        for order in orders {
            delivery.enqueue(order, &mut ctx).unwrap();
        }
        assert_eq!(delivery.in_delivery_ids(), vec![1]);
        assert_eq!(delivery.waiting_ids(), vec![2, 3]);

        let mut ctx = DispatchContext::new(20, &mut timers, &mut ledger, &mut events);
        delivery.complete_delivery(1, &mut ctx).unwrap();
        assert_eq!(delivery.in_delivery_ids(), vec![3]);
        assert_eq!(delivery.waiting_ids(), vec![2]);
        assert_eq!(delivery.delivered(), 1);
        assert_eq!(ledger.status(1), Some(OrderStatus::Finished));
        assert_eq!(ledger.status(3), Some(OrderStatus::InDelivery));
    }

    #[test]
    fn test_completion_emits_finished_then_order_finished() {
        let mut timers = TimerQueue::new();
        let mut ledger = StatusLedger::new();
        let mut events: Vec<Event> = Vec::new();
        let mut delivery = DeliveryScheduler::new(2, 20);

        let order = kitchen_complete(&mut ledger, 4);
        let mut ctx = DispatchContext::new(0, &mut timers, &mut ledger, &mut events);
        delivery.enqueue(order, &mut ctx).unwrap();
        let mut ctx = DispatchContext::new(20, &mut timers, &mut ledger, &mut events);
        delivery.complete_delivery(4, &mut ctx).unwrap();

        let tail: Vec<EventKind> = events.iter().rev().take(2).map(Event::kind).collect();
        assert_eq!(tail, vec![EventKind::OrderFinished, EventKind::StatusChanged]);
        assert_eq!(delivery.in_use(), 0);
        assert_eq!(delivery.peak_in_use(), 1);
    }

    #[test]
    fn test_unknown_delivery_is_not_found() {
        let mut timers = TimerQueue::new();
        let mut ledger = StatusLedger::new();
        let mut events: Vec<Event> = Vec::new();
        let mut delivery = DeliveryScheduler::new(1, 20);

        let mut ctx = DispatchContext::new(0, &mut timers, &mut ledger, &mut events);
        assert_eq!(
            delivery.complete_delivery(8, &mut ctx).unwrap_err(),
            SchedulerError::NotFound(8)
        );
    }
}
