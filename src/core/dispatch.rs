use super::error::SchedulerError;
use super::event::Event;
use super::event_bus::EventBus;
use super::ledger::StatusLedger;
use super::timer_queue::{Timer, TimerQueue};
use super::types::{OrderId, OrderStatus, SimTime};

/// Borrowed view of the coordinator state a stage scheduler may touch
/// while dispatching: the clock, the timer queue, the status ledger and
/// the event bus.
pub struct DispatchContext<'a> {
    now: SimTime,
    timers: &'a mut TimerQueue,
    ledger: &'a mut StatusLedger,
    bus: &'a mut dyn EventBus,
}

impl<'a> DispatchContext<'a> {
    pub fn new(
        now: SimTime,
        timers: &'a mut TimerQueue,
        ledger: &'a mut StatusLedger,
        bus: &'a mut dyn EventBus,
    ) -> Self {
        Self {
            now,
            timers,
            ledger,
            bus,
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn schedule_after(&mut self, delay: SimTime, timer: Timer) {
        self.timers.schedule_after(self.now, delay, timer);
    }

    /// Record a status change and publish `StatusChanged`
    pub fn transition(&mut self, order_id: OrderId, status: OrderStatus) -> Result<(), SchedulerError> {
        self.ledger.transition(order_id, status, self.now)?;
        self.bus
            .publish(&Event::status_changed(self.now, order_id, status));
        Ok(())
    }

    /// Terminal step: `Finished` status followed by `OrderFinished`
    pub fn finish(&mut self, order_id: OrderId) -> Result<(), SchedulerError> {
        self.transition(order_id, OrderStatus::Finished)?;
        self.bus.publish(&Event::order_finished(self.now, order_id));
        Ok(())
    }
}
