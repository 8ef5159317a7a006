use super::config::SchedulerConfig;
use super::delivery::DeliveryScheduler;
use super::dispatch::DispatchContext;
use super::error::SchedulerError;
use super::event::{Event, EventKind};
use super::event_bus::{EventBus, SubscriptionId, Subscribers};
use super::kitchen::KitchenScheduler;
use super::ledger::{OrderRecord, StatusLedger};
use super::priority::PriorityPolicy;
use super::priority_queue::PriorityQueue;
use super::timer_queue::{Timer, TimerQueue};
use super::types::{Order, OrderId, OrderStatus, SimTime};
use log::{debug, error, info, warn};

/// Whether the scheduler still accepts work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    /// Stopped by the owner; pending timers were released
    ShutDown,
    /// Stopped after an internal invariant failed
    Halted,
}

/// Coordinator owning the backlog, both stage schedulers and the clock.
///
/// All mutation happens on the caller's thread: admission and cancellation
/// directly, timer expiries when the clock is advanced with [`step`],
/// [`advance_to`] or [`run_until_idle`]. Timers fire one at a time in expiry
/// order.
///
/// [`step`]: OrderScheduler::step
/// [`advance_to`]: OrderScheduler::advance_to
/// [`run_until_idle`]: OrderScheduler::run_until_idle
pub struct OrderScheduler {
    config: SchedulerConfig,
    backlog: PriorityQueue,
    kitchen: KitchenScheduler,
    delivery: DeliveryScheduler,
    timers: TimerQueue,
    ledger: StatusLedger,
    subscribers: Subscribers,
    clock: SimTime,
    lifecycle: Lifecycle,
}

impl OrderScheduler {
    /// Create a scheduler using the policy named in `config`
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let policy = config.policy.build();
        Self::with_policy(config, policy)
    }

    /// Create a scheduler with a caller-supplied backlog policy
    pub fn with_policy(
        config: SchedulerConfig,
        policy: Box<dyn PriorityPolicy>,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;
        info!(
            "[Scheduler] {} cooking stands, {} messengers, cook {} / delivery {} units, policy {}",
            config.cooking_stands,
            config.messengers,
            config.cook_duration,
            config.delivery_duration,
            policy.name()
        );
        Ok(Self {
            backlog: PriorityQueue::new(policy),
            kitchen: KitchenScheduler::new(config.cooking_stands, config.cook_duration),
            delivery: DeliveryScheduler::new(config.messengers, config.delivery_duration),
            timers: TimerQueue::new(),
            ledger: StatusLedger::new(),
            subscribers: Subscribers::new(),
            clock: 0,
            lifecycle: Lifecycle::Running,
            config,
        })
    }

    /// Register a callback for one kind of notification
    pub fn subscribe<F>(&mut self, kind: EventKind, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.subscribers.subscribe(kind, Box::new(subscriber))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Queue a new order and dispatch it immediately if a stand is free
    pub fn admit_order(&mut self, order: Order) -> Result<(), SchedulerError> {
        self.ensure_running()?;
        if order.dishes.is_empty() {
            warn!("[Scheduler] Rejected order {} with no dishes", order.id);
            return Err(SchedulerError::EmptyOrder(order.id));
        }
        if !order.dishes_consistent() {
            warn!("[Scheduler] Rejected order {} with mismatched dishes", order.id);
            return Err(SchedulerError::MalformedOrder(order.id));
        }
        if let Err(err) = self.ledger.register(order.id, self.clock) {
            warn!("[Scheduler] Rejected order {}: {}", order.id, err);
            return Err(err);
        }
        self.subscribers
            .publish(&Event::status_changed(self.clock, order.id, OrderStatus::Pending));
        info!(
            "[Scheduler] Order {} ({}, {} dishes) admitted at {}",
            order.id,
            order.priority,
            order.dish_count(),
            self.clock
        );
        self.backlog.admit(order);

        if self.kitchen.has_free_stand() {
            let result = self.fill_kitchen();
            self.guard(result)?;
        }
        Ok(())
    }

    /// Remove a pending order. Orders already in the kitchen or out for
    /// delivery are not affected; returns false for those and unknown ids.
    /// A halted scheduler refuses; a shut-down one still edits its backlog.
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        if self.lifecycle == Lifecycle::Halted {
            warn!("[Scheduler] Cancel of order {} refused: scheduler halted", order_id);
            return false;
        }
        if self.backlog.cancel(order_id).is_none() {
            debug!("[Scheduler] Cancel of order {} ignored: not pending", order_id);
            return false;
        }
        let mut ctx = DispatchContext::new(
            self.clock,
            &mut self.timers,
            &mut self.ledger,
            &mut self.subscribers,
        );
        let result = ctx.transition(order_id, OrderStatus::Cancelled);
        if self.guard(result).is_err() {
            return false;
        }
        info!("[Scheduler] Order {} cancelled at {}", order_id, self.clock);
        true
    }

    /// Fire the next timer. Returns true while more timers remain.
    pub fn step(&mut self) -> Result<bool, SchedulerError> {
        self.ensure_running()?;
        let Some(next) = self.timers.peek_next_expiry() else {
            return Ok(false);
        };
        if let Some((at, timer)) = self.timers.pop_due(next) {
            self.clock = at;
            self.run_timer(timer)?;
        }
        Ok(!self.timers.is_empty())
    }

    /// Fire every timer expiring at or before `time`, then set the clock to
    /// `time`. Returns how many timers fired.
    pub fn advance_to(&mut self, time: SimTime) -> Result<usize, SchedulerError> {
        self.ensure_running()?;
        if time < self.clock {
            return Err(SchedulerError::ClockRegression {
                now: self.clock,
                requested: time,
            });
        }
        let mut fired = 0;
        while let Some((at, timer)) = self.timers.pop_due(time) {
            self.clock = at;
            self.run_timer(timer)?;
            fired += 1;
        }
        self.clock = time;
        Ok(fired)
    }

    pub fn advance_by(&mut self, delta: SimTime) -> Result<usize, SchedulerError> {
        self.advance_to(self.clock.saturating_add(delta))
    }

    /// Run until no timers remain, returns the final clock value
    pub fn run_until_idle(&mut self) -> Result<SimTime, SchedulerError> {
        while self.step()? {}
        Ok(self.clock)
    }

    /// Stop the scheduler. In-flight dishes and deliveries are abandoned and
    /// all listeners are dropped. Returns the number of released timers.
    pub fn shutdown(&mut self) -> usize {
        if self.lifecycle == Lifecycle::Running {
            self.lifecycle = Lifecycle::ShutDown;
        }
        let abandoned = self.timers.cancel_all();
        self.subscribers.clear();
        info!(
            "[Scheduler] Shut down at {}, {} timers abandoned",
            self.clock, abandoned
        );
        abandoned
    }

    /// Register a raw timer, bypassing the stage schedulers
    #[cfg(test)]
    pub(crate) fn inject_timer(&mut self, delay: SimTime, timer: Timer) {
        self.timers.schedule_after(self.clock, delay, timer);
    }

    fn run_timer(&mut self, timer: Timer) -> Result<(), SchedulerError> {
        let result = self.fire(timer);
        self.guard(result)
    }

    fn fire(&mut self, timer: Timer) -> Result<(), SchedulerError> {
        let mut ctx = DispatchContext::new(
            self.clock,
            &mut self.timers,
            &mut self.ledger,
            &mut self.subscribers,
        );
        match timer {
            Timer::DishCooked(key) => {
                if let Some(order) = self.kitchen.complete_dish(key)? {
                    info!(
                        "[Kitchen] Order {} kitchen-complete at {}",
                        order.id,
                        ctx.now()
                    );
                    self.delivery.enqueue(order, &mut ctx)?;
                }
                self.kitchen
                    .try_admit_next_order(&mut self.backlog, &mut ctx)?;
            }
            Timer::DeliveryArrived(order_id) => {
                self.delivery.complete_delivery(order_id, &mut ctx)?;
            }
        }
        Ok(())
    }

    fn fill_kitchen(&mut self) -> Result<(), SchedulerError> {
        let mut ctx = DispatchContext::new(
            self.clock,
            &mut self.timers,
            &mut self.ledger,
            &mut self.subscribers,
        );
        self.kitchen
            .try_admit_next_order(&mut self.backlog, &mut ctx)?;
        Ok(())
    }

    /// Halt on errors that mean internal state is corrupt
    fn guard<T>(&mut self, result: Result<T, SchedulerError>) -> Result<T, SchedulerError> {
        if let Err(err) = &result {
            if err.is_fatal() {
                error!("[Scheduler] Halting at {}: {}", self.clock, err);
                self.lifecycle = Lifecycle::Halted;
                self.timers.cancel_all();
            }
        }
        result
    }

    fn ensure_running(&self) -> Result<(), SchedulerError> {
        match self.lifecycle {
            Lifecycle::Running => Ok(()),
            Lifecycle::ShutDown => Err(SchedulerError::ShutDown),
            Lifecycle::Halted => Err(SchedulerError::Halted),
        }
    }

    /// Get current simulation time
    pub fn now(&self) -> SimTime {
        self.clock
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn status(&self, order_id: OrderId) -> Option<OrderStatus> {
        self.ledger.status(order_id)
    }

    pub fn record(&self, order_id: OrderId) -> Option<&OrderRecord> {
        self.ledger.record(order_id)
    }

    pub fn ledger(&self) -> &StatusLedger {
        &self.ledger
    }

    pub fn backlog(&self) -> &PriorityQueue {
        &self.backlog
    }

    pub fn kitchen(&self) -> &KitchenScheduler {
        &self.kitchen
    }

    pub fn delivery(&self) -> &DeliveryScheduler {
        &self.delivery
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
