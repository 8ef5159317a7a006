use super::types::{DishKey, OrderId, SimTime};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Work that runs when a timer expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// A dish finished cooking and frees its stand
    DishCooked(DishKey),
    /// A courier delivered the order and is free again
    DeliveryArrived(OrderId),
}

/// Single-shot delayed tasks keyed by absolute expiry time.
///
/// The heap holds `(expires_at, sequence_num)` keys wrapped in `Reverse` so
/// the earliest expiry pops first; equal expiries pop in registration order.
/// Payloads live beside the heap, keyed by sequence number.
pub struct TimerQueue {
    expiries: BinaryHeap<Reverse<(SimTime, u64)>>,
    payloads: HashMap<u64, Timer>,
    sequence_counter: u64,
}

impl TimerQueue {
    /// Create an empty TimerQueue
    pub fn new() -> Self {
        Self {
            expiries: BinaryHeap::new(),
            payloads: HashMap::new(),
            sequence_counter: 0,
        }
    }

    /// Register `timer` to fire `delay` units after `now`
    pub fn schedule_after(&mut self, now: SimTime, delay: SimTime, timer: Timer) {
        let sequence_num = self.sequence_counter;
        self.sequence_counter += 1;
        self.expiries
            .push(Reverse((now.saturating_add(delay), sequence_num)));
        self.payloads.insert(sequence_num, timer);
    }

    /// Remove and return the earliest timer expiring at or before `until`
    pub fn pop_due(&mut self, until: SimTime) -> Option<(SimTime, Timer)> {
        let Reverse((expires_at, _)) = *self.expiries.peek()?;
        if expires_at > until {
            return None;
        }
        let Reverse((expires_at, sequence_num)) = self.expiries.pop()?;
        let timer = self.payloads.remove(&sequence_num)?;
        Some((expires_at, timer))
    }

    /// Expiry time of the earliest timer
    pub fn peek_next_expiry(&self) -> Option<SimTime> {
        self.expiries.peek().map(|Reverse((expires_at, _))| *expires_at)
    }

    /// Drop every pending timer, returning how many were abandoned
    pub fn cancel_all(&mut self) -> usize {
        let abandoned = self.len();
        self.expiries.clear();
        self.payloads.clear();
        abandoned
    }

    pub fn len(&self) -> usize {
        self.expiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_expiry_order() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(0, 20, Timer::DeliveryArrived(1));
        timers.schedule_after(0, 5, Timer::DeliveryArrived(2));

        assert_eq!(timers.peek_next_expiry(), Some(5));
        assert_eq!(timers.pop_due(100), Some((5, Timer::DeliveryArrived(2))));
        assert_eq!(timers.pop_due(100), Some((20, Timer::DeliveryArrived(1))));
        assert_eq!(timers.pop_due(100), None);
    }

    #[test]
    fn test_ties_fire_in_registration_order() {
        let mut timers = TimerQueue::new();
        for id in 0..4 {
            timers.schedule_after(3, 2, Timer::DeliveryArrived(id));
        }

        for id in 0..4 {
            assert_eq!(timers.pop_due(5), Some((5, Timer::DeliveryArrived(id))));
        }
    }

    #[test]
    fn test_pop_due_respects_horizon() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(0, 10, Timer::DeliveryArrived(7));

        assert_eq!(timers.pop_due(9), None);
        assert_eq!(timers.len(), 1);
        assert!(timers.pop_due(10).is_some());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel_all_reports_abandoned() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(0, 1, Timer::DeliveryArrived(1));
        timers.schedule_after(0, 2, Timer::DeliveryArrived(2));

        assert_eq!(timers.cancel_all(), 2);
        assert!(timers.is_empty());
        assert_eq!(timers.peek_next_expiry(), None);
        assert_eq!(timers.pop_due(10), None);
    }
}
