//! Pluggable ordering rules for the pending-order backlog.
//!
//! A policy only ranks two orders against each other. Arrival order is the
//! final tie-break and is applied by the backlog itself: an incoming order
//! is inserted after every order it does not strictly outrank.

use super::types::Order;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;

/// Ranks pending orders.
///
/// `compare(a, b) == Ordering::Less` means `a` is dispatched before `b`.
/// Returning `Equal` defers to arrival order.
pub trait PriorityPolicy: Send + Sync + Debug {
    /// Policy name used in logs
    fn name(&self) -> &'static str;

    fn compare(&self, a: &Order, b: &Order) -> Ordering;
}

/// Higher priority class first
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassFirst;

impl PriorityPolicy for ClassFirst {
    fn name(&self) -> &'static str {
        "class-first"
    }

    fn compare(&self, a: &Order, b: &Order) -> Ordering {
        b.priority.cmp(&a.priority)
    }
}

/// Pure arrival order
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrivalOrder;

impl PriorityPolicy for ArrivalOrder {
    fn name(&self) -> &'static str {
        "arrival-order"
    }

    fn compare(&self, _a: &Order, _b: &Order) -> Ordering {
        Ordering::Equal
    }
}

/// Higher class first, then the order with the shorter time-to-live
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassThenDeadline;

impl PriorityPolicy for ClassThenDeadline {
    fn name(&self) -> &'static str {
        "class-then-deadline"
    }

    fn compare(&self, a: &Order, b: &Order) -> Ordering {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.ttl_secs.cmp(&b.ttl_secs))
    }
}

/// Serializable selector for the built-in policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolicyKind {
    #[default]
    ClassFirst,
    ArrivalOrder,
    ClassThenDeadline,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn PriorityPolicy> {
        match self {
            PolicyKind::ClassFirst => Box::new(ClassFirst),
            PolicyKind::ArrivalOrder => Box::new(ArrivalOrder),
            PolicyKind::ClassThenDeadline => Box::new(ClassThenDeadline),
        }
    }
}
