use super::types::{OrderId, OrderStatus, SimTime};

/// Bounded resource a capacity slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    CookingStand,
    Messenger,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::CookingStand => write!(f, "cooking stand"),
            Resource::Messenger => write!(f, "messenger"),
        }
    }
}

/// Errors raised by the order scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// An order with this id is already known to the scheduler
    DuplicateOrderId(OrderId),
    /// Orders must contain at least one dish
    EmptyOrder(OrderId),
    /// Dishes that do not belong to the order, or inconsistent positions
    MalformedOrder(OrderId),
    /// No tracked entry for the given order
    NotFound(OrderId),
    /// A slot was requested while every slot was occupied
    CapacityInvariantViolation { resource: Resource, capacity: usize },
    /// Lifecycle step not allowed by the order state machine
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
    /// The clock can only move forward
    ClockRegression { now: SimTime, requested: SimTime },
    InvalidConfig(String),
    /// The scheduler was shut down by its owner
    ShutDown,
    /// The scheduler stopped after detecting corrupted state
    Halted,
}

impl SchedulerError {
    /// Errors that mean internal bookkeeping can no longer be trusted
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SchedulerError::CapacityInvariantViolation { .. }
                | SchedulerError::InvalidTransition { .. }
                | SchedulerError::NotFound(_)
        )
    }
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::DuplicateOrderId(id) => write!(f, "Duplicate order id: {}", id),
            SchedulerError::EmptyOrder(id) => write!(f, "Order {} has no dishes", id),
            SchedulerError::MalformedOrder(id) => {
                write!(f, "Order {} has dishes that do not match the order", id)
            }
            SchedulerError::NotFound(id) => write!(f, "Order not found: {}", id),
            SchedulerError::CapacityInvariantViolation { resource, capacity } => write!(
                f,
                "Capacity invariant violated: all {} {} slots are occupied",
                capacity, resource
            ),
            SchedulerError::InvalidTransition { order_id, from, to } => write!(
                f,
                "Invalid transition for order {}: {} -> {}",
                order_id, from, to
            ),
            SchedulerError::ClockRegression { now, requested } => write!(
                f,
                "Clock cannot move backwards from {} to {}",
                now, requested
            ),
            SchedulerError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SchedulerError::ShutDown => write!(f, "Scheduler has been shut down"),
            SchedulerError::Halted => write!(f, "Scheduler halted after an internal error"),
        }
    }
}

impl std::error::Error for SchedulerError {}
