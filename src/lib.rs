pub mod core;

// Re-export commonly used types
pub use crate::core::config::{BatchConfig, ConcurrencyMode, OrderGenerationConfig, SchedulerConfig};
pub use crate::core::error::SchedulerError;
pub use crate::core::event::{Event, EventKind, EventPayload};
pub use crate::core::order_scheduler::{Lifecycle, OrderScheduler};
pub use crate::core::priority::{PolicyKind, PriorityPolicy};
pub use crate::core::types::{Dish, Order, OrderId, OrderStatus, Priority, SimTime};
