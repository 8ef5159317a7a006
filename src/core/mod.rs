pub mod batch;
pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod event_bus;
pub mod kitchen;
pub mod ledger;
pub mod order_generator;
pub mod order_scheduler;
pub mod priority;
pub mod priority_queue;
pub mod report;
pub mod timer_queue;
pub mod types;

#[cfg(test)]
mod tests;
