use super::types::{OrderId, OrderStatus, SimTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EventId = String;

/// Discriminant used to route events to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    StatusChanged,
    OrderFinished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    StatusChanged { order_id: OrderId, status: OrderStatus },
    OrderFinished { order_id: OrderId },
}

/// Notification published to external collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub time: SimTime,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(time: SimTime, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time,
            payload,
        }
    }

    pub fn status_changed(time: SimTime, order_id: OrderId, status: OrderStatus) -> Self {
        Self::new(time, EventPayload::StatusChanged { order_id, status })
    }

    pub fn order_finished(time: SimTime, order_id: OrderId) -> Self {
        Self::new(time, EventPayload::OrderFinished { order_id })
    }

    pub fn kind(&self) -> EventKind {
        match self.payload {
            EventPayload::StatusChanged { .. } => EventKind::StatusChanged,
            EventPayload::OrderFinished { .. } => EventKind::OrderFinished,
        }
    }

    pub fn order_id(&self) -> OrderId {
        match self.payload {
            EventPayload::StatusChanged { order_id, .. } => order_id,
            EventPayload::OrderFinished { order_id } => order_id,
        }
    }
}
