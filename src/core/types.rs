use serde::{Deserialize, Serialize};

/// Virtual clock time in abstract time units
pub type SimTime = u64;

/// Unique order identifier supplied by the caller
pub type OrderId = u64;

/// Priority class of the customer placing an order.
///
/// Variants are declared from lowest to highest so the derived `Ord`
/// ranks `Vip` above `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Standard,
    Vip,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Standard => write!(f, "Standard"),
            Priority::Vip => write!(f, "VIP"),
        }
    }
}

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    InKitchen,
    WaitingToDelivery,
    InDelivery,
    Finished,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Finished | OrderStatus::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, InKitchen)
                | (Pending, Cancelled)
                | (InKitchen, WaitingToDelivery)
                | (WaitingToDelivery, InDelivery)
                | (InDelivery, Finished)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InKitchen => "InKitchen",
            OrderStatus::WaitingToDelivery => "WaitingToDelivery",
            OrderStatus::InDelivery => "InDelivery",
            OrderStatus::Finished => "Finished",
            OrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", name)
    }
}

/// Identifies one dish slot: the owning order plus its position in that order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DishKey {
    pub order_id: OrderId,
    pub position: usize,
}

impl std::fmt::Display for DishKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.order_id, self.position)
    }
}

/// A single dish; refers back to its order by id only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub order_id: OrderId,
    /// Zero-based position within the order
    pub position: usize,
    /// Total number of dishes in the owning order
    pub total: usize,
}

impl Dish {
    pub fn key(&self) -> DishKey {
        DishKey {
            order_id: self.order_id,
            position: self.position,
        }
    }
}

/// A customer order moving through kitchen and delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Time-to-live in seconds; informational unless a deadline policy reads it
    pub ttl_secs: u32,
    pub priority: Priority,
    pub dishes: Vec<Dish>,
}

impl Order {
    /// Create an order with `dish_count` dishes numbered from zero
    pub fn new(id: OrderId, ttl_secs: u32, priority: Priority, dish_count: usize) -> Self {
        let dishes = (0..dish_count)
            .map(|position| Dish {
                order_id: id,
                position,
                total: dish_count,
            })
            .collect();
        Self {
            id,
            ttl_secs,
            priority,
            dishes,
        }
    }

    pub fn dish_count(&self) -> usize {
        self.dishes.len()
    }

    /// Every dish points back at this order, carries the real dish count,
    /// and positions cover `0..dish_count` exactly once
    pub fn dishes_consistent(&self) -> bool {
        let count = self.dishes.len();
        let mut seen = vec![false; count];
        self.dishes.iter().all(|dish| {
            dish.order_id == self.id
                && dish.total == count
                && dish.position < count
                && !std::mem::replace(&mut seen[dish.position], true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_orders_are_consistent() {
        assert!(Order::new(3, 60, Priority::Vip, 4).dishes_consistent());
        assert!(Order::new(4, 60, Priority::Standard, 0).dishes_consistent());
    }

    #[test]
    fn test_detects_foreign_dish() {
        let mut order = Order::new(1, 60, Priority::Standard, 2);
        order.dishes[1].order_id = 99;
        assert!(!order.dishes_consistent());
    }

    #[test]
    fn test_detects_wrong_total_and_positions() {
        let mut wrong_total = Order::new(1, 60, Priority::Standard, 2);
        wrong_total.dishes[0].total = 3;
        assert!(!wrong_total.dishes_consistent());

        let mut repeated = Order::new(1, 60, Priority::Standard, 2);
        repeated.dishes[1].position = 0;
        assert!(!repeated.dishes_consistent());

        let mut out_of_range = Order::new(1, 60, Priority::Standard, 2);
        out_of_range.dishes[1].position = 2;
        assert!(!out_of_range.dishes_consistent());
    }
}
