use super::dispatch::DispatchContext;
use super::error::{Resource, SchedulerError};
use super::priority_queue::PriorityQueue;
use super::timer_queue::Timer;
use super::types::{Dish, DishKey, Order, OrderId, OrderStatus, SimTime};
use log::{debug, info};
use std::collections::{HashMap, VecDeque};

/// An order held by the kitchen with its count of unfinished dishes
#[derive(Debug)]
struct KitchenOrder {
    order: Order,
    pending_dishes: usize,
}

/// Owns the cooking stands.
///
/// Dishes of one order may cook on several stands at once; an order is
/// kitchen-complete only when all of its dishes have been cooked.
#[derive(Debug)]
pub struct KitchenScheduler {
    capacity: usize,
    cook_duration: SimTime,
    /// Dishes currently occupying a stand
    cooking: Vec<Dish>,
    /// Dishes of admitted orders waiting for a free stand
    dish_backlog: VecDeque<Dish>,
    orders: HashMap<OrderId, KitchenOrder>,
    peak_in_use: usize,
    dishes_cooked: u64,
}

impl KitchenScheduler {
    pub fn new(capacity: usize, cook_duration: SimTime) -> Self {
        Self {
            capacity,
            cook_duration,
            cooking: Vec::with_capacity(capacity),
            dish_backlog: VecDeque::new(),
            orders: HashMap::new(),
            peak_in_use: 0,
            dishes_cooked: 0,
        }
    }

    pub fn has_free_stand(&self) -> bool {
        self.cooking.len() < self.capacity
    }

    /// Fill free stands, first from queued dishes, then by pulling orders
    /// from the backlog. Returns the ids of orders that entered the kitchen.
    pub fn try_admit_next_order(
        &mut self,
        backlog: &mut PriorityQueue,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<OrderId>, SchedulerError> {
        let mut admitted = Vec::new();
        while self.has_free_stand() {
            if let Some(dish) = self.dish_backlog.pop_front() {
                self.start_dish(dish, ctx)?;
                continue;
            }
            let Some(order) = backlog.pop_front() else {
                break;
            };
            let order_id = order.id;
            info!(
                "[Kitchen] Order {} ({}, {} dishes) enters the kitchen",
                order_id,
                order.priority,
                order.dish_count()
            );
            self.dish_backlog.extend(order.dishes.iter().cloned());
            self.orders.insert(
                order_id,
                KitchenOrder {
                    pending_dishes: order.dish_count(),
                    order,
                },
            );
            ctx.transition(order_id, OrderStatus::InKitchen)?;
            admitted.push(order_id);
        }
        Ok(admitted)
    }

    /// Occupy one stand with `dish` and start its cook timer
    pub fn start_dish(&mut self, dish: Dish, ctx: &mut DispatchContext<'_>) -> Result<(), SchedulerError> {
        if !self.has_free_stand() {
            return Err(SchedulerError::CapacityInvariantViolation {
                resource: Resource::CookingStand,
                capacity: self.capacity,
            });
        }
        let key = dish.key();
        self.cooking.push(dish);
        self.peak_in_use = self.peak_in_use.max(self.cooking.len());
        ctx.schedule_after(self.cook_duration, Timer::DishCooked(key));
        debug!(
            "[Kitchen] Dish {} started at {} ({}/{} stands busy)",
            key,
            ctx.now(),
            self.cooking.len(),
            self.capacity
        );
        Ok(())
    }

    /// Release the stand held by `key`. Returns the owning order once its
    /// last dish is done; the order leaves the kitchen at that point.
    pub fn complete_dish(&mut self, key: DishKey) -> Result<Option<Order>, SchedulerError> {
        let index = self
            .cooking
            .iter()
            .position(|dish| dish.key() == key)
            .ok_or(SchedulerError::NotFound(key.order_id))?;
        self.cooking.swap_remove(index);
        self.dishes_cooked += 1;

        let entry = self
            .orders
            .get_mut(&key.order_id)
            .ok_or(SchedulerError::NotFound(key.order_id))?;
        entry.pending_dishes -= 1;
        debug!(
            "[Kitchen] Dish {} done, {} left for order {}",
            key, entry.pending_dishes, key.order_id
        );
        if entry.pending_dishes > 0 {
            return Ok(None);
        }
        Ok(self
            .orders
            .remove(&key.order_id)
            .map(|finished| finished.order))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.cooking.len()
    }

    pub fn peak_in_use(&self) -> usize {
        self.peak_in_use
    }

    pub fn dishes_cooked(&self) -> u64 {
        self.dishes_cooked
    }

    pub fn queued_dishes(&self) -> usize {
        self.dish_backlog.len()
    }

    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Dishes on the stands right now
    pub fn cooking(&self) -> impl Iterator<Item = DishKey> + '_ {
        self.cooking.iter().map(Dish::key)
    }
}
