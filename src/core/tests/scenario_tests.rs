// Timed dispatch scenarios across kitchen and delivery
#[cfg(test)]
mod tests {
    use crate::core::{
        config::{OrderGenerationConfig, SchedulerConfig},
        event::{Event, EventKind, EventPayload},
        order_generator::OrderGenerator,
        order_scheduler::OrderScheduler,
        types::{Order, OrderId, OrderStatus, Priority},
    };
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    fn scheduler(stands: usize, messengers: usize) -> OrderScheduler {
        let config = SchedulerConfig::new()
            .with_cooking_stands(stands)
            .with_messengers(messengers)
            .with_cook_duration(5)
            .with_delivery_duration(20);
        OrderScheduler::new(config).unwrap()
    }

    fn finished_order_log(scheduler: &mut OrderScheduler) -> Rc<RefCell<Vec<OrderId>>> {
        let finished = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&finished);
        scheduler.subscribe(EventKind::OrderFinished, move |event: &Event| {
            sink.borrow_mut().push(event.order_id())
        });
        finished
    }

    #[test]
    fn test_vip_waits_behind_started_order() {
        let mut scheduler = scheduler(1, 1);
        scheduler
            .admit_order(Order::new(1, 60, Priority::Standard, 1))
            .unwrap();
        scheduler
            .admit_order(Order::new(2, 60, Priority::Vip, 1))
            .unwrap();
        scheduler
            .admit_order(Order::new(3, 60, Priority::Standard, 1))
            .unwrap();
        scheduler.advance_to(1).unwrap();
        scheduler
            .admit_order(Order::new(4, 60, Priority::Vip, 1))
            .unwrap();

        // A started on arrival; VIPs queue ahead of the later Standard order
        assert_eq!(scheduler.status(1), Some(OrderStatus::InKitchen));
        assert_eq!(scheduler.backlog().order_ids(), vec![2, 4, 3]);

        scheduler.advance_to(5).unwrap();
        assert_eq!(scheduler.status(1), Some(OrderStatus::InDelivery));
        assert_eq!(scheduler.status(2), Some(OrderStatus::InKitchen));
        assert_eq!(scheduler.status(3), Some(OrderStatus::Pending));
        assert_eq!(scheduler.backlog().order_ids(), vec![4, 3]);
    }

    #[test]
    fn test_waiting_deliveries_dispatch_newest_first() {
        let mut scheduler = scheduler(3, 1);
        let finished = finished_order_log(&mut scheduler);
        for (arrival, id) in [(0, 1), (1, 2), (2, 3)] {
            scheduler.advance_to(arrival).unwrap();
            scheduler
                .admit_order(Order::new(id, 60, Priority::Standard, 1))
                .unwrap();
        }

        scheduler.advance_to(7).unwrap();
        assert_eq!(scheduler.status(1), Some(OrderStatus::InDelivery));
        assert_eq!(scheduler.delivery().waiting_ids(), vec![2, 3]);

        scheduler.advance_to(26).unwrap();
        assert_eq!(scheduler.status(3), Some(OrderStatus::InDelivery));
        assert_eq!(scheduler.status(2), Some(OrderStatus::WaitingToDelivery));

        assert_eq!(scheduler.run_until_idle().unwrap(), 65);
        assert_eq!(*finished.borrow(), vec![1, 3, 2]);
    }

    #[test]
    fn test_multi_dish_order_waits_for_every_dish() {
        let mut scheduler = scheduler(2, 1);
        scheduler
            .admit_order(Order::new(1, 60, Priority::Standard, 3))
            .unwrap();
        assert_eq!(scheduler.kitchen().in_use(), 2);
        assert_eq!(scheduler.kitchen().queued_dishes(), 1);

        scheduler.advance_to(5).unwrap();
        // Third dish took the first freed stand
        assert_eq!(scheduler.kitchen().in_use(), 1);
        assert_eq!(scheduler.kitchen().queued_dishes(), 0);
        assert_eq!(scheduler.status(1), Some(OrderStatus::InKitchen));

        scheduler.advance_to(9).unwrap();
        assert_eq!(scheduler.status(1), Some(OrderStatus::InKitchen));

        scheduler.advance_to(10).unwrap();
        assert_eq!(scheduler.status(1), Some(OrderStatus::InDelivery));
        assert_eq!(scheduler.kitchen().dishes_cooked(), 3);
    }

    #[test]
    fn test_dishes_of_queued_orders_take_freed_stands() {
        let mut scheduler = scheduler(2, 2);
        scheduler
            .admit_order(Order::new(1, 60, Priority::Standard, 2))
            .unwrap();
        scheduler
            .admit_order(Order::new(2, 60, Priority::Standard, 3))
            .unwrap();
        assert_eq!(scheduler.status(2), Some(OrderStatus::Pending));

        scheduler.advance_to(5).unwrap();
        assert_eq!(scheduler.status(1), Some(OrderStatus::InDelivery));
        assert_eq!(scheduler.status(2), Some(OrderStatus::InKitchen));
        assert_eq!(scheduler.kitchen().in_use(), 2);
        assert_eq!(scheduler.kitchen().queued_dishes(), 1);

        scheduler.run_until_idle().unwrap();
        assert_eq!(scheduler.status(2), Some(OrderStatus::Finished));
    }

    #[test]
    fn test_capacity_and_lifecycle_hold_under_load() {
        let config = OrderGenerationConfig {
            order_count: 150,
            mean_interarrival: 2.0,
            ..OrderGenerationConfig::default()
        };
        let arrivals = OrderGenerator::new(config, 2024).unwrap().arrivals();
        let total_dishes: usize = arrivals.iter().map(|(_, order)| order.dish_count()).sum();

        let mut scheduler = scheduler(2, 1);
        let statuses: Rc<RefCell<HashMap<OrderId, Vec<OrderStatus>>>> = Rc::new(RefCell::new(HashMap::new()));
        let sink = Rc::clone(&statuses);
        scheduler.subscribe(EventKind::StatusChanged, move |event| {
            if let EventPayload::StatusChanged { order_id, status } = event.payload {
                sink.borrow_mut().entry(order_id).or_default().push(status);
            }
        });

        let check = |scheduler: &OrderScheduler| {
            assert!(scheduler.kitchen().in_use() <= 2);
            assert!(scheduler.delivery().in_use() <= 1);
        };
        for (arrival, order) in arrivals {
            scheduler.advance_to(arrival).unwrap();
            check(&scheduler);
            scheduler.admit_order(order).unwrap();
            check(&scheduler);
        }
        while scheduler.step().unwrap() {
            check(&scheduler);
        }

        assert_eq!(scheduler.kitchen().dishes_cooked(), total_dishes as u64);
        assert_eq!(scheduler.kitchen().peak_in_use(), 2);
        assert_eq!(scheduler.delivery().peak_in_use(), 1);
        let expected = vec![
            OrderStatus::Pending,
            OrderStatus::InKitchen,
            OrderStatus::WaitingToDelivery,
            OrderStatus::InDelivery,
            OrderStatus::Finished,
        ];
        let statuses = statuses.borrow();
        assert_eq!(statuses.len(), 150);
        for (order_id, sequence) in statuses.iter() {
            assert_eq!(sequence, &expected, "order {} took an illegal path", order_id);
        }
    }
}
