use kitchen_dispatch::core::batch::BatchRunner;
use kitchen_dispatch::core::report::{BatchSummary, SimulationReport};
use kitchen_dispatch::{
    BatchConfig, ConcurrencyMode, EventKind, EventPayload, Order, OrderScheduler, Priority,
    SchedulerConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    // Optional path to a JSON SchedulerConfig
    let config = match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SchedulerConfig::default(),
    };

    println!("Starting kitchen dispatch demo");
    println!(
        "  Stands: {} | Messengers: {} | Cook: {} | Delivery: {} | Policy: {:?}",
        config.cooking_stands,
        config.messengers,
        config.cook_duration,
        config.delivery_duration,
        config.policy
    );
    println!();

    let mut scheduler = OrderScheduler::new(config.clone())?;
    scheduler.subscribe(EventKind::StatusChanged, |event| {
        if let EventPayload::StatusChanged { order_id, status } = &event.payload {
            println!("  t={:>3}  order {:>2} -> {}", event.time, order_id, status);
        }
    });
    scheduler.subscribe(EventKind::OrderFinished, |event| {
        println!("  t={:>3}  order {:>2} finished", event.time, event.order_id());
    });

    let arrivals = [
        (0, Order::new(1, 60, Priority::Standard, 3)),
        (0, Order::new(2, 60, Priority::Standard, 1)),
        (1, Order::new(3, 45, Priority::Vip, 2)),
        (2, Order::new(4, 90, Priority::Standard, 2)),
        (3, Order::new(5, 30, Priority::Vip, 1)),
    ];
    for (arrival, order) in arrivals {
        scheduler.advance_to(arrival)?;
        scheduler.admit_order(order)?;
    }
    if scheduler.cancel_order(4) {
        println!("  order 4 cancelled while pending");
    }
    scheduler.run_until_idle()?;
    SimulationReport::from_scheduler(&scheduler).log_summary();

    let batch = BatchConfig::new()
        .with_scheduler(config)
        .with_replications(16)
        .with_concurrency(ConcurrencyMode::Rayon);
    let reports = BatchRunner::new(batch)?.run()?;
    let summary = BatchSummary::from_reports(&reports);

    println!();
    println!("Batch of {} replications", summary.replications);
    println!("  Orders finished: {}", summary.orders_finished);
    println!("  Mean turnaround: {:.2}", summary.mean_turnaround);
    println!("  Worst turnaround: {}", summary.worst_turnaround);
    println!("  Mean makespan: {:.2}", summary.mean_makespan);

    Ok(())
}
