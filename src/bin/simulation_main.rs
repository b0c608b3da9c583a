// simulation_main.rs
use intersection_sim::monitoring::traffic_monitoring_system::{log_crossings_to_csv, LaneSummary};
use intersection_sim::simulation_engine::config::SimulationConfig;
use intersection_sim::simulation_engine::schedule::Schedule;
use intersection_sim::simulation_engine::simulation::run_simulation_with_sink;
use std::error::Error;
use std::{env, process, thread};

#[derive(Debug, thiserror::Error)]
#[error("usage: simulation_main <schedule-file> [config.json]")]
struct UsageError;

fn main() {
    env_logger::init();

    if let Err(e) = run(env::args().skip(1)) {
        if e.is::<UsageError>() {
            eprintln!("{}", e);
            process::exit(2);
        }
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

/// `<schedule-file> [config.json]`
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(String, Option<String>), UsageError> {
    let schedule_path = args.next().ok_or(UsageError)?;
    let config_path = args.next();
    if args.next().is_some() {
        return Err(UsageError);
    }
    Ok((schedule_path, config_path))
}

fn run(args: impl Iterator<Item = String>) -> Result<(), Box<dyn Error>> {
    let (schedule_path, config_path) = parse_args(args)?;
    let config = match config_path {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    let schedule = Schedule::from_file(&schedule_path)?;
    log::info!("Loaded {} cars from {}", schedule.total_cars(), schedule_path);

    // Print each crossing as it happens: `<in> <out> <id>`.
    let (tx, rx) = crossbeam_channel::unbounded();
    let printer = thread::spawn(move || {
        let mut events = Vec::new();
        for event in rx {
            println!("{}", event);
            events.push(event);
        }
        events
    });

    run_simulation_with_sink(schedule, &config, tx)?;
    let events = printer.join().map_err(|_| "output thread panicked")?;

    if let Some(path) = &config.csv_log {
        log_crossings_to_csv(path, &events)?;
    }
    LaneSummary::from_events(&events).log();
    Ok(())
}
