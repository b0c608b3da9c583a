use intersection_sim::shared_data::CrossingEvent;
use intersection_sim::simulation_engine::config::SimulationConfig;
use intersection_sim::simulation_engine::directions::Direction;
use intersection_sim::simulation_engine::intersections::QuadrantLockSet;
use intersection_sim::simulation_engine::route_generation::{compute_path, Quadrant};
use intersection_sim::simulation_engine::schedule::Schedule;
use intersection_sim::simulation_engine::simulation::{run_on_quadrants, run_simulation};
use intersection_sim::simulation_engine::vehicles::{Car, CarId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn multiset(events: &[CrossingEvent]) -> HashMap<CrossingEvent, usize> {
    let mut counts = HashMap::new();
    for event in events {
        *counts.entry(*event).or_insert(0) += 1;
    }
    counts
}

fn scheduled_events(schedule: &Schedule) -> Vec<CrossingEvent> {
    Direction::ALL
        .iter()
        .flat_map(|&dir| schedule.lane(dir).iter().map(CrossingEvent::from))
        .collect()
}

/// Schedule with randomly sized lanes and random exits.
fn random_schedule(rng: &mut StdRng) -> Schedule {
    let mut schedule = Schedule::new();
    let mut next_id: CarId = 100;
    for entry in Direction::ALL {
        for _ in 0..rng.random_range(0..40) {
            let exit = Direction::ALL[rng.random_range(0..4)];
            schedule.add(Car::new(next_id, entry, exit));
            next_id += 1;
        }
    }
    schedule
}

#[test]
fn disjoint_paths_both_cross() {
    let schedule = Schedule::new()
        .with_lane(Direction::North, &[(1, Direction::South)])
        .with_lane(Direction::East, &[(2, Direction::North)]);
    assert!(!compute_path(Direction::North, Direction::South)
        .conflicts_with(&compute_path(Direction::East, Direction::North)));

    let report = run_simulation(schedule, &SimulationConfig::with_capacity(2)).unwrap();

    let expected = [
        CrossingEvent::from(&Car::new(1, Direction::North, Direction::South)),
        CrossingEvent::from(&Car::new(2, Direction::East, Direction::North)),
    ];
    assert_eq!(multiset(&report.events), multiset(&expected));
}

#[test]
fn conflicting_paths_serialize_on_shared_quadrants() {
    let schedule = Schedule::new()
        .with_lane(Direction::North, &[(1, Direction::East)])
        .with_lane(Direction::West, &[(2, Direction::North)]);
    let quadrants = QuadrantLockSet::new();
    let (tx, rx) = crossbeam_channel::unbounded();

    run_on_quadrants(schedule, &SimulationConfig::with_capacity(2), &quadrants, tx).unwrap();

    let events: Vec<CrossingEvent> = rx.iter().collect();
    let mut ids: Vec<CarId> = events.iter().map(|e| e.car_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);

    for number in [3, 4] {
        let q = Quadrant::numbered(number);
        assert_eq!(quadrants.acquisitions(q), 2);
        assert_eq!(quadrants.peak_holders(q), 1);
    }
    assert_eq!(quadrants.acquisitions(Quadrant::numbered(1)), 1);
    assert_eq!(quadrants.acquisitions(Quadrant::numbered(2)), 1);
}

#[test]
fn lanes_keep_fifo_order_under_any_capacity() {
    let exits = [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::North,
    ];
    for capacity in [1, 2, 3, 10] {
        let mut schedule = Schedule::new();
        for (i, dir) in Direction::ALL.iter().enumerate() {
            let base = (i as CarId + 1) * 100;
            let cars: Vec<(CarId, Direction)> = exits
                .iter()
                .enumerate()
                .map(|(k, &exit)| (base + k as CarId, exit))
                .collect();
            schedule = schedule.with_lane(*dir, &cars);
        }

        let report = run_simulation(schedule, &SimulationConfig::with_capacity(capacity)).unwrap();
        for (i, dir) in Direction::ALL.iter().enumerate() {
            let base = (i as CarId + 1) * 100;
            let expected: Vec<CarId> = (0..exits.len() as CarId).map(|k| base + k).collect();
            assert_eq!(report.lane_order(*dir), expected, "lane {} capacity {}", dir, capacity);
        }
    }
}

#[test]
fn randomized_runs_lose_and_duplicate_nothing() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..20 {
        let schedule = random_schedule(&mut rng);
        let injected = scheduled_events(&schedule);
        let capacity = rng.random_range(1..=4);

        let report = run_simulation(schedule, &SimulationConfig::with_capacity(capacity)).unwrap();

        assert_eq!(report.events.len(), injected.len(), "round {}", round);
        assert_eq!(multiset(&report.events), multiset(&injected), "round {}", round);
        assert_eq!(report.out.total(), injected.len());
        for exit in Direction::ALL {
            assert!(report.out.exiting(exit).iter().all(|car| car.exit == exit));
        }
    }
}

#[test]
fn quadrants_never_have_two_holders() {
    let quadrants = QuadrantLockSet::new();
    let running = AtomicBool::new(true);
    let schedule = Schedule::random(150, 7);
    let injected = scheduled_events(&schedule);
    let (tx, rx) = crossbeam_channel::unbounded();

    thread::scope(|s| {
        let sampler = s.spawn(|| {
            let mut samples = 0u64;
            loop {
                for q in Quadrant::ALL {
                    assert!(quadrants.holders(q) <= 1, "{} held twice", q);
                }
                samples += 1;
                if !running.load(Ordering::Acquire) {
                    break samples;
                }
            }
        });

        let result = run_on_quadrants(schedule, &SimulationConfig::with_capacity(2), &quadrants, tx);
        running.store(false, Ordering::Release);
        result.unwrap();
        assert!(sampler.join().unwrap() > 0);
    });

    for q in Quadrant::ALL {
        assert_eq!(quadrants.holders(q), 0);
        assert!(quadrants.peak_holders(q) <= 1);
    }
    let events: Vec<CrossingEvent> = rx.iter().collect();
    assert_eq!(multiset(&events), multiset(&injected));
}

#[test]
fn every_turn_at_capacity_one_finishes() {
    // 100 cars per lane cycling through all four exits, so all 16 turns appear.
    let mut schedule = Schedule::new();
    let mut id: CarId = 1;
    for entry in Direction::ALL {
        for k in 0..100 {
            schedule.add(Car::new(id, entry, Direction::ALL[k % 4]));
            id += 1;
        }
    }

    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        let report = run_simulation(schedule, &SimulationConfig::with_capacity(1));
        let _ = done_tx.send(report);
    });

    let report = done_rx
        .recv_timeout(Duration::from_secs(60))
        .expect("simulation deadlocked")
        .unwrap();
    assert_eq!(report.events.len(), 400);
    for entry in Direction::ALL {
        let order = report.lane_order(entry);
        assert_eq!(order.len(), 100);
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn empty_schedule_finishes_without_events() {
    let report = run_simulation(Schedule::new(), &SimulationConfig::default()).unwrap();
    assert!(report.events.is_empty());
    assert_eq!(report.out.total(), 0);
}
