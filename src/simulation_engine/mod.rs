// simulation_engine/mod.rs
pub mod config;
pub mod directions;
pub mod intersections;
pub mod lanes;
pub mod route_generation;
pub mod schedule;
pub mod simulation;
pub mod vehicles;
