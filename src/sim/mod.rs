/// Simulation clock for step windows.
pub mod clock;
/// Parallel comparison of candidate systems.
pub mod compare;
pub mod engine;
/// Single-zone thermal envelope.
pub mod envelope;
/// Hot-water draw events.
pub mod event;
pub mod flow;
pub mod kpi;
/// Occupancy schedule and setpoints.
pub mod schedule;
/// DHW supply-path policy and per-step resolution.
pub mod supply_path;
pub mod types;
