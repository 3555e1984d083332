//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use heatsim::devices::{BuildContext, SystemConfig, SystemKind, build_system_config};
use heatsim::sim::engine::{Solver, SolverInput, Timeline, simulate};
use heatsim::sim::event::{DrawEvent, DrawKind, Intensity};
use heatsim::sim::schedule::OccupancySchedule;
use heatsim::sim::supply_path::SupplyPath;
use heatsim::sim::types::BuildingInput;

/// First step of the 07:00 draw window.
pub const MORNING_STEP: usize = 28;

/// Reference dwelling: 8 kW peak loss, τ = 35 h, 7 °C day.
pub fn standard_building() -> BuildingInput {
    BuildingInput::new(8.0, 35.0)
}

/// Default-sized system of `kind` for `building`.
pub fn system(kind: SystemKind, building: &BuildingInput) -> SystemConfig {
    build_system_config(kind, building.peak_heat_loss_kw, &BuildContext::default())
}

/// System of `kind` with explicit overrides.
pub fn system_with(kind: SystemKind, building: &BuildingInput, ctx: BuildContext) -> SystemConfig {
    build_system_config(kind, building.peak_heat_loss_kw, &ctx)
}

/// A plant that delivers nothing.
pub fn no_heat(building: &BuildingInput) -> SystemConfig {
    system_with(
        SystemKind::Combi,
        building,
        BuildContext {
            max_kw: Some(0.0),
            min_kw: Some(0.0),
            ..BuildContext::default()
        },
    )
}

/// Medium sink draw filling the 07:00 step.
pub fn morning_sink() -> DrawEvent {
    DrawEvent::new(420, 435, DrawKind::Sink, Intensity::Medium)
}

/// High-intensity bath filling the 07:00 step.
pub fn morning_bath() -> DrawEvent {
    DrawEvent::new(420, 435, DrawKind::Bath, Intensity::High)
}

/// Runs a day with the default occupancy schedule.
pub fn run(
    building: &BuildingInput,
    system: &SystemConfig,
    draws: &[DrawEvent],
    path: SupplyPath,
) -> Timeline {
    simulate(building, system, draws, path)
}

/// Runs a day with the dwelling occupied throughout.
pub fn run_always_home(building: &BuildingInput, system: &SystemConfig) -> Timeline {
    Solver::new(SolverInput {
        building: building.clone(),
        system: system.clone(),
        draws: Vec::new(),
        supply_path: SupplyPath::default(),
        occupancy: OccupancySchedule::always_home(),
    })
    .run()
}

/// Lowest room temperature in a timeline.
pub fn min_room(t: &Timeline) -> f64 {
    t.room_temp_c.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Mean of a series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
