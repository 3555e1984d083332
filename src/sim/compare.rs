//! Side-by-side runs of several candidate systems for one building.

use rayon::prelude::*;
use serde::Serialize;

use crate::devices::{BuildContext, SystemConfig, SystemKind, build_system_config};

use super::engine::{Solver, SolverInput, Timeline};
use super::event::DrawEvent;
use super::kpi::KpiReport;
use super::schedule::OccupancySchedule;
use super::supply_path::SupplyPath;
use super::types::BuildingInput;

/// Outcome of one candidate in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub kind: SystemKind,
    pub system: SystemConfig,
    pub kpi: KpiReport,
    pub timeline: Timeline,
}

/// Runs every kind in `kinds` against the same building, draws and policy.
///
/// Runs are independent and execute in parallel; results come back in the
/// order of `kinds`. Each kind is sized with [`build_system_config`] using
/// `ctx`.
pub fn compare_systems(
    building: &BuildingInput,
    kinds: &[SystemKind],
    ctx: &BuildContext,
    draws: &[DrawEvent],
    supply_path: SupplyPath,
    occupancy: &OccupancySchedule,
) -> Vec<Comparison> {
    kinds
        .par_iter()
        .map(|&kind| {
            let system = build_system_config(kind, building.peak_heat_loss_kw, ctx);
            let timeline = Solver::new(SolverInput {
                building: building.clone(),
                system: system.clone(),
                draws: draws.to_vec(),
                supply_path,
                occupancy: occupancy.clone(),
            })
            .run();
            let kpi = KpiReport::from_timeline(&timeline, &system);
            Comparison {
                kind,
                system,
                kpi,
                timeline,
            }
        })
        .collect()
}
