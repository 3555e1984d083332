//! Combustion boilers: on-demand combi and cylinder-fed system/regular boilers.

use crate::sim::types::SimState;

use super::cylinder::Cylinder;
use super::types::{HeatSource, StepDemand, StepDispatch, capacity_kw};

/// Lowest efficiency a firing combustion appliance is reported at.
pub const MIN_COMBUSTION_ETA: f64 = 0.55;

/// Highest efficiency a combustion appliance is reported at.
pub const MAX_COMBUSTION_ETA: f64 = 0.95;

/// Steady-state efficiency assumed when none is configured.
pub const DEFAULT_BASE_ETA: f64 = 0.85;

/// Efficiency lost at the limit of zero load below minimum modulation.
pub const CYCLING_PENALTY_MAX: f64 = 0.25;

/// Instantaneous efficiency of a combustion appliance producing `output_kw`.
///
/// Below `min_kw` the appliance short-cycles and loses up to
/// [`CYCLING_PENALTY_MAX`] in proportion to how far the load falls short of
/// its minimum. A missing or non-positive `min_kw` disables the penalty, as
/// does zero output (the burner is off).
///
/// The result always lies in `[MIN_COMBUSTION_ETA, MAX_COMBUSTION_ETA]`.
pub fn combustion_efficiency(output_kw: f64, min_kw: Option<f64>, base_eta: f64) -> f64 {
    let base = if base_eta.is_finite() {
        base_eta.clamp(MIN_COMBUSTION_ETA, MAX_COMBUSTION_ETA)
    } else {
        DEFAULT_BASE_ETA
    };

    match min_kw {
        Some(min) if min > 0.0 && output_kw > 0.0 && output_kw < min => {
            let load_ratio = output_kw / min;
            let penalised = base - CYCLING_PENALTY_MAX * (1.0 - load_ratio);
            penalised.clamp(MIN_COMBUSTION_ETA, base)
        }
        _ => base,
    }
}

/// Returns `true` when `output_kw` falls in the cycling band.
pub fn is_cycling(output_kw: f64, min_kw: Option<f64>) -> bool {
    matches!(min_kw, Some(min) if min > 0.0 && output_kw > 0.0 && output_kw < min)
}

fn fuel_input_kw(output_kw: f64, efficiency: f64) -> f64 {
    if output_kw > 0.0 && efficiency > 0.0 {
        output_kw / efficiency
    } else {
        0.0
    }
}

/// On-demand combi boiler.
///
/// Hot water has strict priority: while a draw is running the burner serves
/// only the draw and space heating is interrupted. A draw that covers part of
/// a step is served at its running rate, and space heating resumes for the
/// rest of the step.
#[derive(Debug, Clone, PartialEq)]
pub struct CombiBoiler {
    /// Maximum output (kW).
    pub max_kw: f64,
    /// Minimum stable output (kW).
    pub min_kw: Option<f64>,
    /// Steady-state efficiency.
    pub base_eta: f64,
}

impl CombiBoiler {
    /// Creates a combi boiler. Negative or non-finite capacity is treated as zero.
    pub fn new(max_kw: f64, min_kw: Option<f64>, base_eta: f64) -> Self {
        Self {
            max_kw: capacity_kw(max_kw),
            min_kw,
            base_eta,
        }
    }
}

impl HeatSource for CombiBoiler {
    fn dispatch(&self, demand: &StepDemand, _state: &mut SimState) -> StepDispatch {
        let space_rate = demand.space_kw.max(0.0).min(self.max_kw);
        let draw_rate = demand.dhw_rate_kw.max(0.0);
        let fraction = if draw_rate > 0.0 {
            demand.dhw_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let draw_rate = if fraction > 0.0 { draw_rate } else { 0.0 };

        // The burner serves the draw while it runs and the room for the rest
        let water_rate = draw_rate.min(self.max_kw);
        let shortfall_kw = draw_rate - water_rate;
        let service_pct = if shortfall_kw > 0.0 {
            100.0 * water_rate / draw_rate
        } else {
            100.0
        };

        let water_kw = fraction * water_rate;
        let space_kw = (1.0 - fraction) * space_rate;

        let water_eta = combustion_efficiency(water_rate, self.min_kw, self.base_eta);
        let space_eta = combustion_efficiency(space_rate, self.min_kw, self.base_eta);
        let input_kw = fraction * fuel_input_kw(water_rate, water_eta)
            + (1.0 - fraction) * fuel_input_kw(space_rate, space_eta);

        let efficiency = match (water_kw > 0.0, space_kw > 0.0) {
            (true, true) => (water_kw + space_kw) / input_kw,
            (true, false) => water_eta,
            (false, _) => space_eta,
        };

        StepDispatch {
            space_kw,
            water_kw,
            efficiency,
            input_kw,
            service_pct,
            shortfall_kw,
        }
    }

    fn max_kw(&self) -> f64 {
        self.max_kw
    }

    fn family(&self) -> &'static str {
        "Combi"
    }
}

/// System or regular boiler feeding a stored hot-water cylinder.
///
/// Space heating is served first; the cylinder absorbs any draw the remaining
/// capacity cannot cover, so hot water is never reported short.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBoiler {
    /// Maximum output (kW).
    pub max_kw: f64,
    /// Minimum stable output (kW).
    pub min_kw: Option<f64>,
    /// Steady-state efficiency.
    pub base_eta: f64,
    /// Cylinder buffering the draws.
    pub cylinder: Cylinder,
}

impl StoredBoiler {
    /// Creates a cylinder-fed boiler. Negative or non-finite capacity is treated as zero.
    pub fn new(max_kw: f64, min_kw: Option<f64>, base_eta: f64, cylinder: Cylinder) -> Self {
        Self {
            max_kw: capacity_kw(max_kw),
            min_kw,
            base_eta,
            cylinder,
        }
    }
}

impl HeatSource for StoredBoiler {
    fn dispatch(&self, demand: &StepDemand, state: &mut SimState) -> StepDispatch {
        let space_kw = demand.space_kw.max(0.0).min(self.max_kw);
        let spare_kw = self.max_kw - space_kw;
        let flow = self.cylinder.serve(
            &mut state.reserve_pct,
            demand.dhw_kw,
            spare_kw,
            demand.dt_hours,
        );

        let water_kw = flow.source_kw();
        let output_kw = space_kw + water_kw;
        let efficiency = combustion_efficiency(output_kw, self.min_kw, self.base_eta);

        StepDispatch {
            space_kw,
            water_kw,
            efficiency,
            input_kw: fuel_input_kw(output_kw, efficiency),
            service_pct: state.reserve_pct,
            shortfall_kw: 0.0,
        }
    }

    fn max_kw(&self) -> f64 {
        self.max_kw
    }

    fn family(&self) -> &'static str {
        "StoredCylinder"
    }
}
