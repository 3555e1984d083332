//! Common types and traits for heat-source dispatch.

use crate::sim::types::SimState;

/// Heat asked of the source during one step.
///
/// `dhw_kw` is the step-averaged hot-water load. On-demand sources also need
/// the rate while water is flowing, `dhw_rate_kw`, which runs for
/// `dhw_fraction` of the step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepDemand {
    /// Space-heating demand from the envelope (kW).
    pub space_kw: f64,
    /// DHW thermal load after the supply-path policy, averaged over the step (kW).
    pub dhw_kw: f64,
    /// DHW thermal load while a draw is running (kW).
    pub dhw_rate_kw: f64,
    /// Fraction of the step during which a draw is running (0–1).
    pub dhw_fraction: f64,
    /// Outdoor temperature (°C), used by heat pumps for COP.
    pub outdoor_c: f64,
    /// Step length (hours).
    pub dt_hours: f64,
}

impl StepDemand {
    /// Demand whose hot-water load, if any, runs for the whole step.
    pub fn steady(space_kw: f64, dhw_kw: f64, outdoor_c: f64, dt_hours: f64) -> Self {
        Self {
            space_kw,
            dhw_kw,
            dhw_rate_kw: dhw_kw,
            dhw_fraction: if dhw_kw > 0.0 { 1.0 } else { 0.0 },
            outdoor_c,
            dt_hours,
        }
    }

    /// Total heat requested (kW).
    pub fn total_kw(&self) -> f64 {
        self.space_kw + self.dhw_kw
    }
}

/// What the source actually did during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDispatch {
    /// Heat delivered to the room (kW).
    pub space_kw: f64,
    /// Heat delivered into hot water, direct service plus cylinder reheat (kW).
    pub water_kw: f64,
    /// Efficiency of the step (COP for heat pumps).
    pub efficiency: f64,
    /// Fuel or electrical input (kW).
    pub input_kw: f64,
    /// DHW service level (on-demand) or cylinder reserve (stored), 0–100.
    pub service_pct: f64,
    /// DHW load the source could not meet while a draw is running (kW).
    pub shortfall_kw: f64,
}

impl StepDispatch {
    /// Total heat output (kW).
    pub fn delivered_kw(&self) -> f64 {
        self.space_kw + self.water_kw
    }
}

/// A heat source that arbitrates its capacity between space heating and DHW.
///
/// Implementations are stateless; anything that persists across steps (the
/// cylinder reserve) lives in the [`SimState`] owned by the timeline driver.
pub trait HeatSource {
    /// Allocates capacity for one step and updates `state` where the source
    /// buffers hot water.
    fn dispatch(&self, demand: &StepDemand, state: &mut SimState) -> StepDispatch;

    /// Maximum sustained output (kW).
    fn max_kw(&self) -> f64;

    /// Human-readable family name.
    fn family(&self) -> &'static str;
}

/// Clamps a capacity figure to a finite, non-negative value.
pub fn capacity_kw(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
