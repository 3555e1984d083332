//! Core simulation types: timing constants, building input, per-step state and records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of simulation steps in one day (15-minute resolution).
pub const SOLVER_STEPS: usize = 96;

/// Length of one step in minutes.
pub const STEP_MINUTES: u32 = 15;

/// Length of one step in hours.
pub const DT_HOURS: f64 = STEP_MINUTES as f64 / 60.0;

/// Minutes in the simulated day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Indoor temperature at which `peak_heat_loss_kw` is quoted (°C).
pub const DESIGN_INDOOR_C: f64 = 21.0;

/// Floor applied to the time constant so a degenerate input cannot produce NaN.
pub const MIN_TAU_HOURS: f64 = 1e-3;

/// Thermal characteristics of the simulated building.
///
/// Immutable for the duration of a run. `tau_hours` must be positive; the
/// config layer rejects anything else and the solver floors it at
/// [`MIN_TAU_HOURS`].
///
/// # Examples
///
/// ```
/// use heatsim::sim::types::BuildingInput;
///
/// let b = BuildingInput::new(8.0, 35.0);
/// assert!((b.heat_loss_coefficient_kw_per_k() - 8.0 / 24.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingInput {
    /// Heat loss at the design outdoor temperature (kW).
    pub peak_heat_loss_kw: f64,
    /// Lumped thermal time constant (hours).
    pub tau_hours: f64,
    /// Design outdoor temperature the peak heat loss is quoted at (°C).
    pub design_outdoor_c: f64,
    /// Outdoor temperature for the simulated day (°C).
    pub outdoor_c: f64,
    /// Occupied setpoint (°C).
    pub setpoint_home_c: f64,
    /// Unoccupied setpoint (°C).
    pub setpoint_away_c: f64,
}

impl Default for BuildingInput {
    fn default() -> Self {
        Self {
            peak_heat_loss_kw: 8.0,
            tau_hours: 35.0,
            design_outdoor_c: -3.0,
            outdoor_c: 7.0,
            setpoint_home_c: 21.0,
            setpoint_away_c: 16.0,
        }
    }
}

impl BuildingInput {
    /// Creates a building with the given peak heat loss and time constant and
    /// default temperatures.
    pub fn new(peak_heat_loss_kw: f64, tau_hours: f64) -> Self {
        Self {
            peak_heat_loss_kw,
            tau_hours,
            ..Self::default()
        }
    }

    /// Fabric + ventilation heat-loss coefficient `H` (kW/K).
    ///
    /// The design temperature difference is floored at 1 K.
    pub fn heat_loss_coefficient_kw_per_k(&self) -> f64 {
        let design_dt = (DESIGN_INDOOR_C - self.design_outdoor_c).max(1.0);
        (self.peak_heat_loss_kw / design_dt).max(0.0)
    }

    /// Time constant with the solver's floor applied.
    ///
    /// NaN and non-positive values fall back to [`MIN_TAU_HOURS`]. An infinite
    /// time constant is kept: such a building never drifts.
    pub fn effective_tau_hours(&self) -> f64 {
        if self.tau_hours > 0.0 {
            self.tau_hours.max(MIN_TAU_HOURS)
        } else {
            MIN_TAU_HOURS
        }
    }
}

/// Mutable state threaded through the run by the timeline driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimState {
    /// Room temperature at the start of the current step (°C).
    pub room_temp_c: f64,
    /// Cylinder reserve (0–100). Untouched by on-demand systems.
    pub reserve_pct: f64,
}

impl SimState {
    /// Initial state: room at `room_temp_c`, cylinder fully charged.
    pub fn new(room_temp_c: f64) -> Self {
        Self {
            room_temp_c,
            reserve_pct: 100.0,
        }
    }
}

/// One step of the output timeline, assembled from the parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Step index (0 = 00:00).
    pub step: usize,
    /// Clock time at the start of the step in hours.
    pub time_hr: f64,
    /// Setpoint active during the step (°C).
    pub setpoint_c: f64,
    /// Room temperature at the end of the step (°C).
    pub room_temp_c: f64,
    /// Heat demanded: space heating plus DHW thermal load (kW).
    pub heat_demand_kw: f64,
    /// Heat delivered by the source (kW).
    pub heat_delivered_kw: f64,
    /// Part of `heat_delivered_kw` that went into the room (kW).
    pub space_delivered_kw: f64,
    /// DHW thermal load after the supply-path policy (kW).
    pub dhw_load_kw: f64,
    /// Fraction of the step with a hot draw running (0–1).
    pub dhw_active_fraction: f64,
    /// Efficiency (COP for heat pumps).
    pub efficiency: f64,
    /// Fuel or electrical input (kW).
    pub input_power_kw: f64,
    /// DHW reserve or service level (0–100).
    pub dhw_reserve_pct: f64,
    /// Unmet DHW load while a draw is running (kW).
    pub dhw_shortfall_kw: f64,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>2} ({:>5.2}h) | room={:>5.2}°C set={:>4.1}°C | demand={:>6.2} kW \
             delivered={:>6.2} kW (space={:.2}, dhw={:.2}) | eff={:.3} input={:>6.2} kW | \
             reserve={:>5.1}% shortfall={:.2} kW",
            self.step,
            self.time_hr,
            self.room_temp_c,
            self.setpoint_c,
            self.heat_demand_kw,
            self.heat_delivered_kw,
            self.space_delivered_kw,
            self.dhw_load_kw,
            self.efficiency,
            self.input_power_kw,
            self.dhw_reserve_pct,
            self.dhw_shortfall_kw,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_constants_cover_one_day() {
        assert_eq!(SOLVER_STEPS as u32 * STEP_MINUTES, MINUTES_PER_DAY);
        assert_eq!(DT_HOURS, 0.25);
    }

    #[test]
    fn heat_loss_coefficient_uses_design_delta() {
        let b = BuildingInput {
            peak_heat_loss_kw: 6.0,
            design_outdoor_c: 1.0,
            ..BuildingInput::default()
        };
        assert!((b.heat_loss_coefficient_kw_per_k() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn heat_loss_coefficient_guards_degenerate_design_point() {
        let b = BuildingInput {
            peak_heat_loss_kw: 5.0,
            design_outdoor_c: 25.0,
            ..BuildingInput::default()
        };
        assert_eq!(b.heat_loss_coefficient_kw_per_k(), 5.0);
    }

    #[test]
    fn tau_floor_applies() {
        let mut b = BuildingInput::new(8.0, 0.0);
        assert_eq!(b.effective_tau_hours(), MIN_TAU_HOURS);
        b.tau_hours = f64::NAN;
        assert_eq!(b.effective_tau_hours(), MIN_TAU_HOURS);
        b.tau_hours = -5.0;
        assert_eq!(b.effective_tau_hours(), MIN_TAU_HOURS);
    }

    #[test]
    fn infinite_tau_is_kept() {
        let b = BuildingInput::new(8.0, f64::INFINITY);
        assert_eq!(b.effective_tau_hours(), f64::INFINITY);
    }

    #[test]
    fn new_state_starts_with_full_reserve() {
        let s = SimState::new(20.5);
        assert_eq!(s.room_temp_c, 20.5);
        assert_eq!(s.reserve_pct, 100.0);
    }

    #[test]
    fn step_record_display_does_not_panic() {
        let r = StepRecord {
            step: 28,
            time_hr: 7.0,
            setpoint_c: 21.0,
            room_temp_c: 20.9,
            heat_demand_kw: 14.4,
            heat_delivered_kw: 9.76,
            space_delivered_kw: 0.0,
            dhw_load_kw: 9.76,
            dhw_active_fraction: 1.0,
            efficiency: 0.85,
            input_power_kw: 11.48,
            dhw_reserve_pct: 100.0,
            dhw_shortfall_kw: 0.0,
        };
        assert!(!format!("{r}").is_empty());
    }
}
