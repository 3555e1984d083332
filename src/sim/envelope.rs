//! Single-zone lumped-capacitance thermal envelope.
//!
//! The room is one node of capacitance `C = τ·H` losing heat to outdoors
//! through `H`. Over a step with constant input `Q` the exact solution is
//!
//! ```text
//! T' = T_eq + (T - T_eq)·exp(-dt/τ),   T_eq = T_out + Q/H
//! ```

use super::types::{BuildingInput, DT_HOURS};

/// Per-run envelope constants derived from the building input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Heat-loss coefficient (kW/K).
    h_kw_per_k: f64,
    /// Outdoor temperature (°C).
    outdoor_c: f64,
    /// Step decay factor `exp(-dt/τ)`.
    decay: f64,
}

impl Envelope {
    /// Derives envelope constants for `building` at the solver step length.
    pub fn new(building: &BuildingInput) -> Self {
        Self::with_step(building, DT_HOURS)
    }

    /// Like [`Self::new`] with an explicit step length in hours.
    pub fn with_step(building: &BuildingInput, dt_hours: f64) -> Self {
        let tau = building.effective_tau_hours();
        Self {
            h_kw_per_k: building.heat_loss_coefficient_kw_per_k(),
            outdoor_c: building.outdoor_c,
            decay: (-dt_hours / tau).exp(),
        }
    }

    /// Heat-loss coefficient (kW/K).
    pub fn h_kw_per_k(&self) -> f64 {
        self.h_kw_per_k
    }

    /// Room temperature at the end of a step that started at `room_c` and
    /// received `space_heat_kw` of space heating.
    ///
    /// With no heat the room relaxes towards outdoors. A building with no
    /// heat path (`H = 0`) holds its temperature.
    pub fn advance(&self, room_c: f64, space_heat_kw: f64) -> f64 {
        if self.h_kw_per_k <= 0.0 {
            return room_c;
        }
        let q = space_heat_kw.max(0.0);
        let equilibrium = self.outdoor_c + q / self.h_kw_per_k;
        equilibrium + (room_c - equilibrium) * self.decay
    }

    /// Space-heating power that would bring the room from `room_c` to
    /// `setpoint_c` by the end of the step. Zero when the room is warm enough
    /// to coast.
    pub fn space_demand_kw(&self, room_c: f64, setpoint_c: f64) -> f64 {
        if self.h_kw_per_k <= 0.0 {
            return 0.0;
        }
        let response = 1.0 - self.decay;
        if response <= 0.0 {
            return 0.0;
        }
        let drift = self.decay * (room_c - self.outdoor_c);
        let required = self.h_kw_per_k * (setpoint_c - self.outdoor_c - drift) / response;
        required.max(0.0)
    }

    /// Steady-state heat loss with the room held at `room_c` (kW).
    pub fn steady_loss_kw(&self, room_c: f64) -> f64 {
        (self.h_kw_per_k * (room_c - self.outdoor_c)).max(0.0)
    }
}
