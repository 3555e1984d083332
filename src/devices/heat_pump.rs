//! Air-source heat pump with a stored hot-water cylinder.

use crate::sim::types::SimState;

use super::cylinder::Cylinder;
use super::types::{HeatSource, StepDemand, StepDispatch, capacity_kw};

/// Fraction of the Carnot COP a real unit achieves.
pub const CARNOT_FRACTION: f64 = 0.45;

/// COP bounds applied to the Carnot estimate.
pub const MIN_COP: f64 = 1.5;
pub const MAX_COP: f64 = 6.0;

/// Flow temperature used when reheating the cylinder (°C).
pub const DHW_FLOW_TEMP_C: f64 = 55.0;

/// Design flow temperature assumed when none is configured (°C).
pub const DEFAULT_FLOW_TEMP_C: f64 = 45.0;

const KELVIN: f64 = 273.15;

/// Coefficient of performance lifting heat from `outdoor_c` to `flow_c`.
///
/// A fixed fraction of the Carnot limit, with the lift floored at 1 K and the
/// result clamped to `[MIN_COP, MAX_COP]`. Lower flow temperatures always give
/// an equal or higher COP. The ordering is strict only below the clamp: once
/// both flow temperatures reach `MAX_COP` (outdoors at roughly 26 °C or
/// warmer for 35 °C and 50 °C flow) they tie.
///
/// # Examples
///
/// ```
/// use heatsim::devices::heat_pump::cop;
///
/// assert!(cop(35.0, 7.0) > cop(50.0, 7.0));
/// assert!(cop(50.0, -3.0) > 1.0);
/// ```
pub fn cop(flow_c: f64, outdoor_c: f64) -> f64 {
    let lift = (flow_c - outdoor_c).max(1.0);
    let carnot = (flow_c + KELVIN) / lift;
    let estimate = CARNOT_FRACTION * carnot;
    if estimate.is_finite() {
        estimate.clamp(MIN_COP, MAX_COP)
    } else {
        MIN_COP
    }
}

/// Air-source heat pump.
///
/// Space heating runs continuously up to capacity at the design flow
/// temperature; a cylinder buffers hot-water draws and is reheated at
/// [`DHW_FLOW_TEMP_C`] from whatever capacity is left.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatPump {
    /// Maximum thermal output (kW).
    pub max_kw: f64,
    /// Design flow temperature for space heating (°C).
    pub design_flow_c: f64,
    /// Cylinder buffering the draws.
    pub cylinder: Cylinder,
}

impl HeatPump {
    /// Creates a heat pump. Negative or non-finite capacity is treated as zero.
    pub fn new(max_kw: f64, design_flow_c: f64, cylinder: Cylinder) -> Self {
        Self {
            max_kw: capacity_kw(max_kw),
            design_flow_c: if design_flow_c.is_finite() {
                design_flow_c
            } else {
                DEFAULT_FLOW_TEMP_C
            },
            cylinder,
        }
    }
}

impl HeatSource for HeatPump {
    fn dispatch(&self, demand: &StepDemand, state: &mut SimState) -> StepDispatch {
        let space_cop = cop(self.design_flow_c, demand.outdoor_c);
        let dhw_cop = cop(DHW_FLOW_TEMP_C, demand.outdoor_c);

        let space_kw = demand.space_kw.max(0.0).min(self.max_kw);
        let spare_kw = self.max_kw - space_kw;
        let flow = self.cylinder.serve(
            &mut state.reserve_pct,
            demand.dhw_kw,
            spare_kw,
            demand.dt_hours,
        );
        let water_kw = flow.source_kw();

        let input_kw = space_kw / space_cop + water_kw / dhw_cop;
        let delivered_kw = space_kw + water_kw;
        let efficiency = if input_kw > 0.0 {
            delivered_kw / input_kw
        } else {
            space_cop
        };

        StepDispatch {
            space_kw,
            water_kw,
            efficiency,
            input_kw,
            service_pct: state.reserve_pct,
            shortfall_kw: 0.0,
        }
    }

    fn max_kw(&self) -> f64 {
        self.max_kw
    }

    fn family(&self) -> &'static str {
        "HeatPump"
    }
}
