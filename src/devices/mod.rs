//! Heat sources and the hot-water cylinder they share.

/// Combi and cylinder-fed combustion boilers.
pub mod boiler;
/// Stored hot-water cylinder.
pub mod cylinder;
/// Air-source heat pump.
pub mod heat_pump;
/// System selection and default sizing.
pub mod system;
pub mod types;

pub use boiler::{CombiBoiler, StoredBoiler};
pub use cylinder::Cylinder;
pub use heat_pump::HeatPump;
pub use system::{
    BuildContext, CurrentHeatSource, DESIGN_DELTA_T_C, HeatSourceFamily, SystemConfig,
    SystemKind, build_system_config,
};
pub use types::{HeatSource, StepDemand, StepDispatch};

use crate::sim::types::SimState;

use boiler::DEFAULT_BASE_ETA;
use heat_pump::DEFAULT_FLOW_TEMP_C;
use system::DEFAULT_CYLINDER_L;

/// A concrete heat source, dispatched statically.
#[derive(Debug, Clone, PartialEq)]
pub enum Plant {
    OnDemand(CombiBoiler),
    Stored(StoredBoiler),
    HeatPump(HeatPump),
}

impl Plant {
    /// Instantiates the heat source described by `config`.
    pub fn from_config(config: &SystemConfig) -> Self {
        let cylinder =
            || Cylinder::from_volume_l(config.cylinder_volume_l.unwrap_or(DEFAULT_CYLINDER_L));
        let base_eta = config.base_eta.unwrap_or(DEFAULT_BASE_ETA);
        match config.family {
            HeatSourceFamily::OnDemand => {
                Plant::OnDemand(CombiBoiler::new(config.max_kw, config.min_kw, base_eta))
            }
            HeatSourceFamily::StoredCylinder => Plant::Stored(StoredBoiler::new(
                config.max_kw,
                config.min_kw,
                base_eta,
                cylinder(),
            )),
            HeatSourceFamily::HeatPump => Plant::HeatPump(HeatPump::new(
                config.max_kw,
                config.design_flow_temp_c.unwrap_or(DEFAULT_FLOW_TEMP_C),
                cylinder(),
            )),
        }
    }

    /// Minimum stable output for combustion plant.
    pub fn min_kw(&self) -> Option<f64> {
        match self {
            Plant::OnDemand(b) => b.min_kw,
            Plant::Stored(b) => b.min_kw,
            Plant::HeatPump(_) => None,
        }
    }
}

impl HeatSource for Plant {
    fn dispatch(&self, demand: &StepDemand, state: &mut SimState) -> StepDispatch {
        match self {
            Plant::OnDemand(b) => b.dispatch(demand, state),
            Plant::Stored(b) => b.dispatch(demand, state),
            Plant::HeatPump(hp) => hp.dispatch(demand, state),
        }
    }

    fn max_kw(&self) -> f64 {
        match self {
            Plant::OnDemand(b) => b.max_kw(),
            Plant::Stored(b) => b.max_kw(),
            Plant::HeatPump(hp) => hp.max_kw(),
        }
    }

    fn family(&self) -> &'static str {
        match self {
            Plant::OnDemand(b) => b.family(),
            Plant::Stored(b) => b.family(),
            Plant::HeatPump(hp) => hp.family(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_matches_family() {
        for (kind, expected) in [
            (SystemKind::Combi, "Combi"),
            (SystemKind::Stored, "StoredCylinder"),
            (SystemKind::HeatPump, "HeatPump"),
        ] {
            let cfg = build_system_config(kind, 8.0, &BuildContext::default());
            let plant = Plant::from_config(&cfg);
            assert_eq!(plant.family(), expected);
            assert_eq!(plant.max_kw(), cfg.max_kw);
        }
    }

    #[test]
    fn heat_pump_has_no_minimum() {
        let cfg = build_system_config(SystemKind::HeatPump, 8.0, &BuildContext::default());
        assert_eq!(Plant::from_config(&cfg).min_kw(), None);
    }
}
