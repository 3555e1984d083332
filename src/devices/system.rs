//! Heat-source selection and default sizing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::boiler::DEFAULT_BASE_ETA;
use super::heat_pump::DEFAULT_FLOW_TEMP_C;

/// Design flow/return temperature difference for emitter sizing (K).
///
/// Exported for callers sizing emitters; the dispatcher does not use it.
pub const DESIGN_DELTA_T_C: f64 = 16.0;

/// Heat-pump capacity as a multiple of the building's peak heat loss.
pub const HEAT_PUMP_OVERSIZE: f64 = 1.1;

/// Default combi boiler output (kW).
pub const DEFAULT_COMBI_KW: f64 = 24.0;

/// Default system/regular boiler output (kW).
pub const DEFAULT_STORED_KW: f64 = 18.0;

/// Default minimum modulation as a fraction of maximum output.
pub const DEFAULT_TURNDOWN: f64 = 0.2;

/// Default cylinder volume (litres).
pub const DEFAULT_CYLINDER_L: f64 = 150.0;

/// Heat source requested by the caller.
///
/// `Current` defers to the household's existing installation via
/// [`CurrentHeatSource`] and is resolved before the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemKind {
    Combi,
    #[serde(alias = "ashp")]
    HeatPump,
    #[serde(alias = "system", alias = "regular", alias = "vented", alias = "unvented")]
    Stored,
    Current,
}

/// The heat source already installed in the dwelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentHeatSource {
    #[default]
    Combi,
    System,
    Regular,
    Ashp,
    Other,
}

/// The dispatch behaviour a resolved system follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatSourceFamily {
    /// Combi boiler: heats water on demand, DHW has priority.
    OnDemand,
    /// Air-source heat pump with a cylinder.
    HeatPump,
    /// System or regular boiler with a cylinder.
    StoredCylinder,
}

/// Error for a system name that does not match any known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown system \"{0}\", expected one of: combi, heat_pump, stored, current")]
pub struct SystemKindError(pub String);

impl SystemKind {
    /// All kinds a caller can request.
    pub const ALL: [SystemKind; 4] = [
        SystemKind::Combi,
        SystemKind::HeatPump,
        SystemKind::Stored,
        SystemKind::Current,
    ];

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            SystemKind::Combi => "combi",
            SystemKind::HeatPump => "heat_pump",
            SystemKind::Stored => "stored",
            SystemKind::Current => "current",
        }
    }

    /// Maps `Current` onto a concrete kind using the installed source.
    /// Other kinds are returned unchanged.
    pub fn resolve(self, current: Option<CurrentHeatSource>) -> SystemKind {
        match self {
            SystemKind::Current => {
                let resolved = match current.unwrap_or_default() {
                    CurrentHeatSource::Combi | CurrentHeatSource::Other => SystemKind::Combi,
                    CurrentHeatSource::Ashp => SystemKind::HeatPump,
                    CurrentHeatSource::System | CurrentHeatSource::Regular => SystemKind::Stored,
                };
                debug!(?current, resolved = resolved.as_str(), "resolved current system");
                resolved
            }
            other => other,
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemKind {
    type Err = SystemKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "combi" => Ok(SystemKind::Combi),
            "heat_pump" | "ashp" => Ok(SystemKind::HeatPump),
            "stored" | "system" | "regular" | "vented" | "unvented" => Ok(SystemKind::Stored),
            "current" => Ok(SystemKind::Current),
            _ => Err(SystemKindError(s.to_string())),
        }
    }
}

impl fmt::Display for HeatSourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeatSourceFamily::OnDemand => "on-demand",
            HeatSourceFamily::HeatPump => "heat pump",
            HeatSourceFamily::StoredCylinder => "stored cylinder",
        };
        f.write_str(name)
    }
}

/// Optional overrides and household context for [`build_system_config`].
///
/// Every field left as `None` takes the family default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildContext {
    /// Installed source, consulted only for [`SystemKind::Current`].
    pub current_heat_source: Option<CurrentHeatSource>,
    /// Maximum output (kW).
    pub max_kw: Option<f64>,
    /// Minimum stable output (kW); `0` disables the cycling penalty.
    pub min_kw: Option<f64>,
    /// Steady-state combustion efficiency.
    pub base_eta: Option<f64>,
    /// Heat-pump design flow temperature (°C).
    pub design_flow_temp_c: Option<f64>,
    /// Cylinder volume (litres).
    pub cylinder_volume_l: Option<f64>,
}

/// Fully resolved heat-source parameters for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub family: HeatSourceFamily,
    /// Maximum output (kW).
    pub max_kw: f64,
    /// Minimum stable output (kW); combustion families only.
    pub min_kw: Option<f64>,
    /// Steady-state efficiency; combustion families only.
    pub base_eta: Option<f64>,
    /// Design flow temperature (°C); heat pumps only.
    pub design_flow_temp_c: Option<f64>,
    /// Cylinder volume (litres); cylinder-backed families only.
    pub cylinder_volume_l: Option<f64>,
}

impl SystemConfig {
    /// Returns `true` for combustion families, which can short-cycle.
    pub fn is_combustion(&self) -> bool {
        self.family != HeatSourceFamily::HeatPump
    }
}

/// Resolves `kind` into concrete parameters for a building whose design
/// heat loss is `peak_heat_loss_kw`.
///
/// # Examples
///
/// ```
/// use heatsim::devices::system::{BuildContext, HeatSourceFamily, SystemKind, build_system_config};
///
/// let hp = build_system_config(SystemKind::HeatPump, 8.0, &BuildContext::default());
/// assert_eq!(hp.family, HeatSourceFamily::HeatPump);
/// assert!((hp.max_kw - 8.8).abs() < 1e-9);
///
/// let combi = build_system_config(SystemKind::Combi, 8.0, &BuildContext::default());
/// assert_eq!(combi.max_kw, 24.0);
/// assert_eq!(combi.min_kw, Some(4.8));
/// ```
pub fn build_system_config(
    kind: SystemKind,
    peak_heat_loss_kw: f64,
    ctx: &BuildContext,
) -> SystemConfig {
    let peak = if peak_heat_loss_kw.is_finite() {
        peak_heat_loss_kw.max(0.0)
    } else {
        0.0
    };

    match kind.resolve(ctx.current_heat_source) {
        SystemKind::HeatPump => SystemConfig {
            family: HeatSourceFamily::HeatPump,
            max_kw: ctx.max_kw.unwrap_or(peak * HEAT_PUMP_OVERSIZE),
            min_kw: None,
            base_eta: None,
            design_flow_temp_c: Some(ctx.design_flow_temp_c.unwrap_or(DEFAULT_FLOW_TEMP_C)),
            cylinder_volume_l: Some(ctx.cylinder_volume_l.unwrap_or(DEFAULT_CYLINDER_L)),
        },
        SystemKind::Stored => {
            let max_kw = ctx.max_kw.unwrap_or(DEFAULT_STORED_KW);
            SystemConfig {
                family: HeatSourceFamily::StoredCylinder,
                max_kw,
                min_kw: Some(ctx.min_kw.unwrap_or(max_kw * DEFAULT_TURNDOWN)),
                base_eta: Some(ctx.base_eta.unwrap_or(DEFAULT_BASE_ETA)),
                design_flow_temp_c: None,
                cylinder_volume_l: Some(ctx.cylinder_volume_l.unwrap_or(DEFAULT_CYLINDER_L)),
            }
        }
        // `resolve` never yields `Current`
        SystemKind::Combi | SystemKind::Current => {
            let max_kw = ctx.max_kw.unwrap_or(DEFAULT_COMBI_KW);
            SystemConfig {
                family: HeatSourceFamily::OnDemand,
                max_kw,
                min_kw: Some(ctx.min_kw.unwrap_or(max_kw * DEFAULT_TURNDOWN)),
                base_eta: Some(ctx.base_eta.unwrap_or(DEFAULT_BASE_ETA)),
                design_flow_temp_c: None,
                cylinder_volume_l: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(kind: SystemKind) -> SystemConfig {
        build_system_config(kind, 8.0, &BuildContext::default())
    }

    #[test]
    fn heat_pump_is_sized_from_peak() {
        let cfg = defaults(SystemKind::HeatPump);
        assert!((cfg.max_kw - 8.8).abs() < 1e-9);
        assert_eq!(cfg.design_flow_temp_c, Some(45.0));
        assert_eq!(cfg.cylinder_volume_l, Some(150.0));
        assert!(!cfg.is_combustion());
    }

    #[test]
    fn combustion_defaults() {
        let combi = defaults(SystemKind::Combi);
        assert_eq!(combi.family, HeatSourceFamily::OnDemand);
        assert_eq!(combi.max_kw, 24.0);
        assert_eq!(combi.base_eta, Some(0.85));
        assert_eq!(combi.cylinder_volume_l, None);

        let stored = defaults(SystemKind::Stored);
        assert_eq!(stored.family, HeatSourceFamily::StoredCylinder);
        assert_eq!(stored.max_kw, 18.0);
        assert!((stored.min_kw.unwrap_or_default() - 3.6).abs() < 1e-9);
    }

    #[test]
    fn overrides_win() {
        let ctx = BuildContext {
            max_kw: Some(10.0),
            min_kw: Some(0.0),
            base_eta: Some(0.9),
            ..BuildContext::default()
        };
        let cfg = build_system_config(SystemKind::Combi, 8.0, &ctx);
        assert_eq!(cfg.max_kw, 10.0);
        assert_eq!(cfg.min_kw, Some(0.0));
        assert_eq!(cfg.base_eta, Some(0.9));
    }

    #[test]
    fn current_resolves_from_household() {
        let cases = [
            (None, HeatSourceFamily::OnDemand),
            (Some(CurrentHeatSource::Combi), HeatSourceFamily::OnDemand),
            (Some(CurrentHeatSource::Other), HeatSourceFamily::OnDemand),
            (Some(CurrentHeatSource::Ashp), HeatSourceFamily::HeatPump),
            (Some(CurrentHeatSource::System), HeatSourceFamily::StoredCylinder),
            (Some(CurrentHeatSource::Regular), HeatSourceFamily::StoredCylinder),
        ];
        for (current, family) in cases {
            let ctx = BuildContext {
                current_heat_source: current,
                ..BuildContext::default()
            };
            let cfg = build_system_config(SystemKind::Current, 8.0, &ctx);
            assert_eq!(cfg.family, family, "current={current:?}");
        }
    }

    #[test]
    fn explicit_kind_ignores_household() {
        let ctx = BuildContext {
            current_heat_source: Some(CurrentHeatSource::Ashp),
            ..BuildContext::default()
        };
        let cfg = build_system_config(SystemKind::Combi, 8.0, &ctx);
        assert_eq!(cfg.family, HeatSourceFamily::OnDemand);
    }

    #[test]
    fn aliases_parse_to_same_kind() {
        assert_eq!("ashp".parse::<SystemKind>(), Ok(SystemKind::HeatPump));
        assert_eq!("Heat-Pump".parse::<SystemKind>(), Ok(SystemKind::HeatPump));
        for alias in ["system", "regular", "vented", "unvented", "stored"] {
            assert_eq!(alias.parse::<SystemKind>(), Ok(SystemKind::Stored));
        }
        assert!("boiler".parse::<SystemKind>().is_err());
    }

    #[test]
    fn serde_accepts_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: SystemKind,
        }
        let w: Result<Wrapper, _> = toml::from_str("kind = \"unvented\"");
        assert_eq!(w.map(|w| w.kind).ok(), Some(SystemKind::Stored));
        let w: Result<Wrapper, _> = toml::from_str("kind = \"ashp\"");
        assert_eq!(w.map(|w| w.kind).ok(), Some(SystemKind::HeatPump));
    }

    #[test]
    fn non_finite_peak_yields_zero_heat_pump() {
        let cfg = build_system_config(SystemKind::HeatPump, f64::NAN, &BuildContext::default());
        assert_eq!(cfg.max_kw, 0.0);
    }
}
