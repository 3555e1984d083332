//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::devices::{
    BuildContext, CurrentHeatSource, SystemConfig, SystemKind, build_system_config,
};
use crate::sim::engine::SolverInput;
use crate::sim::event::{DrawEvent, DrawKind, Intensity};
use crate::sim::schedule::OccupancySchedule;
use crate::sim::supply_path::SupplyPath;
use crate::sim::types::{BuildingInput, MINUTES_PER_DAY};

/// Top-level scenario configuration parsed from TOML.
///
/// Every section has a default, so an empty file is the baseline scenario.
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or start from one of
/// the [`ScenarioConfig::PRESETS`].
///
/// ```toml
/// supply_path = "mixed"
///
/// [building]
/// peak_heat_loss_kw = 6.0
/// tau_hours = 50.0
///
/// [system]
/// kind = "ashp"
/// design_flow_temp_c = 35.0
///
/// [[draws]]
/// start_minute = 420
/// end_minute = 430
/// kind = "shower"
/// intensity = "medium"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// How draws reach the heat source.
    #[serde(default)]
    pub supply_path: SupplyPath,
    /// Building envelope and setpoints.
    #[serde(default)]
    pub building: BuildingInput,
    /// Heat-source choice and sizing overrides.
    #[serde(default)]
    pub system: SystemSection,
    /// Home/away windows.
    #[serde(default)]
    pub occupancy: OccupancySchedule,
    /// Scheduled hot-water draws.
    #[serde(default = "default_draws")]
    pub draws: Vec<DrawEvent>,
}

/// Heat-source choice and optional sizing overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemSection {
    /// Requested system; `current` defers to `current_heat_source`.
    pub kind: SystemKind,
    /// Source installed today.
    pub current_heat_source: Option<CurrentHeatSource>,
    /// Maximum output (kW).
    pub max_kw: Option<f64>,
    /// Minimum stable output (kW).
    pub min_kw: Option<f64>,
    /// Steady-state combustion efficiency (0–1).
    pub base_eta: Option<f64>,
    /// Heat-pump design flow temperature (°C).
    pub design_flow_temp_c: Option<f64>,
    /// Cylinder volume (litres).
    pub cylinder_volume_l: Option<f64>,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            kind: SystemKind::Combi,
            current_heat_source: None,
            max_kw: None,
            min_kw: None,
            base_eta: None,
            design_flow_temp_c: None,
            cylinder_volume_l: None,
        }
    }
}

impl SystemSection {
    /// Overrides in the form the system builder takes.
    pub fn context(&self) -> BuildContext {
        BuildContext {
            current_heat_source: self.current_heat_source,
            max_kw: self.max_kw,
            min_kw: self.min_kw,
            base_eta: self.base_eta,
            design_flow_temp_c: self.design_flow_temp_c,
            cylinder_volume_l: self.cylinder_volume_l,
        }
    }
}

/// A morning and evening routine for a small household.
pub fn default_draws() -> Vec<DrawEvent> {
    vec![
        DrawEvent::new(420, 430, DrawKind::Shower, Intensity::Medium),
        DrawEvent::new(435, 440, DrawKind::Sink, Intensity::Medium),
        DrawEvent::new(1080, 1090, DrawKind::Sink, Intensity::High),
        DrawEvent::new(1170, 1230, DrawKind::Dishwasher, Intensity::Medium),
        DrawEvent::new(1260, 1275, DrawKind::Bath, Intensity::Medium),
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"building.tau_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "heat_pump", "stored_tight"];

    /// 8 kW, τ = 35 h dwelling with a 24 kW combi and the default draws.
    pub fn baseline() -> Self {
        Self {
            supply_path: SupplyPath::default(),
            building: BuildingInput::default(),
            system: SystemSection::default(),
            occupancy: OccupancySchedule::default(),
            draws: default_draws(),
        }
    }

    /// The baseline dwelling on a low-temperature heat pump.
    pub fn heat_pump() -> Self {
        Self {
            system: SystemSection {
                kind: SystemKind::HeatPump,
                design_flow_temp_c: Some(35.0),
                ..SystemSection::default()
            },
            ..Self::baseline()
        }
    }

    /// Well-insulated heavy dwelling with a system boiler and a small cylinder.
    pub fn stored_tight() -> Self {
        Self {
            building: BuildingInput {
                peak_heat_loss_kw: 4.0,
                tau_hours: 70.0,
                ..BuildingInput::default()
            },
            system: SystemSection {
                kind: SystemKind::Stored,
                max_kw: Some(12.0),
                cylinder_volume_l: Some(120.0),
                ..SystemSection::default()
            },
            ..Self::baseline()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "heat_pump" => Ok(Self::heat_pump()),
            "stored_tight" => Ok(Self::stored_tight()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, contains unknown fields
    /// or names an unknown supply path or system.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let b = &self.building;
        if !(b.peak_heat_loss_kw.is_finite() && b.peak_heat_loss_kw >= 0.0) {
            errors.push(ConfigError::new("building.peak_heat_loss_kw", "must be >= 0"));
        }
        if !(b.tau_hours.is_finite() && b.tau_hours > 0.0) {
            errors.push(ConfigError::new("building.tau_hours", "must be > 0"));
        }
        for (field, value) in [
            ("building.design_outdoor_c", b.design_outdoor_c),
            ("building.outdoor_c", b.outdoor_c),
            ("building.setpoint_home_c", b.setpoint_home_c),
            ("building.setpoint_away_c", b.setpoint_away_c),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be a finite temperature"));
            }
        }

        let s = &self.system;
        let non_negative = [
            ("system.max_kw", s.max_kw),
            ("system.min_kw", s.min_kw),
            ("system.cylinder_volume_l", s.cylinder_volume_l),
        ];
        for (field, value) in non_negative {
            if let Some(v) = value {
                if !(v.is_finite() && v >= 0.0) {
                    errors.push(ConfigError::new(field, "must be >= 0"));
                }
            }
        }
        // Against the resolved capacity, so a default-sized unit is covered too
        let resolved = self.system_config();
        if let Some(min) = resolved.min_kw {
            if min > resolved.max_kw {
                errors.push(ConfigError::new(
                    "system.min_kw",
                    format!("must be <= max_kw ({} kW)", resolved.max_kw),
                ));
            }
        }
        if let Some(eta) = s.base_eta {
            if !(eta > 0.0 && eta <= 1.0) {
                errors.push(ConfigError::new("system.base_eta", "must be in (0.0, 1.0]"));
            }
        }
        if let Some(flow) = s.design_flow_temp_c {
            if !flow.is_finite() {
                errors.push(ConfigError::new(
                    "system.design_flow_temp_c",
                    "must be a finite temperature",
                ));
            }
        }

        for (i, w) in self.occupancy.away.iter().enumerate() {
            if w.0 >= w.1 || w.1 > MINUTES_PER_DAY {
                errors.push(ConfigError::new(
                    format!("occupancy.away[{i}]"),
                    format!("must satisfy start < end <= {MINUTES_PER_DAY}"),
                ));
            }
        }

        for (i, d) in self.draws.iter().enumerate() {
            if d.start_minute >= d.end_minute {
                errors.push(ConfigError::new(
                    format!("draws[{i}].start_minute"),
                    "must be < end_minute",
                ));
            }
            if d.end_minute > MINUTES_PER_DAY {
                errors.push(ConfigError::new(
                    format!("draws[{i}].end_minute"),
                    format!("must be <= {MINUTES_PER_DAY}"),
                ));
            }
        }

        errors
    }

    /// Resolved heat-source parameters for this scenario.
    pub fn system_config(&self) -> SystemConfig {
        build_system_config(
            self.system.kind,
            self.building.peak_heat_loss_kw,
            &self.system.context(),
        )
    }

    /// Everything the solver needs to run this scenario.
    pub fn to_solver_input(&self) -> SolverInput {
        SolverInput {
            building: self.building.clone(),
            system: self.system_config(),
            draws: self.draws.clone(),
            supply_path: self.supply_path,
            occupancy: self.occupancy.clone(),
        }
    }
}
