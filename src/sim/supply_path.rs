//! DHW supply-path policy and the per-step hot-water load resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::event::{DrawEvent, DrawKind};
use super::types::STEP_MINUTES;

/// Fraction of a sink-type draw that is hot under [`SupplyPath::Mixed`].
pub const MIXED_SINK_HOT_FRACTION: f64 = 0.6;

/// How scheduled draws reach the simulated heat source.
///
/// Selected once per run. Parsing is case-insensitive and accepts the aliases
/// listed on [`SupplyPath::from_str`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SupplyPath {
    /// Every draw is fully served by the hot-water system.
    #[default]
    HotWaterSystem,
    /// Draws are cold only; no thermal load.
    ColdOnly,
    /// Sink-type draws are partially hot, baths and showers fully hot.
    Mixed,
    /// Showers run on an independent electric heater; everything else is hot.
    ElectricColdOnly,
}

/// Unknown supply-path string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown supply path \"{0}\", expected one of: hot_water_system, cold_only, mixed, electric_cold_only")]
pub struct SupplyPathError(pub String);

impl SupplyPath {
    /// All policies, in canonical order.
    pub const ALL: [SupplyPath; 4] = [
        SupplyPath::HotWaterSystem,
        SupplyPath::ColdOnly,
        SupplyPath::Mixed,
        SupplyPath::ElectricColdOnly,
    ];

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            SupplyPath::HotWaterSystem => "hot_water_system",
            SupplyPath::ColdOnly => "cold_only",
            SupplyPath::Mixed => "mixed",
            SupplyPath::ElectricColdOnly => "electric_cold_only",
        }
    }

    /// Parses an optional policy string, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns a `SupplyPathError` if the string is present but unknown.
    pub fn parse_or_default(value: Option<&str>) -> Result<Self, SupplyPathError> {
        value.map_or(Ok(Self::default()), str::parse)
    }

    /// Fraction of a draw of `kind` that becomes a thermal load on the source.
    pub fn hot_fraction(self, kind: DrawKind) -> f64 {
        match self {
            SupplyPath::HotWaterSystem => 1.0,
            SupplyPath::ColdOnly => 0.0,
            SupplyPath::Mixed if kind.is_sink_type() => MIXED_SINK_HOT_FRACTION,
            SupplyPath::Mixed => 1.0,
            SupplyPath::ElectricColdOnly if kind == DrawKind::Shower => 0.0,
            SupplyPath::ElectricColdOnly => 1.0,
        }
    }
}

impl FromStr for SupplyPath {
    type Err = SupplyPathError;

    /// Accepted spellings (any case, `-` or space in place of `_`):
    ///
    /// * `hot_water_system`, `hot_water`, `hws`
    /// * `cold_only`, `cold`
    /// * `mixed`, `partial`
    /// * `electric_cold_only`, `electric`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match key.as_str() {
            "hot_water_system" | "hot_water" | "hws" => Ok(SupplyPath::HotWaterSystem),
            "cold_only" | "cold" => Ok(SupplyPath::ColdOnly),
            "mixed" | "partial" => Ok(SupplyPath::Mixed),
            "electric_cold_only" | "electric" => Ok(SupplyPath::ElectricColdOnly),
            _ => Err(SupplyPathError(s.to_string())),
        }
    }
}

impl TryFrom<String> for SupplyPath {
    type Error = SupplyPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SupplyPath> for String {
    fn from(path: SupplyPath) -> Self {
        path.as_str().to_string()
    }
}

impl fmt::Display for SupplyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hot-water demand for one step.
///
/// `thermal_kw` is the step-averaged load and conserves energy. Draws often
/// run for only part of a step, so `rate_kw` and `active_fraction` describe
/// the load while water is actually flowing:
/// `thermal_kw == rate_kw * active_fraction`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DhwLoad {
    /// Thermal load on the heat source after the supply-path policy,
    /// averaged over the step (kW).
    pub thermal_kw: f64,
    /// Mean thermal load while at least one hot draw is running (kW).
    pub rate_kw: f64,
    /// Fraction of the step during which a hot draw is running (0–1).
    pub active_fraction: f64,
    /// Load implied by the active draws if all of them were fully hot (kW).
    pub unconstrained_kw: f64,
    /// Number of draws overlapping the step.
    pub active_draws: usize,
}

/// Classifies the draws active during `step` under `path`.
///
/// Only reads the event list; arbitration against the source's capacity is
/// the dispatcher's job.
pub fn resolve_dhw(step: usize, events: &[DrawEvent], path: SupplyPath) -> DhwLoad {
    let mut load = events
        .iter()
        .filter(|e| e.is_active(step))
        .fold(DhwLoad::default(), |mut acc, e| {
            let kw = e.full_hot_kw_at(step);
            acc.unconstrained_kw += kw;
            acc.thermal_kw += kw * path.hot_fraction(e.kind);
            acc.active_draws += 1;
            acc
        });

    let window_start = step as u32 * STEP_MINUTES;
    let hot_minutes = (window_start..window_start + STEP_MINUTES)
        .filter(|&m| {
            events
                .iter()
                .any(|e| e.covers_minute(m) && path.hot_fraction(e.kind) > 0.0)
        })
        .count();

    if hot_minutes > 0 && load.thermal_kw > 0.0 {
        load.active_fraction = hot_minutes as f64 / f64::from(STEP_MINUTES);
        load.rate_kw = load.thermal_kw / load.active_fraction;
    }
    load
}
