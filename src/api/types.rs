//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::devices::SystemConfig;
use crate::sim::engine::Timeline;
use crate::sim::kpi::KpiReport;
use crate::sim::types::StepRecord;

/// Scenario, KPIs and the final step of the served run.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub scenario: ScenarioConfig,
    pub system: SystemConfig,
    pub kpi: KpiReport,
    /// Last step of the day, absent for an empty run.
    pub latest_step: Option<StepRecord>,
}

/// Result of an ad-hoc run.
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub system: SystemConfig,
    pub kpi: KpiReport,
    pub timeline: Timeline,
}

/// Optional range query parameters for the timeline endpoint.
#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    /// First step (inclusive).
    pub from: Option<usize>,
    /// Last step (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Individual validation failures, when there are any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}
