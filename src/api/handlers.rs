//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::debug;

use crate::config::ScenarioConfig;
use crate::sim::engine::Solver;
use crate::sim::kpi::KpiReport;
use crate::sim::types::StepRecord;

use super::AppState;
use super::types::{ErrorResponse, SimulateResponse, StateResponse, TimelineQuery};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let latest_step = state
        .timeline
        .len()
        .checked_sub(1)
        .and_then(|t| state.timeline.record(t));

    Json(StateResponse {
        scenario: state.scenario.clone(),
        system: state.scenario.system_config(),
        kpi: state.kpi.clone(),
        latest_step,
    })
}

/// Returns step records, optionally filtered by an inclusive step range.
///
/// `GET /timeline` → 200 + `Vec<StepRecord>` JSON
/// `GET /timeline?from=N&to=M` → filtered range
/// `GET /timeline?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Vec<StepRecord>>, ApiError> {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "`from` ({from}) must be <= `to` ({to})"
            ))),
        ));
    }

    let records = state
        .timeline
        .records()
        .into_iter()
        .filter(|r| r.step >= from && r.step <= to)
        .collect();

    Ok(Json(records))
}

/// Runs the posted scenario.
///
/// `POST /simulate` with a `ScenarioConfig` JSON body → 200 +
/// `SimulateResponse`, or 400 + `ErrorResponse` listing validation failures.
pub async fn post_simulate(
    Json(scenario): Json<ScenarioConfig>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let errors = scenario.validate();
    if !errors.is_empty() {
        debug!(count = errors.len(), "rejected scenario");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "invalid scenario".to_string(),
                details: errors.iter().map(ToString::to_string).collect(),
            }),
        ));
    }

    let input = scenario.to_solver_input();
    let system = input.system.clone();
    let timeline = Solver::new(input).run();
    let kpi = KpiReport::from_timeline(&timeline, &system);

    Ok(Json(SimulateResponse {
        system,
        kpi,
        timeline,
    }))
}
