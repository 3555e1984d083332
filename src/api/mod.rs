//! REST API over a simulated day.
//!
//! - `GET /state`: scenario, KPI report and the last step
//! - `GET /timeline`: per-step records with optional range filtering
//! - `POST /simulate`: runs a scenario sent as JSON

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::config::ScenarioConfig;
use crate::sim::engine::{Solver, Timeline};
use crate::sim::kpi::KpiReport;

pub use types::{ErrorResponse, SimulateResponse, StateResponse, TimelineQuery};

/// Immutable application state shared across all request handlers.
///
/// Built once after the startup run and wrapped in `Arc`; handlers only read
/// it.
pub struct AppState {
    /// Scenario the startup run used.
    pub scenario: ScenarioConfig,
    /// Aggregate KPI report.
    pub kpi: KpiReport,
    /// Per-step output.
    pub timeline: Timeline,
}

impl AppState {
    /// Runs `scenario` and captures its output.
    pub fn from_scenario(scenario: ScenarioConfig) -> Self {
        let input = scenario.to_solver_input();
        let timeline = Solver::new(input.clone()).run();
        let kpi = KpiReport::from_timeline(&timeline, &input.system);
        Self {
            scenario,
            kpi,
            timeline,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/timeline", get(handlers::get_timeline))
        .route("/simulate", post(handlers::post_simulate))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
