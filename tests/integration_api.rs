//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use heatsim::api::{AppState, router};
use heatsim::config::ScenarioConfig;

fn build_api_state() -> Arc<AppState> {
    Arc::new(AppState::from_scenario(ScenarioConfig::baseline()))
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn full_scenario_state_endpoint() {
    let app = router(build_api_state());

    let req = Request::builder()
        .uri("/state")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;

    assert_eq!(json["scenario"]["supply_path"], "hot_water_system");
    assert_eq!(json["scenario"]["system"]["kind"], "combi");
    assert_eq!(json["system"]["family"], "OnDemand");
    assert_eq!(json["system"]["max_kw"], 24.0);

    assert!(json["kpi"]["input_kwh"].as_f64().unwrap().is_finite());
    assert!(json["kpi"]["seasonal_efficiency"].as_f64().unwrap() < 1.0);

    assert_eq!(json["latest_step"]["step"], 95);
}

#[tokio::test]
async fn full_scenario_timeline_endpoint() {
    let app = router(build_api_state());

    let req = Request::builder()
        .uri("/timeline")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let records = json_body(resp).await;
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 96);

    let first = &records[0];
    for field in [
        "step",
        "time_hr",
        "room_temp_c",
        "heat_delivered_kw",
        "heat_demand_kw",
        "efficiency",
        "input_power_kw",
        "dhw_reserve_pct",
        "dhw_shortfall_kw",
    ] {
        assert!(first.get(field).is_some(), "missing {field}");
    }
}

#[tokio::test]
async fn simulate_runs_posted_scenario() {
    let app = router(build_api_state());
    let scenario = serde_json::json!({
        "supply_path": "electric",
        "building": { "peak_heat_loss_kw": 6.0, "tau_hours": 50.0 },
        "system": { "kind": "ashp", "design_flow_temp_c": 35.0 },
        "draws": [
            { "start_minute": 420, "end_minute": 430, "kind": "shower", "intensity": "high" }
        ]
    });

    let req = Request::builder()
        .method("POST")
        .uri("/simulate")
        .header("content-type", "application/json")
        .body(Body::from(scenario.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["system"]["family"], "HeatPump");
    assert_eq!(json["timeline"]["room_temp_c"].as_array().unwrap().len(), 96);
    assert!(json["kpi"]["seasonal_efficiency"].as_f64().unwrap() > 1.0);
    // Electric shower keeps the draw off the heat pump
    assert_eq!(json["timeline"]["dhw_load_kw"][28], 0.0);
}

#[tokio::test]
async fn simulate_rejects_invalid_scenario() {
    let app = router(build_api_state());
    let scenario = serde_json::json!({
        "building": { "tau_hours": 0.0 }
    });

    let req = Request::builder()
        .method("POST")
        .uri("/simulate")
        .header("content-type", "application/json")
        .body(Body::from(scenario.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = json_body(resp).await;
    let details = json["details"].as_array().unwrap();
    assert!(
        details
            .iter()
            .any(|d| d.as_str().unwrap_or("").contains("building.tau_hours"))
    );
}
