use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use seird::config::ServerConfig;
use seird::logging::init_logger;
use seird::math::ode::Tolerances;
use seird::model::policy::{resolve_schedule, Policy, PolicySet, PolicyToggles};
use seird::model::trajectory::Trajectory;
use seird::model::transmission::ReproductionSchedule;
use seird::scenario::{compare, standard_scenarios, ScenarioSummary};
use seird::simulation::{run_schedule, SimulationConfig, TimeGrid};
use seird::{EpidemiologicalParameters, SimulationError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunRequest {
    params: EpidemiologicalParameters,
    policies: PolicyToggles,
    grid: TimeGrid,
    tolerances: Tolerances,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompareRequest {
    params: EpidemiologicalParameters,
    grid: TimeGrid,
    tolerances: Tolerances,
}

#[derive(Debug, Serialize)]
struct RunResponse {
    return_code: i32,
    schedule: ReproductionSchedule,
    summary: ScenarioSummary,
    total: Vec<f64>,
    trajectory: Trajectory,
}

#[derive(Debug, Serialize)]
struct PolicyInfo {
    key: &'static str,
    label: &'static str,
    decrement: f64,
}

type ApiError = (StatusCode, serde_json::Value);

fn error_response(e: SimulationError) -> ApiError {
    let (status, code) = match e {
        SimulationError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, 1),
        SimulationError::IntegrationFailure(_) => (StatusCode::INTERNAL_SERVER_ERROR, 2),
    };
    (status, json!({"return_code": code, "error": e.to_string()}))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = ServerConfig::from_env()?;
    init_logger(cfg.log_format);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/policies", get(policies))
        .route("/run_simulation", post(run_simulation))
        .route("/compare", post(compare_scenarios));

    let addr = cfg.socket_addr()?;
    tracing::info!(%addr, "seird-api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

async fn policies() -> impl IntoResponse {
    let list: Vec<PolicyInfo> = Policy::ALL
        .into_iter()
        .map(|p| PolicyInfo { key: p.key(), label: p.label(), decrement: p.decrement() })
        .collect();
    Json(list)
}

async fn run_simulation(Json(req): Json<RunRequest>) -> impl IntoResponse {
    // Integration is CPU-bound; keep it off the async workers.
    let join = tokio::task::spawn_blocking(move || run_simulation_sync(req));

    match join.await {
        Ok(Ok(resp)) => (StatusCode::OK, Json(resp)).into_response(),
        Ok(Err((code, body))) => (code, Json(body)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"return_code": 2, "error": format!("join error: {e}")})),
        )
            .into_response(),
    }
}

fn run_simulation_sync(req: RunRequest) -> Result<RunResponse, ApiError> {
    let policies = PolicySet::from(req.policies);
    let schedule = resolve_schedule(&policies);
    let config = SimulationConfig { grid: req.grid, tolerances: req.tolerances };

    let trajectory = run_schedule(&req.params, schedule, &config).map_err(|e| {
        tracing::warn!(error = %e, "simulation rejected");
        error_response(e)
    })?;

    tracing::info!(
        policies = policies.len(),
        r_end = schedule.r_end(),
        points = trajectory.len(),
        "simulation complete"
    );

    Ok(RunResponse {
        return_code: 0,
        schedule,
        summary: ScenarioSummary::from_trajectory("requested", schedule, &trajectory),
        total: trajectory.totals(),
        trajectory,
    })
}

async fn compare_scenarios(Json(req): Json<CompareRequest>) -> impl IntoResponse {
    let join = tokio::task::spawn_blocking(move || {
        let config = SimulationConfig { grid: req.grid, tolerances: req.tolerances };
        compare(&req.params, &standard_scenarios(), &config)
    });

    match join.await {
        Ok(Ok(summaries)) => (StatusCode::OK, Json(json!({"return_code": 0, "scenarios": summaries}))).into_response(),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "comparison rejected");
            let (code, body) = error_response(e);
            (code, Json(body)).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"return_code": 2, "error": format!("join error: {e}")})),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_maps_to_bad_request() {
        let req = RunRequest {
            params: EpidemiologicalParameters { population: 0.0, ..Default::default() },
            ..Default::default()
        };
        let (status, body) = run_simulation_sync(req).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["return_code"], 1);
        assert!(body["error"].as_str().unwrap_or_default().contains("population"), "{}", body);
    }

    #[test]
    fn oversized_grid_maps_to_bad_request() {
        let req: RunRequest = serde_json::from_value(json!({"grid": {"points": usize::MAX}})).expect("parse");
        let (status, body) = run_simulation_sync(req).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["return_code"], 1);
    }

    #[test]
    fn integration_failure_maps_to_server_error() {
        let req = RunRequest {
            tolerances: Tolerances { max_steps: 3, ..Default::default() },
            ..Default::default()
        };
        let (status, body) = run_simulation_sync(req).unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["return_code"], 2);
    }

    #[test]
    fn response_reports_the_integrated_schedule() {
        let req: RunRequest =
            serde_json::from_value(json!({"policies": {"stay_at_home": true}})).expect("parse");
        let resp = run_simulation_sync(req).expect("simulation");
        assert_eq!(resp.return_code, 0);
        assert!((resp.schedule.r_end() - 5.6).abs() < 1e-12);
        assert_eq!(resp.schedule.x0, 30.0);
        assert_eq!(resp.trajectory.len(), 100);
        assert_eq!(resp.total.len(), 100);
        let last_r = resp.trajectory.reproduction_number[99];
        assert!((last_r - resp.schedule.reproduction_number(99.0)).abs() < 1e-12);
    }
}
