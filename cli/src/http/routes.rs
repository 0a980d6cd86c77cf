//! HTTP route handlers

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use finguard_core::api::{PipelineOutcome, Query};

use crate::http::{
    models::{AskRequest, HealthResponse, HttpServerError},
    state::AppState,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/ask", post(ask_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/shutdown", post(shutdown_handler))
        .with_state(state)
}

fn validate_ask(req: &AskRequest) -> Result<(), HttpServerError> {
    if req.question.trim().is_empty() {
        return Err(HttpServerError::InvalidRequest("question is empty".into()));
    }
    if req.context.user_id.trim().is_empty() {
        return Err(HttpServerError::InvalidRequest(
            "context.user_id is empty".into(),
        ));
    }
    Ok(())
}

/// POST /api/v1/ask
///
/// A denial is a 200 with `status = "denied"`; failed checks and failed
/// generation are 503 and 502.
async fn ask_handler(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<PipelineOutcome>, HttpServerError> {
    state.with_stats(|s| s.increment_request("/api/v1/ask"));
    validate_ask(&req)?;

    match state.pipeline.ask(Query::new(req.question, req.context)).await {
        Ok(outcome) => {
            state.with_stats(|s| {
                if outcome.is_denied() {
                    s.denied_total += 1;
                } else {
                    s.answered_total += 1;
                }
            });
            Ok(Json(outcome))
        }
        Err(e) => {
            state.with_stats(|s| s.errors_total += 1);
            Err(e.into())
        }
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (uptime_seconds, counters) = state
        .stats
        .read()
        .map(|s| {
            (
                s.uptime_seconds(),
                [s.requests_total, s.answered_total, s.denied_total, s.errors_total],
            )
        })
        .unwrap_or_default();
    let [requests_total, answered_total, denied_total, errors_total] = counters;
    Json(HealthResponse {
        status: if state.degraded { "degraded" } else { "healthy" }.to_string(),
        session_id: state.session_id.clone(),
        uptime_seconds,
        decision_backend: state.pipeline.decision_backend_name().to_string(),
        degraded: state.degraded,
        generator: state.pipeline.generator_name().to_string(),
        requests_total,
        answered_total,
        denied_total,
        errors_total,
        timestamp: Local::now().to_rfc3339(),
    })
}

/// POST /api/v1/shutdown
async fn shutdown_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    tracing::info!(target: "finguard.http", "shutdown requested via api");
    let _ = state.shutdown_tx.send(());
    Json(serde_json::json!({
        "success": true,
        "message": "Shutdown signal sent"
    }))
}
