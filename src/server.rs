// src/server.rs
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::pipeline::Evaluator;
use crate::types::EvaluationReport;

pub const EMPTY_PROFILE_MESSAGE: &str = "Please enter profile text.";

#[derive(Deserialize)]
pub struct EvaluateReq {
    pub profile_text: String,
}

type ApiError = (StatusCode, Json<Value>);

pub async fn evaluate(
    State(evaluator): State<Arc<Evaluator>>,
    Json(req): Json<EvaluateReq>,
) -> Result<Json<EvaluationReport>, ApiError> {
    if req.profile_text.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": EMPTY_PROFILE_MESSAGE }))));
    }
    match evaluator.evaluate(&req.profile_text).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "evaluation failed");
            Err((StatusCode::BAD_GATEWAY, Json(json!({ "error": format!("{e:#}") }))))
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(evaluator: Arc<Evaluator>) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate))
        .route("/health", get(health))
        .with_state(evaluator)
}

pub async fn run_server(evaluator: Evaluator, addr: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(evaluator));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
