//! Router and route handlers.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use fibdex_core::DurableRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitResponse {
    pub working: bool,
}

/// Creates the fibdex router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(greeting))
        .route("/values/all", get(all_values))
        .route("/values/current", get(current_values))
        .route("/values", post(submit_value))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn greeting() -> &'static str {
    "Hi"
}

/// `GET /values/all`. Always 200; degraded stores shrink the list.
async fn all_values(State(state): State<AppState>) -> Json<Vec<DurableRow>> {
    Json(state.reader.read_all().await.rows)
}

/// `GET /values/current`. A cache failure is answered with `null`.
async fn current_values(
    State(state): State<AppState>,
) -> Json<Option<HashMap<String, String>>> {
    Json(state.reader.read_current().await.ok())
}

/// `POST /values`. Responds once the write is dispatched, not persisted.
///
/// The body is read as raw JSON so validation decides what counts as an
/// integer. Anything that is not an object carrying `index` (including an
/// unreadable body) validates as a missing index.
async fn submit_value(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let index = match body {
        Ok(Json(body)) => submitted_index(&body),
        Err(rejection) => {
            debug!(error = %rejection, "unreadable submit body");
            Value::Null
        }
    };
    // dropping the handle detaches the durable insert
    let _accepted = state.writer.submit(&index).await?;
    Ok(Json(SubmitResponse { working: true }))
}

fn submitted_index(body: &Value) -> Value {
    body.as_object()
        .and_then(|fields| fields.get("index"))
        .cloned()
        .unwrap_or(Value::Null)
}
