//! Machine identity routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/identifier | GET | Local machine id |
//! | /api/validate | POST | Compare a caller id with the local one |

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::{AppError, AppResult};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/identifier", get(identifier))
        .route("/api/validate", post(validate))
}

fn local_id(state: &ServerState) -> AppResult<String> {
    state
        .print
        .identity()
        .machine_id()
        .map(str::to_string)
        .ok_or_else(|| AppError::internal("Failed to get machine ID"))
}

#[derive(Debug, Serialize)]
pub struct IdentifierResponse {
    pub identifier: String,
}

/// GET /api/identifier
async fn identifier(State(state): State<ServerState>) -> AppResult<Json<IdentifierResponse>> {
    Ok(Json(IdentifierResponse {
        identifier: local_id(&state)?,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateRequest {
    #[serde(default)]
    machine_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub machine_id: String,
}

/// POST /api/validate
async fn validate(
    State(state): State<ServerState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> AppResult<Json<ValidateResponse>> {
    let Json(req) = payload?;
    let machine_id = local_id(&state)?;
    Ok(Json(ValidateResponse {
        valid: req.machine_id == machine_id,
        machine_id,
    }))
}
