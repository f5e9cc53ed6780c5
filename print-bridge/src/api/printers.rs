//! Printer list routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/printers | GET | Cached printer list |
//! | /api/printers/refresh | POST | Re-enumerate and return the new list |

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use escpos_kit::PrinterInfo;
use serde::Serialize;

use super::{AppError, AppResult};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/printers", get(list))
        .route("/api/printers/refresh", post(refresh))
}

#[derive(Debug, Serialize)]
pub struct PrintersResponse {
    pub printers: Vec<PrinterInfo>,
}

/// GET /api/printers
///
/// An empty cache (e.g. the printer was plugged in after startup) triggers
/// one enumeration.
async fn list(State(state): State<ServerState>) -> Json<PrintersResponse> {
    let registry = state.print.registry();
    let mut printers = registry.list();
    if printers.is_empty() {
        match registry.refresh().await {
            Ok(fresh) => printers = fresh,
            Err(e) => tracing::warn!(error = %e, "Printer refresh failed"),
        }
    }
    Json(PrintersResponse { printers })
}

/// POST /api/printers/refresh
async fn refresh(State(state): State<ServerState>) -> AppResult<Json<PrintersResponse>> {
    let printers = state
        .print
        .registry()
        .refresh()
        .await
        .map_err(|e| AppError::internal(e.to_string()))?;
    state
        .hub
        .log(format!("[Printer] Refreshed, {} printer(s) found", printers.len()));
    Ok(Json(PrintersResponse { printers }))
}
