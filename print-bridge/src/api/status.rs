//! GET /api/status

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/status", get(status))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub port: u16,
    pub running: bool,
    pub version: &'static str,
    pub printer_count: usize,
    pub job_count: usize,
    pub clients: usize,
}

async fn status(State(state): State<ServerState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        port: state.config.http_port,
        running: true,
        version: env!("CARGO_PKG_VERSION"),
        printer_count: state.print.registry().list().len(),
        job_count: state.print.store().len(),
        clients: state.hub.subscriber_count(),
    })
}
