//! Print submission routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/print | POST | Queue a bill or KOT |
//! | /api/test-print | POST | Queue the demo bill |
//!
//! Both answer before printing starts. A printer that cannot be resolved
//! answers 400 but still leaves a Failed job in the history.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::AppResult;
use crate::core::ServerState;
use crate::printing::{JobStatus, PrintRequest, Submission};

const SUBMITTED_MESSAGE: &str = "Print job submitted successfully. Processing in background.";

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/print", post(print))
        .route("/api/test-print", post(test_print))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintResponse {
    pub success: bool,
    pub job_id: String,
    pub printer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for Submission {
    fn into_response(self) -> Response {
        let failed = self.status == JobStatus::Failed;
        let body = PrintResponse {
            success: !failed,
            job_id: self.job_id,
            printer_name: self.printer_name,
            message: (!failed).then(|| SUBMITTED_MESSAGE.to_string()),
            error: self.error,
        };
        let status = if failed {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        };
        (status, Json(body)).into_response()
    }
}

/// POST /api/print
async fn print(
    State(state): State<ServerState>,
    payload: Result<Json<PrintRequest>, JsonRejection>,
) -> AppResult<Submission> {
    let Json(req) = payload?;
    Ok(state.print.submit(req).await?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TestPrintRequest {
    printer_name: String,
}

/// POST /api/test-print
async fn test_print(
    State(state): State<ServerState>,
    payload: Result<Json<TestPrintRequest>, JsonRejection>,
) -> AppResult<Submission> {
    let Json(req) = payload?;
    Ok(state.print.test_print(&req.printer_name).await)
}
