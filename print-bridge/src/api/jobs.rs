//! Job history routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/jobs | GET | All jobs, newest first |
//! | /api/jobs | DELETE | Clear the history |
//! | /api/jobs/{id} | GET | One job |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;

use super::{AppError, AppResult};
use crate::core::ServerState;
use crate::printing::PrintJob;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/jobs", get(list).delete(clear))
        .route("/api/jobs/{id}", get(get_by_id))
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<PrintJob>,
}

/// GET /api/jobs
async fn list(State(state): State<ServerState>) -> Json<JobsResponse> {
    Json(JobsResponse {
        jobs: state.print.store().all(),
    })
}

/// GET /api/jobs/{id}
async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PrintJob>> {
    state
        .print
        .store()
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Job {} not found", id)))
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub cleared: usize,
}

/// DELETE /api/jobs
async fn clear(State(state): State<ServerState>) -> Json<ClearResponse> {
    let store = state.print.store();
    let cleared = store.len();
    store.clear();
    tracing::info!(cleared, "Job history cleared");
    Json(ClearResponse {
        success: true,
        cleared,
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::Request;

    use crate::api::testing::{call, get, state_with};
    use crate::printing::PrintJob;
    use crate::receipt::ReceiptType;
    use crate::services::Identity;

    #[tokio::test]
    async fn test_list_get_and_clear() {
        let (state, _) = state_with(&[], Identity::unknown()).await;
        let job = PrintJob::new("INV-7", "Kitchen", ReceiptType::Kot);
        state.print.store().upsert(job.clone());

        let (status, body) = call(&state, get("/api/jobs")).await;
        assert_eq!(status, 200);
        assert_eq!(body["jobs"][0]["id"], job.id.as_str());
        assert_eq!(body["jobs"][0]["receiptType"], "kot");
        assert_eq!(body["jobs"][0]["status"], "processing");

        let (status, body) = call(&state, get(&format!("/api/jobs/{}", job.id))).await;
        assert_eq!(status, 200);
        assert_eq!(body["invoiceNo"], "INV-7");

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/jobs")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&state, delete).await;
        assert_eq!(status, 200);
        assert_eq!(body["cleared"], 1);
        assert!(state.print.store().is_empty());
    }

    #[tokio::test]
    async fn test_missing_job() {
        let (state, _) = state_with(&[], Identity::unknown()).await;
        let (status, body) = call(&state, get("/api/jobs/nope")).await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "not_found");
    }
}
