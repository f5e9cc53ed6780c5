//! POST /api/test-notification
//!
//! Missing fields and unparseable bodies both fall back to the default
//! test title and message.

use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use serde::Serialize;

use crate::core::ServerState;
use crate::services::Notification;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/test-notification", post(test_notification))
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub message: &'static str,
}

async fn test_notification(State(state): State<ServerState>, body: Bytes) -> Json<NotificationResponse> {
    let notification = serde_json::from_slice::<Notification>(&body)
        .unwrap_or_default()
        .or_defaults();
    state.print.notifier().notify(notification);

    Json(NotificationResponse {
        success: true,
        message: "Notification sent",
    })
}
