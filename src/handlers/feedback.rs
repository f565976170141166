use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::Feedback;
use crate::state::AppState;

// POST /api/feedback
#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }

    {
        let db = state.db.lock().unwrap();
        queries::insert_feedback(&db, body.name.trim(), body.email.trim(), body.message.trim())?;
    }
    tracing::info!(email = %body.email, "feedback received");

    Ok(Json(serde_json::json!({"ok": true})))
}

// GET /api/view-feedback
pub async fn view_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Feedback>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let entries = {
        let db = state.db.lock().unwrap();
        queries::list_feedback(&db)?
    };
    Ok(Json(entries))
}
