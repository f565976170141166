use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::TouristSpot;
use crate::services::upload;
use crate::state::AppState;

// GET /api/spots
pub async fn list_spots(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TouristSpot>>, AppError> {
    let spots = {
        let db = state.db.lock().unwrap();
        queries::list_spots(&db)?
    };
    Ok(Json(spots))
}

// POST /api/spots (multipart: state, name, category, desc, lat, lng, image)
pub async fn create_spot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let mut spot_state = None;
    let mut name = None;
    let mut category = None;
    let mut description = None;
    let mut lat = None;
    let mut lng = None;
    let mut image: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read image: {e}")))?;
                image = Some((filename, content_type, bytes.to_vec()));
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read field: {e}")))?;
                match other {
                    "state" => spot_state = Some(value),
                    "name" => name = Some(value),
                    "category" => category = Some(value),
                    "desc" => description = Some(value),
                    "lat" => lat = Some(value),
                    "lng" => lng = Some(value),
                    _ => {}
                }
            }
        }
    }

    let spot_state = require(spot_state, "state")?;
    let name = require(name, "name")?;
    let category = require(category, "category")?;
    let description = require(description, "desc")?;
    let lat = parse_coord(require(lat, "lat")?, "lat")?;
    let lng = parse_coord(require(lng, "lng")?, "lng")?;
    let (filename, content_type, bytes) =
        image.ok_or_else(|| AppError::Validation("no image uploaded".to_string()))?;

    upload::validate_image(&filename, content_type.as_deref())?;
    let image_path = upload::store_image(&state.config.uploads_dir, "spot", &filename, &bytes)?;

    let spot = TouristSpot {
        id: Uuid::new_v4().to_string(),
        state: spot_state,
        name,
        category,
        image: image_path,
        description,
        lat,
        lng,
        created_at: Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        queries::insert_spot(&db, &spot)?;
    }
    tracing::info!(spot = %spot.name, "new spot added");

    Ok(Json(serde_json::json!({"ok": true, "id": spot.id})))
}

// DELETE /api/spots/:id
pub async fn delete_spot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    // Idempotent to the caller: deleting an absent spot is still a success.
    {
        let db = state.db.lock().unwrap();
        queries::delete_spot(&db, &id)?;
    }

    Ok(Json(serde_json::json!({"ok": true})))
}

fn require(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

fn parse_coord(value: String, field: &str) -> Result<f64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{field} must be a number")))
}
