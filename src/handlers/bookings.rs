use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Booking, BookingKind, BookingStatus, TouristBookingView};
use crate::services::workflow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

// POST /api/book
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub tourist_email: String,
    pub tourist_phone: String,
    pub guide_email: String,
    pub spot_name: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    for (value, field) in [
        (&body.tourist_email, "touristEmail"),
        (&body.guide_email, "guideEmail"),
        (&body.spot_name, "spotName"),
        (&body.date, "date"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }
    let kind = BookingKind::parse(&body.kind)
        .ok_or_else(|| AppError::Validation("type must be online or offline".to_string()))?;

    let booking = {
        let db = state.db.lock().unwrap();
        workflow::create_booking(
            &db,
            workflow::NewBooking {
                tourist_email: body.tourist_email.trim().to_string(),
                tourist_phone: body.tourist_phone.trim().to_string(),
                guide_email: body.guide_email.trim().to_string(),
                spot_name: body.spot_name,
                date: body.date,
                kind,
            },
        )?
    };

    Ok(Json(serde_json::json!({
        "ok": true,
        "id": booking.id,
        "message": "Booking request sent"
    })))
}

// PUT /api/booking-status
#[derive(Deserialize)]
pub struct StatusRequest {
    pub id: String,
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let target = BookingStatus::parse(&body.status)
        .ok_or_else(|| AppError::Validation(format!("unknown status: {}", body.status)))?;

    let booking = {
        let db = state.db.lock().unwrap();
        workflow::set_status(&db, &body.id, target)?
    };

    Ok(Json(serde_json::json!({
        "ok": true,
        "status": booking.status.as_str()
    })))
}

// POST /api/complete-trip
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTripRequest {
    pub booking_id: String,
    pub rating: i32,
    #[serde(default)]
    pub review: String,
}

pub async fn complete_trip(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CompleteTripRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        workflow::complete_trip(&db, &body.booking_id, body.rating, &body.review)?
    };

    Ok(Json(serde_json::json!({
        "ok": true,
        "rating": booking.rating
    })))
}

// GET /api/tourist-bookings?email=
pub async fn tourist_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<TouristBookingView>>, AppError> {
    let views = {
        let db = state.db.lock().unwrap();
        workflow::list_for_tourist(&db, query.email.trim())?
    };
    Ok(Json(views))
}

// GET /api/guide-bookings?email=
pub async fn guide_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = {
        let db = state.db.lock().unwrap();
        workflow::list_for_guide(&db, query.email.trim())?
    };
    Ok(Json(bookings))
}
