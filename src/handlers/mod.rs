pub mod auth;
pub mod bookings;
pub mod feedback;
pub mod guides;
pub mod health;
pub mod spots;

use axum::http::HeaderMap;

use crate::errors::AppError;

/// Bearer-token check for the admin-only routes.
pub(crate) fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
