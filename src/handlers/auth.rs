use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Role;
use crate::services::auth;
use crate::state::AppState;

fn parse_role(s: &str) -> Result<Role, AppError> {
    Role::parse(s).ok_or_else(|| AppError::Validation("role must be tourist or guide".to_string()))
}

// POST /api/register
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }
    let role = parse_role(&body.role)?;

    {
        let db = state.db.lock().unwrap();
        auth::register(&db, body.email.trim(), &body.password, role)?;
    }

    Ok(Json(serde_json::json!({
        "ok": true,
        "message": "Registration successful! Please login."
    })))
}

// POST /api/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let role = parse_role(&body.role)?;

    let logged_in_role = {
        let db = state.db.lock().unwrap();
        auth::login(&db, body.email.trim(), &body.password, role)?
    };

    Ok(Json(serde_json::json!({
        "ok": true,
        "role": logged_in_role.as_str()
    })))
}

// POST /api/forgot-password
#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }

    {
        let db = state.db.lock().unwrap();
        let mut store = state.verification.lock().unwrap();
        auth::start_password_reset(&db, &mut store, &email)?;
    }

    // Same answer whether or not the account exists.
    Ok(Json(serde_json::json!({
        "ok": true,
        "message": "If the email is registered, a reset code has been sent."
    })))
}

// POST /api/reset-password
#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = body.email.trim().to_lowercase();

    {
        let db = state.db.lock().unwrap();
        let mut store = state.verification.lock().unwrap();
        auth::reset_password(&db, &mut store, &email, &body.code, &body.new_password)?;
    }

    Ok(Json(serde_json::json!({"ok": true})))
}
