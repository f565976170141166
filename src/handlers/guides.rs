use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::GuideProfile;
use crate::services::upload;
use crate::state::AppState;

// GET /api/guides
pub async fn list_guides(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GuideProfile>>, AppError> {
    let guides = {
        let db = state.db.lock().unwrap();
        queries::list_guide_profiles(&db)?
    };
    Ok(Json(guides))
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

// GET /api/guide-profile?email=
//
// Explicit get-or-create: the first fetch for an email persists a stub
// profile, every later fetch is a plain read.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<GuideProfile>, AppError> {
    let email = query.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }

    let profile = {
        let db = state.db.lock().unwrap();
        match queries::get_guide_profile(&db, &email)? {
            Some(profile) => profile,
            None => {
                let stub = GuideProfile::stub(&email);
                queries::upsert_guide_profile(&db, &stub)?;
                stub
            }
        }
    };

    Ok(Json(profile))
}

// POST /api/guide-profile (multipart: email, name, bio, languages, experience,
// phone, optional profileImage)
//
// Partial merge with upsert semantics: only supplied fields change, and a
// record exists afterwards regardless of prior state.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut email = None;
    let mut name = None;
    let mut bio = None;
    let mut experience = None;
    let mut languages = None;
    let mut phone = None;
    let mut image: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "profileImage" => {
                let filename = field.file_name().unwrap_or("").to_string();
                if filename.is_empty() {
                    continue;
                }
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
                    "email" => email = Some(value),
                    "name" => name = Some(value),
                    "bio" => bio = Some(value),
                    "experience" => experience = Some(value),
                    "languages" => languages = Some(value),
                    "phone" => phone = Some(value),
                    _ => {}
                }
            }
        }
    }

    let email = email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("email is required".to_string()))?;

    let profile_image = match image {
        Some((filename, content_type, bytes)) => {
            upload::validate_image(&filename, content_type.as_deref())?;
            Some(upload::store_image(
                &state.config.uploads_dir,
                "guide",
                &filename,
                &bytes,
            )?)
        }
        None => None,
    };

    {
        let db = state.db.lock().unwrap();
        let mut profile = queries::get_guide_profile(&db, &email)?
            .unwrap_or_else(|| GuideProfile::stub(&email));

        if let Some(name) = name {
            profile.name = name;
        }
        if let Some(bio) = bio {
            profile.bio = Some(bio);
        }
        if let Some(experience) = experience {
            profile.experience = Some(experience);
        }
        if let Some(languages) = languages {
            profile.languages = Some(languages);
        }
        if let Some(phone) = phone {
            profile.phone = Some(phone);
        }
        if let Some(path) = profile_image {
            profile.profile_image = Some(path);
        }

        queries::upsert_guide_profile(&db, &profile)?;
    }

    Ok(Json(serde_json::json!({"ok": true})))
}
