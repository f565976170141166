use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;

use crate::errors::AppError;

pub const MAX_IMAGE_BYTES: usize = 5_000_000;

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Extension and content-type check for uploaded images. Both must look like
/// an image for the file to be accepted.
pub fn validate_image(filename: &str, content_type: Option<&str>) -> Result<(), AppError> {
    let ext = extension(filename);
    let ext_ok = ext
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false);
    let mime_ok = content_type.map(|ct| ct.starts_with("image/")).unwrap_or(false);

    if ext_ok && mime_ok {
        Ok(())
    } else {
        Err(AppError::Validation("images only (jpeg, jpg, png, gif)".to_string()))
    }
}

/// Write image bytes into the uploads directory as
/// `<prefix>-<millis>.<ext>` and return the public `/uploads/...` path.
pub fn store_image(
    uploads_dir: &str,
    prefix: &str,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(format!(
            "image exceeds the {MAX_IMAGE_BYTES} byte limit"
        )));
    }

    let ext = extension(original_name)
        .ok_or_else(|| AppError::Validation("image file has no extension".to_string()))?;
    let filename = format!("{prefix}-{}.{ext}", Utc::now().timestamp_millis());

    fs::create_dir_all(uploads_dir)
        .with_context(|| format!("failed to create uploads dir: {uploads_dir}"))?;
    let path = Path::new(uploads_dir).join(&filename);
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(format!("/uploads/{filename}"))
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
