use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Free-text visitor feedback. Append-only, unrelated to any other entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}
