use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A catalogued tourist attraction. Created and deleted by admins, never
/// updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouristSpot {
    pub id: String,
    pub state: String,
    pub name: String,
    pub category: String,
    /// Path under the static uploads mount, e.g. `/uploads/spot-123.jpg`.
    pub image: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: NaiveDateTime,
}
