use serde::{Deserialize, Serialize};

/// Extended guide metadata, keyed by the guide's account email. A stub record
/// is created on first profile fetch, so a row may exist with only defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideProfile {
    pub email: String,
    pub name: String,
    pub bio: Option<String>,
    pub experience: Option<String>,
    pub languages: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub rating: f64,
    pub reviews_count: i64,
}

impl GuideProfile {
    pub fn stub(email: &str) -> Self {
        Self {
            email: email.to_string(),
            name: "New Guide".to_string(),
            bio: None,
            experience: None,
            languages: None,
            phone: None,
            profile_image: None,
            rating: 0.0,
            reviews_count: 0,
        }
    }
}
