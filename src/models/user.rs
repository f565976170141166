use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tourist,
    Guide,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tourist => "tourist",
            Role::Guide => "guide",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tourist" => Some(Role::Tourist),
            "guide" => Some(Role::Guide),
            _ => None,
        }
    }
}
