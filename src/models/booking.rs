use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub tourist_email: String,
    pub tourist_phone: String,
    pub guide_email: String,
    pub spot_name: String,
    /// Trip date as supplied by the tourist (free-form `YYYY-MM-DD`).
    pub date: String,
    pub kind: BookingKind,
    pub status: BookingStatus,
    /// 1-5 once the trip is completed, 0 before that.
    pub rating: i32,
    pub review: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    Online,
    Offline,
}

impl BookingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingKind::Online => "online",
            BookingKind::Offline => "offline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(BookingKind::Online),
            "offline" => Some(BookingKind::Offline),
            _ => None,
        }
    }
}

/// Booking lifecycle. Legal transitions are `Pending -> Accepted`,
/// `Pending -> Rejected` and `Accepted -> Completed`; `Rejected` and
/// `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "accepted" => Some(BookingStatus::Accepted),
            "rejected" => Some(BookingStatus::Rejected),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Completed)
    }
}

/// A booking as the tourist sees it: joined with the guide's profile, with
/// contact details gated on the booking status.
#[derive(Debug, Clone, Serialize)]
pub struct TouristBookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub guide_name: String,
    pub guide_contact: String,
}
