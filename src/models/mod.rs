pub mod booking;
pub mod feedback;
pub mod guide;
pub mod spot;
pub mod user;

pub use booking::{Booking, BookingKind, BookingStatus, TouristBookingView};
pub use feedback::Feedback;
pub use guide::GuideProfile;
pub use spot::TouristSpot;
pub use user::{Role, User};
