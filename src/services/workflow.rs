use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingKind, BookingStatus, TouristBookingView};

/// Placeholder returned to tourists in place of the guide's contact details
/// while a booking has not been accepted.
pub const HIDDEN_CONTACT: &str = "Hidden until accepted";

pub struct NewBooking {
    pub tourist_email: String,
    pub tourist_phone: String,
    pub guide_email: String,
    pub spot_name: String,
    pub date: String,
    pub kind: BookingKind,
}

/// Insert a new `pending` booking. Multiple bookings for the same
/// tourist/spot/date are allowed.
pub fn create_booking(conn: &Connection, req: NewBooking) -> Result<Booking, AppError> {
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        tourist_email: req.tourist_email,
        tourist_phone: req.tourist_phone,
        guide_email: req.guide_email,
        spot_name: req.spot_name,
        date: req.date,
        kind: req.kind,
        status: BookingStatus::Pending,
        rating: 0,
        review: String::new(),
        created_at: Utc::now().naive_utc(),
    };

    queries::insert_booking(conn, &booking)?;
    tracing::info!(booking_id = %booking.id, guide = %booking.guide_email, "booking created");
    Ok(booking)
}

/// Accept or reject a pending booking. Any other transition is illegal:
/// only `pending -> accepted` and `pending -> rejected` go through here.
pub fn set_status(
    conn: &Connection,
    id: &str,
    target: BookingStatus,
) -> Result<Booking, AppError> {
    if !matches!(target, BookingStatus::Accepted | BookingStatus::Rejected) {
        return Err(AppError::InvalidTransition(format!(
            "status can only be set to accepted or rejected, not {}",
            target.as_str()
        )));
    }

    let booking = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if booking.status != BookingStatus::Pending {
        return Err(AppError::InvalidTransition(format!(
            "cannot move a {} booking to {}",
            booking.status.as_str(),
            target.as_str()
        )));
    }

    let updated = queries::transition_booking_status(conn, id, BookingStatus::Pending, target)?;
    if !updated {
        // Lost a race with another status change between the read and the
        // compare-and-set update.
        return Err(AppError::InvalidTransition(format!(
            "booking {id} is no longer pending"
        )));
    }

    tracing::info!(booking_id = %id, status = target.as_str(), "booking status updated");
    Ok(Booking {
        status: target,
        ..booking
    })
}

/// Complete an accepted trip and record the tourist's rating. The rating is
/// immutable afterwards: a second completion attempt fails.
pub fn complete_trip(
    conn: &Connection,
    id: &str,
    rating: i32,
    review: &str,
) -> Result<Booking, AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(format!(
            "rating must be between 1 and 5, got {rating}"
        )));
    }

    let booking = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if booking.status != BookingStatus::Accepted {
        return Err(AppError::InvalidTransition(format!(
            "only an accepted booking can be completed, this one is {}",
            booking.status.as_str()
        )));
    }

    let updated = queries::complete_booking(conn, id, rating, review)?;
    if !updated {
        return Err(AppError::InvalidTransition(format!(
            "booking {id} is no longer accepted"
        )));
    }

    tracing::info!(booking_id = %id, rating, "trip completed");
    Ok(Booking {
        status: BookingStatus::Completed,
        rating,
        review: review.to_string(),
        ..booking
    })
}

/// All bookings for a tourist, newest first, each enriched with the guide's
/// name and contact. Contact details are disclosed only once the guide has
/// accepted; a missing guide profile leaves them hidden.
///
/// The booking read and the profile read are independent; a profile edit
/// between the two is tolerated.
pub fn list_for_tourist(
    conn: &Connection,
    email: &str,
) -> Result<Vec<TouristBookingView>, AppError> {
    let bookings = queries::bookings_for_tourist(conn, email)?;

    let mut views = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let guide = queries::get_guide_profile(conn, &booking.guide_email)?;

        let guide_name = guide
            .as_ref()
            .map(|g| g.name.clone())
            .unwrap_or_else(|| "Unknown Guide".to_string());

        let disclosed = matches!(
            booking.status,
            BookingStatus::Accepted | BookingStatus::Completed
        );
        let guide_contact = match (&guide, disclosed) {
            (Some(g), true) => match &g.phone {
                Some(phone) if !phone.is_empty() => phone.clone(),
                _ => g.email.clone(),
            },
            _ => HIDDEN_CONTACT.to_string(),
        };

        views.push(TouristBookingView {
            booking,
            guide_name,
            guide_contact,
        });
    }

    Ok(views)
}

/// Offline bookings assigned to a guide, newest first. The tourist's phone is
/// always visible here; supplying it is part of making an offline booking.
pub fn list_for_guide(conn: &Connection, email: &str) -> Result<Vec<Booking>, AppError> {
    Ok(queries::offline_bookings_for_guide(conn, email)?)
}
