use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingKind, BookingStatus, Feedback, GuideProfile, Role, TouristSpot, User,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Users ──

pub fn get_user(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT email, password_hash, role FROM users WHERE email = ?1",
        params![email],
        |row| {
            let role_str: String = row.get(2)?;
            Ok(User {
                email: row.get(0)?,
                password_hash: row.get(1)?,
                role: Role::parse(&role_str).unwrap_or(Role::Tourist),
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (email, password_hash, role) VALUES (?1, ?2, ?3)",
        params![user.email, user.password_hash, user.role.as_str()],
    )?;
    Ok(())
}

pub fn update_user_password(conn: &Connection, email: &str, hash: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE email = ?2",
        params![hash, email],
    )?;
    Ok(count > 0)
}

// ── Spots ──

pub fn insert_spot(conn: &Connection, spot: &TouristSpot) -> anyhow::Result<()> {
    let created_at = spot.created_at.format(DATETIME_FMT).to_string();
    conn.execute(
        "INSERT INTO spots (id, state, name, category, image, description, lat, lng, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            spot.id,
            spot.state,
            spot.name,
            spot.category,
            spot.image,
            spot.description,
            spot.lat,
            spot.lng,
            created_at,
        ],
    )?;
    Ok(())
}

pub fn list_spots(conn: &Connection) -> anyhow::Result<Vec<TouristSpot>> {
    let mut stmt = conn.prepare(
        "SELECT id, state, name, category, image, description, lat, lng, created_at
         FROM spots ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        let created_at_str: String = row.get(8)?;
        Ok(TouristSpot {
            id: row.get(0)?,
            state: row.get(1)?,
            name: row.get(2)?,
            category: row.get(3)?,
            image: row.get(4)?,
            description: row.get(5)?,
            lat: row.get(6)?,
            lng: row.get(7)?,
            created_at: parse_datetime(&created_at_str),
        })
    })?;

    let mut spots = vec![];
    for row in rows {
        spots.push(row?);
    }
    Ok(spots)
}

pub fn delete_spot(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM spots WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Guide profiles ──

pub fn get_guide_profile(conn: &Connection, email: &str) -> anyhow::Result<Option<GuideProfile>> {
    let result = conn.query_row(
        "SELECT email, name, bio, experience, languages, phone, profile_image, rating, reviews_count
         FROM guide_profiles WHERE email = ?1",
        params![email],
        parse_profile_row,
    );

    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_guide_profiles(conn: &Connection) -> anyhow::Result<Vec<GuideProfile>> {
    let mut stmt = conn.prepare(
        "SELECT email, name, bio, experience, languages, phone, profile_image, rating, reviews_count
         FROM guide_profiles ORDER BY email ASC",
    )?;

    let rows = stmt.query_map([], parse_profile_row)?;

    let mut profiles = vec![];
    for row in rows {
        profiles.push(row?);
    }
    Ok(profiles)
}

pub fn upsert_guide_profile(conn: &Connection, profile: &GuideProfile) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO guide_profiles (email, name, bio, experience, languages, phone, profile_image, rating, reviews_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(email) DO UPDATE SET
           name = excluded.name,
           bio = excluded.bio,
           experience = excluded.experience,
           languages = excluded.languages,
           phone = excluded.phone,
           profile_image = excluded.profile_image",
        params![
            profile.email,
            profile.name,
            profile.bio,
            profile.experience,
            profile.languages,
            profile.phone,
            profile.profile_image,
            profile.rating,
            profile.reviews_count,
        ],
    )?;
    Ok(())
}

fn parse_profile_row(row: &rusqlite::Row) -> rusqlite::Result<GuideProfile> {
    Ok(GuideProfile {
        email: row.get(0)?,
        name: row.get(1)?,
        bio: row.get(2)?,
        experience: row.get(3)?,
        languages: row.get(4)?,
        phone: row.get(5)?,
        profile_image: row.get(6)?,
        rating: row.get(7)?,
        reviews_count: row.get(8)?,
    })
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let created_at = booking.created_at.format(DATETIME_FMT).to_string();
    conn.execute(
        "INSERT INTO bookings (id, tourist_email, tourist_phone, guide_email, spot_name, date, kind, status, rating, review, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.tourist_email,
            booking.tourist_phone,
            booking.guide_email,
            booking.spot_name,
            booking.date,
            booking.kind.as_str(),
            booking.status.as_str(),
            booking.rating,
            booking.review,
            created_at,
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, tourist_email, tourist_phone, guide_email, spot_name, date, kind, status, rating, review, created_at
         FROM bookings WHERE id = ?1",
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Compare-and-set on the status column. Returns false when the row is gone
/// or its status no longer matches `expected`, so a racing transition loses
/// cleanly instead of clobbering.
pub fn transition_booking_status(
    conn: &Connection,
    id: &str,
    expected: BookingStatus,
    next: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2 AND status = ?3",
        params![next.as_str(), id, expected.as_str()],
    )?;
    Ok(count > 0)
}

pub fn complete_booking(
    conn: &Connection,
    id: &str,
    rating: i32,
    review: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = 'completed', rating = ?1, review = ?2
         WHERE id = ?3 AND status = 'accepted'",
        params![rating, review, id],
    )?;
    Ok(count > 0)
}

pub fn bookings_for_tourist(conn: &Connection, email: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, tourist_email, tourist_phone, guide_email, spot_name, date, kind, status, rating, review, created_at
         FROM bookings WHERE tourist_email = ?1 ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt.query_map(params![email], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn offline_bookings_for_guide(conn: &Connection, email: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, tourist_email, tourist_phone, guide_email, spot_name, date, kind, status, rating, review, created_at
         FROM bookings WHERE guide_email = ?1 AND kind = 'offline' ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt.query_map(params![email], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let kind_str: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(10)?;

    Ok(Booking {
        id: row.get(0)?,
        tourist_email: row.get(1)?,
        tourist_phone: row.get(2)?,
        guide_email: row.get(3)?,
        spot_name: row.get(4)?,
        date: row.get(5)?,
        kind: BookingKind::parse(&kind_str).unwrap_or(BookingKind::Online),
        status: BookingStatus::parse(&status_str).unwrap_or(BookingStatus::Pending),
        rating: row.get(8)?,
        review: row.get(9)?,
        created_at: parse_datetime(&created_at_str),
    })
}

// ── Feedback ──

pub fn insert_feedback(
    conn: &Connection,
    name: &str,
    email: &str,
    message: &str,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO feedback (name, email, message) VALUES (?1, ?2, ?3)",
        params![name, email, message],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_feedback(conn: &Connection) -> anyhow::Result<Vec<Feedback>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, message, created_at
         FROM feedback ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        let created_at_str: String = row.get(4)?;
        Ok(Feedback {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            message: row.get(3)?,
            created_at: parse_datetime(&created_at_str),
        })
    })?;

    let mut entries = vec![];
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}
