//! Booking record and the value types it is built from.

use crate::error::{BookingError, BookingResult};
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of cab a customer can book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CabClass {
    Standard,
    Premium,
    Luxury,
}

impl CabClass {
    /// All classes, cheapest first.
    pub const ALL: [CabClass; 3] = [Self::Standard, Self::Premium, Self::Luxury];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Premium => "Premium",
            Self::Luxury => "Luxury",
        }
    }

    /// Parse a class name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "premium" => Some(Self::Premium),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }
}

impl TryFrom<&str> for CabClass {
    type Error = BookingError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s).ok_or_else(|| {
            BookingError::invalid(
                "cab_type",
                format!("unknown cab type '{}'. Valid types: Standard, Premium, Luxury", s),
            )
        })
    }
}

impl fmt::Display for CabClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cab reservation.
///
/// Field names on the wire follow the record layout clients already know:
/// `booking_id`, `pickup_datetime` and `cab_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "booking_id")]
    pub id: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    /// Pickup time exactly as the customer supplied it.
    #[serde(rename = "pickup_datetime")]
    pub pickup_time: String,
    /// Parsed pickup time; offsets are dropped after parsing.
    pub pickup_at: NaiveDateTime,
    #[serde(rename = "cab_type")]
    pub cab_class: CabClass,
    pub status: BookingStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub fare: Decimal,
}

/// Unvalidated booking input, as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_datetime: String,
    pub cab_type: String,
}

impl BookingRequest {
    pub fn new(
        pickup_location: impl Into<String>,
        dropoff_location: impl Into<String>,
        pickup_datetime: impl Into<String>,
        cab_type: impl Into<String>,
    ) -> Self {
        Self {
            pickup_location: pickup_location.into(),
            dropoff_location: dropoff_location.into(),
            pickup_datetime: pickup_datetime.into(),
            cab_type: cab_type.into(),
        }
    }

    /// Check every field; the first violation wins.
    pub fn validate(self) -> BookingResult<ValidatedBooking> {
        let pickup_location = non_empty("pickup_location", self.pickup_location)?;
        let dropoff_location = non_empty("dropoff_location", self.dropoff_location)?;
        let pickup_at = parse_pickup_time(&self.pickup_datetime).ok_or_else(|| {
            BookingError::invalid(
                "pickup_datetime",
                format!(
                    "'{}' is not a valid date-time (expected ISO 8601, e.g. 2024-01-01T10:00:00)",
                    self.pickup_datetime
                ),
            )
        })?;
        let cab_class = CabClass::try_from(self.cab_type.as_str())?;

        Ok(ValidatedBooking {
            pickup_location,
            dropoff_location,
            pickup_time: self.pickup_datetime,
            pickup_at,
            cab_class,
        })
    }
}

/// Booking input that passed validation and only lacks an id and a fare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_time: String,
    pub pickup_at: NaiveDateTime,
    pub cab_class: CabClass,
}

fn non_empty(field: &'static str, value: String) -> BookingResult<String> {
    if value.trim().is_empty() {
        return Err(BookingError::invalid(field, "must not be empty"));
    }
    Ok(value)
}

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an RFC 3339 timestamp or an ISO 8601 local date-time.
pub fn parse_pickup_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
