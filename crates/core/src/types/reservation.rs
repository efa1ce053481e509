//! Reservation record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::{Price, ReservationId, ReservationStatus, ServiceId};

/// A booking made by the authenticated client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    #[serde(default)]
    pub service_id: Option<ServiceId>,
    /// Denormalized service name, joined in by the API.
    #[serde(default)]
    pub service_nom: Option<String>,
    #[serde(deserialize_with = "date_from_api")]
    pub date_reservation: NaiveDate,
    #[serde(deserialize_with = "time_from_api")]
    pub heure: NaiveTime,
    #[serde(default)]
    pub statut: ReservationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub prix: Option<Price>,
}

impl Reservation {
    /// Start of the appointment.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date_reservation.and_time(self.heure)
    }
}

/// Accepts `2025-03-14` as well as a timestamp.
///
/// The API sends `DATE` columns as the database server's local midnight
/// converted to UTC, so a Paris server sends the 14th as
/// `2025-03-13T23:00:00.000Z`. Taking the date of the nearest UTC midnight
/// gives the calendar day back for any server offset in (-12:00, +12:00].
fn date_from_api<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(&raw) {
        return Ok((instant.with_timezone(&Utc) + TimeDelta::hours(12)).date_naive());
    }
    raw.parse::<NaiveDateTime>()
        .map(|local| local.date())
        .map_err(D::Error::custom)
}

/// Accepts `HH:MM:SS` and `HH:MM`.
fn time_from_api<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveTime::parse_from_str(&raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
        .map_err(D::Error::custom)
}
