//! Existing commitments and outgoing booking requests.
//!
//! A [`BookedInterval`] blocks time on one calendar date. A [`BookingRequest`]
//! is the record the booking form produces for a chosen slot; this crate
//! validates it but never transmits it anywhere.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::service::Service;
use crate::slots::Slot;
use crate::time::TimeOfDay;

// ── BookedInterval ──────────────────────────────────────────────────────────

/// An existing booking: `[start, start + duration)` on `date`.
///
/// The end may run past midnight; it still only blocks `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct BookedInterval {
    date: NaiveDate,
    start: TimeOfDay,
    duration: u32,
}

#[derive(Deserialize)]
struct RawInterval {
    date: NaiveDate,
    #[serde(alias = "time")]
    start: TimeOfDay,
    duration: u32,
}

impl TryFrom<RawInterval> for BookedInterval {
    type Error = BookingError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        BookedInterval::new(raw.date, raw.start, raw.duration)
    }
}

impl BookedInterval {
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidDuration`] for a zero duration.
    pub fn new(date: NaiveDate, start: TimeOfDay, duration: u32) -> Result<Self> {
        if duration == 0 {
            return Err(BookingError::InvalidDuration(format!(
                "booking on {} at {} has zero length",
                date, start
            )));
        }
        Ok(BookedInterval {
            date,
            start,
            duration,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn start_minutes(&self) -> u32 {
        self.start.minutes()
    }

    /// Exclusive end in minutes since midnight; may exceed 1440.
    pub fn end_minutes(&self) -> u32 {
        self.start.minutes().saturating_add(self.duration)
    }

    /// Half-open overlap with `[start, end)` in minutes on the same date.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        start < self.end_minutes() && end > self.start_minutes()
    }
}

// ── BookingRequest ──────────────────────────────────────────────────────────

/// Contact details a client enters on the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ClientContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A request to book `service_id` at `time` on `date` with provider `notary_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub notary_id: u64,
    pub service_id: u64,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub client_name: String,
    pub client_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
}

impl BookingRequest {
    /// Build a request for a chosen slot.
    ///
    /// Name and email are required; a blank phone number is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::MissingField`] if the client name or email is blank.
    pub fn for_slot(
        notary_id: u64,
        slot: &Slot,
        service: &Service,
        contact: ClientContact,
    ) -> Result<Self> {
        let client_name = required(contact.name, "client name")?;
        let client_email = required(contact.email, "client email")?;
        let client_phone = contact
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(BookingRequest {
            notary_id,
            service_id: service.id(),
            date: slot.date,
            time: slot.start,
            client_name,
            client_email,
            client_phone,
        })
    }

    /// The interval this request would occupy once confirmed.
    pub fn blocked_interval(&self, service: &Service) -> Result<BookedInterval> {
        BookedInterval::new(self.date, self.time, service.duration())
    }
}

fn required(value: String, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingError::MissingField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

// ── Tests ───────────────────────────────────────────────────────────────────
