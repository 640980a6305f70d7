//! Provider configuration: the profile, weekly template, service catalog and
//! existing bookings that the slot resolver runs against.
//!
//! Loaded from JSON:
//!
//! ```json
//! {
//!   "provider": { "id": 1, "name": "John Smith", "email": "john@notary.com" },
//!   "schedule": { "monday": { "isAvailable": true, "startTime": "09:00", "endTime": "17:00" } },
//!   "services": [ { "id": 1, "name": "Document Notarization", "duration": 30, "price": 25 } ],
//!   "bookings": [ { "date": "2025-07-17", "time": "10:00", "duration": 60 } ],
//!   "step_minutes": 15
//! }
//! ```
//!
//! Everything except `provider` is optional: missing days are closed, the
//! catalog and booking list default to empty, and the step defaults to 15.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::{BookedInterval, BookingRequest, ClientContact};
use crate::error::{BookingError, Result};
use crate::scan::{next_available_date, next_bookable_date, NextAvailableDate};
use crate::service::{Service, ServiceCatalog};
use crate::slots::{available_slots_with_options, Slot, SlotOptions, DEFAULT_STEP_MINUTES};
use crate::template::WeeklyTemplate;
use crate::time::TimeOfDay;

/// The provider a client is booking with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub specialties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: Provider,
    #[serde(default)]
    pub schedule: WeeklyTemplate,
    #[serde(default)]
    pub services: ServiceCatalog,
    #[serde(default)]
    pub bookings: Vec<BookedInterval>,
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

fn default_step_minutes() -> u32 {
    DEFAULT_STEP_MINUTES
}

impl ProviderConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Config`] if the JSON is malformed or any nested
    /// value (time, window, service, booking) is invalid, and the errors of
    /// [`ProviderConfig::validate`] otherwise.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ProviderConfig =
            serde_json::from_str(json).map_err(|e| BookingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| BookingError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loading provider config");
        ProviderConfig::from_json(&json)
    }

    /// Checks that deserialization alone cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.provider.name.trim().is_empty() {
            return Err(BookingError::MissingField("provider name".to_string()));
        }
        if self.step_minutes == 0 {
            return Err(BookingError::InvalidStep(
                "step_minutes must be at least one minute".to_string(),
            ));
        }
        Ok(())
    }

    pub fn options(&self) -> SlotOptions {
        SlotOptions {
            step_minutes: self.step_minutes,
        }
    }

    pub fn service(&self, id: u64) -> Result<&Service> {
        self.services.get(id)
    }

    /// Open slots on `date` for the service with `service_id`.
    pub fn slots_for(&self, date: NaiveDate, service_id: u64) -> Result<Vec<Slot>> {
        self.slots_with_options(date, service_id, &self.options())
    }

    pub fn slots_with_options(
        &self,
        date: NaiveDate,
        service_id: u64,
        options: &SlotOptions,
    ) -> Result<Vec<Slot>> {
        let service = self.service(service_id)?;
        available_slots_with_options(
            date,
            &self.schedule,
            &self.bookings,
            service.duration(),
            options,
        )
    }

    pub fn next_available_date(&self, from: NaiveDate, horizon_days: u32) -> NextAvailableDate {
        next_available_date(&self.schedule, from, horizon_days)
    }

    pub fn next_bookable_date(
        &self,
        service_id: u64,
        from: NaiveDate,
        horizon_days: u32,
    ) -> Result<Option<NaiveDate>> {
        let service = self.service(service_id)?;
        next_bookable_date(
            &self.schedule,
            &self.bookings,
            service.duration(),
            from,
            horizon_days,
            &self.options(),
        )
    }

    /// Build a booking request for `service_id` at `time` on `date`.
    ///
    /// The start must be one of the currently open slots. Submission is the
    /// caller's concern; the request is only logged here.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown service,
    /// [`BookingError::Unavailable`] if `time` is not an open slot, and
    /// [`BookingError::MissingField`] for blank contact fields.
    pub fn request_booking(
        &self,
        service_id: u64,
        date: NaiveDate,
        time: TimeOfDay,
        contact: ClientContact,
    ) -> Result<BookingRequest> {
        let service = self.service(service_id)?;
        let slot = self
            .slots_for(date, service_id)?
            .into_iter()
            .find(|s| s.start == time)
            .ok_or_else(|| {
                BookingError::Unavailable(format!(
                    "'{}' is not open at {} on {}",
                    service.name(),
                    time,
                    date
                ))
            })?;

        let request = BookingRequest::for_slot(self.provider.id, &slot, service, contact)?;
        tracing::info!(
            notary_id = request.notary_id,
            service_id = request.service_id,
            date = %request.date,
            time = %request.time,
            "booking request accepted"
        );
        Ok(request)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
