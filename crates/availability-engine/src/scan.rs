//! Forward scans for the next date worth showing a client.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::booking::BookedInterval;
use crate::error::Result;
use crate::slots::{iter_available_slots, validate_request, SlotOptions};
use crate::template::WeeklyTemplate;

/// How many days ahead the scans look by default, counting the start date.
pub const DEFAULT_SCAN_HORIZON_DAYS: u32 = 30;

/// Result of [`next_available_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextAvailableDate {
    pub date: NaiveDate,
    /// `true` when no open weekday was found and `date` is just the scan start.
    /// Such a date carries no guarantee of availability.
    pub is_fallback: bool,
}

/// First date from `from` (inclusive) whose weekday is open in `template`,
/// looking at most `horizon_days` days ahead.
///
/// Only the weekday is checked, not bookings. If nothing is found, returns
/// `from` with `is_fallback` set; this is not an error.
pub fn next_available_date(
    template: &WeeklyTemplate,
    from: NaiveDate,
    horizon_days: u32,
) -> NextAvailableDate {
    let found = from
        .iter_days()
        .take(horizon_days as usize)
        .find(|d| template.is_open(d.weekday()));

    match found {
        Some(date) => NextAvailableDate {
            date,
            is_fallback: false,
        },
        None => {
            tracing::debug!(%from, horizon_days, "no open weekday in horizon, falling back");
            NextAvailableDate {
                date: from,
                is_fallback: true,
            }
        }
    }
}

/// First date from `from` (inclusive) with at least one open slot for a
/// service of `service_duration` minutes, looking at most `horizon_days` ahead.
///
/// Returns `Ok(None)` if every date in the horizon is full or closed.
///
/// # Errors
///
/// Same as [`crate::slots::available_slots_with_options`].
pub fn next_bookable_date(
    template: &WeeklyTemplate,
    bookings: &[BookedInterval],
    service_duration: u32,
    from: NaiveDate,
    horizon_days: u32,
    options: &SlotOptions,
) -> Result<Option<NaiveDate>> {
    validate_request(service_duration, options)?;

    for date in from.iter_days().take(horizon_days as usize) {
        if !template.is_open(date.weekday()) {
            continue;
        }
        let mut slots = iter_available_slots(date, template, bookings, service_duration, options)?;
        if slots.next().is_some() {
            return Ok(Some(date));
        }
    }
    Ok(None)
}
