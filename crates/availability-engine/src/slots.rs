//! Open slot generation.
//!
//! Intersects a [`WeeklyTemplate`] with the [`BookedInterval`]s on one date to
//! produce the start times at which a service of a given length fits.
//!
//! # Algorithm
//!
//! 1. Look up the date's weekday in the template. A closed day yields nothing.
//! 2. For each window `[start, end)`, walk candidates `start, start + step, ...`
//!    while `candidate + duration <= end`.
//! 3. Drop any candidate that shares a minute with a booking on the same date
//!    (`candidate < booked_end && candidate + duration > booked_start`).
//!
//! Windows are sorted and non-overlapping, so the output is strictly ascending.
//! Every slot ends inside its window and therefore before midnight.

use std::fmt;
use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::booking::BookedInterval;
use crate::error::{BookingError, Result};
use crate::template::{AvailabilityWindow, WeeklyTemplate};
use crate::time::TimeOfDay;

/// Slot granularity used when none is given.
pub const DEFAULT_STEP_MINUTES: u32 = 15;

/// A bookable `[start, end)` range on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Slot {
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes() - self.start.minutes()
    }

    /// Long human-readable form, e.g. "Thursday, July 17, 2025 at 09:00-09:30".
    pub fn describe(&self) -> String {
        format!(
            "{} at {}-{}",
            self.date.format("%A, %B %-d, %Y"),
            self.start,
            self.end
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.date, self.start, self.end)
    }
}

/// Options for [`available_slots_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotOptions {
    /// Distance in minutes between consecutive candidate starts in a window.
    pub step_minutes: u32,
}

impl Default for SlotOptions {
    fn default() -> Self {
        SlotOptions {
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }
}

/// Lazy iterator over the open slots of one date.
///
/// Created by [`iter_available_slots`]. Borrows the template's windows; the
/// bookings for the date are copied in as minute ranges up front.
#[derive(Debug, Clone)]
pub struct SlotIter<'a> {
    date: NaiveDate,
    windows: std::slice::Iter<'a, AvailabilityWindow>,
    /// Next candidate start and the end of the window it belongs to.
    cursor: Option<(u32, u32)>,
    busy: Vec<(u32, u32)>,
    duration: u32,
    step: u32,
}

impl Iterator for SlotIter<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        loop {
            if let Some((candidate, window_end)) = self.cursor {
                let fits = candidate
                    .checked_add(self.duration)
                    .is_some_and(|end| end <= window_end);
                if fits {
                    self.cursor = Some((candidate.saturating_add(self.step), window_end));
                    let end = candidate + self.duration;
                    let blocked = self
                        .busy
                        .iter()
                        .any(|&(b_start, b_end)| candidate < b_end && end > b_start);
                    if !blocked {
                        return Some(self.slot(candidate, end));
                    }
                    continue;
                }
                self.cursor = None;
            }

            let window = self.windows.next()?;
            self.cursor = Some((window.start().minutes(), window.end().minutes()));
        }
    }
}

impl FusedIterator for SlotIter<'_> {}

impl SlotIter<'_> {
    fn slot(&self, start: u32, end: u32) -> Slot {
        // Both lie within a window, so both are below 1440.
        Slot {
            date: self.date,
            start: TimeOfDay::from_minutes_unchecked(start as u16),
            end: TimeOfDay::from_minutes_unchecked(end as u16),
        }
    }
}

/// Open slots on `date` for a service of `service_duration` minutes, using the
/// default 15-minute step.
///
/// For a custom step, use [`available_slots_with_options`].
///
/// # Errors
///
/// Returns [`BookingError::InvalidDuration`] if `service_duration` is zero.
///
/// # Examples
///
/// ```
/// use availability_engine::{available_slots, AvailabilityWindow, WeeklyTemplate};
/// use chrono::{NaiveDate, Weekday};
///
/// let template = WeeklyTemplate::uniform(
///     &[Weekday::Thu],
///     AvailabilityWindow::parse("09:00", "17:00").unwrap(),
/// );
/// let thursday = NaiveDate::from_ymd_opt(2025, 7, 17).unwrap();
/// let slots = available_slots(thursday, &template, &[], 30).unwrap();
/// assert_eq!(slots.first().unwrap().start.to_string(), "09:00");
/// assert_eq!(slots.last().unwrap().end.to_string(), "17:00");
/// ```
pub fn available_slots(
    date: NaiveDate,
    template: &WeeklyTemplate,
    bookings: &[BookedInterval],
    service_duration: u32,
) -> Result<Vec<Slot>> {
    available_slots_with_options(
        date,
        template,
        bookings,
        service_duration,
        &SlotOptions::default(),
    )
}

/// Open slots on `date` with explicit [`SlotOptions`].
///
/// # Errors
///
/// Returns [`BookingError::InvalidDuration`] if `service_duration` is zero, or
/// [`BookingError::InvalidStep`] if `options.step_minutes` is zero.
pub fn available_slots_with_options(
    date: NaiveDate,
    template: &WeeklyTemplate,
    bookings: &[BookedInterval],
    service_duration: u32,
    options: &SlotOptions,
) -> Result<Vec<Slot>> {
    Ok(iter_available_slots(date, template, bookings, service_duration, options)?.collect())
}

/// Lazy form of [`available_slots_with_options`].
///
/// Bookings on other dates are ignored, so callers may pass their whole
/// booking list.
pub fn iter_available_slots<'a>(
    date: NaiveDate,
    template: &'a WeeklyTemplate,
    bookings: &[BookedInterval],
    service_duration: u32,
    options: &SlotOptions,
) -> Result<SlotIter<'a>> {
    validate_request(service_duration, options)?;

    let day = template.day(date.weekday());
    let windows = day.open_windows();
    let busy: Vec<(u32, u32)> = bookings
        .iter()
        .filter(|b| b.date() == date)
        .map(|b| (b.start_minutes(), b.end_minutes()))
        .collect();

    if windows.is_empty() {
        tracing::debug!(%date, weekday = ?date.weekday(), "day closed, no slots");
    } else {
        tracing::debug!(
            %date,
            weekday = ?date.weekday(),
            windows = windows.len(),
            bookings = busy.len(),
            duration = service_duration,
            step = options.step_minutes,
            "resolving open slots"
        );
    }

    Ok(SlotIter {
        date,
        windows: windows.iter(),
        cursor: None,
        busy,
        duration: service_duration,
        step: options.step_minutes,
    })
}

pub(crate) fn validate_request(service_duration: u32, options: &SlotOptions) -> Result<()> {
    if service_duration == 0 {
        return Err(BookingError::InvalidDuration(
            "service duration must be positive".to_string(),
        ));
    }
    if options.step_minutes == 0 {
        return Err(BookingError::InvalidStep(
            "step must be at least one minute".to_string(),
        ));
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────────────
