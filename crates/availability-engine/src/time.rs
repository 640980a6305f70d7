//! Minute-granularity wall-clock times.
//!
//! A [`TimeOfDay`] is stored as minutes since midnight and always satisfies
//! `0 <= minutes < 1440`. Every constructor enforces that, so the rest of the
//! crate can do plain integer arithmetic on [`TimeOfDay::minutes`] without
//! re-checking bounds.
//!
//! # Functions
//!
//! - [`to_minutes`] — Parse an `HH:MM` string into minutes since midnight
//! - [`from_minutes`] — Build a [`TimeOfDay`] from minutes since midnight

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BookingError, Result};

/// Number of minutes in one day; the exclusive upper bound of [`TimeOfDay`].
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time with minute granularity.
///
/// Serialized as a zero-padded `"HH:MM"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// 00:00.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Caller guarantees `minutes < 1440`.
    pub(crate) const fn from_minutes_unchecked(minutes: u16) -> Self {
        TimeOfDay(minutes)
    }

    /// Build a time from an hour (0-23) and minute (0-59).
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::OutOfRange`] if either component is out of range.
    pub fn from_hm(hours: u32, minutes: u32) -> Result<Self> {
        if hours > 23 || minutes > 59 {
            return Err(BookingError::OutOfRange(format!(
                "{}:{} is not a valid time of day",
                hours, minutes
            )));
        }
        Ok(TimeOfDay((hours * 60 + minutes) as u16))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Add `minutes`, returning `None` if the result would reach or pass midnight.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        let total = self.minutes().checked_add(minutes)?;
        from_minutes(total).ok()
    }
}

/// Parse an `HH:MM` string into minutes since midnight.
///
/// Accepts one- or two-digit hours (`"9:00"` and `"09:00"`) and exactly two
/// minute digits. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`BookingError::InvalidFormat`] unless the input is `HH:MM` with
/// `0 <= HH <= 23` and `0 <= MM <= 59`.
///
/// # Examples
///
/// ```
/// use availability_engine::time::to_minutes;
///
/// assert_eq!(to_minutes("09:30").unwrap(), 570);
/// assert!(to_minutes("24:00").is_err());
/// ```
pub fn to_minutes(s: &str) -> Result<u32> {
    let invalid = || BookingError::InvalidFormat(format!("'{}': expected HH:MM", s.trim()));

    let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(invalid());
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

/// Build a [`TimeOfDay`] from minutes since midnight.
///
/// # Errors
///
/// Returns [`BookingError::OutOfRange`] if `minutes >= 1440`. Slot and window
/// arithmetic never wraps into the next day.
pub fn from_minutes(minutes: u32) -> Result<TimeOfDay> {
    if minutes >= MINUTES_PER_DAY {
        return Err(BookingError::OutOfRange(format!(
            "{} minutes is past the end of the day",
            minutes
        )));
    }
    Ok(TimeOfDay(minutes as u16))
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        from_minutes(to_minutes(s)?)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
