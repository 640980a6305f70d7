//! # availability-engine
//!
//! Deterministic appointment availability.
//!
//! Given a provider's recurring weekly template and the bookings already on
//! the calendar, the engine computes which start times are still open for a
//! service of a given length. Everything is a pure function of its inputs:
//! no clock access, no I/O outside [`config::ProviderConfig::from_path`].
//!
//! ## Modules
//!
//! - [`time`] — `HH:MM` parsing and the minute-granularity [`TimeOfDay`]
//! - [`template`] — Availability windows, day templates, and the weekly template editor operations
//! - [`service`] — Services and the service catalog
//! - [`booking`] — Booked intervals and outgoing booking requests
//! - [`slots`] — Open slot generation
//! - [`scan`] — Next open weekday / next bookable date
//! - [`config`] — JSON provider configuration
//! - [`error`] — Error types

pub mod booking;
pub mod config;
pub mod error;
pub mod scan;
pub mod service;
pub mod slots;
pub mod template;
pub mod time;

pub use booking::{BookedInterval, BookingRequest, ClientContact};
pub use config::{Provider, ProviderConfig};
pub use error::BookingError;
pub use scan::{
    next_available_date, next_bookable_date, NextAvailableDate, DEFAULT_SCAN_HORIZON_DAYS,
};
pub use service::{Service, ServiceCatalog};
pub use slots::{
    available_slots, available_slots_with_options, iter_available_slots, Slot, SlotIter,
    SlotOptions, DEFAULT_STEP_MINUTES,
};
pub use template::{AvailabilityWindow, DayTemplate, WeeklyTemplate};
pub use time::{from_minutes, to_minutes, TimeOfDay};
