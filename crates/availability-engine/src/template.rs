//! Weekly availability templates.
//!
//! A [`WeeklyTemplate`] maps each weekday to a [`DayTemplate`], which holds an
//! enabled flag and a sorted list of non-overlapping [`AvailabilityWindow`]s.
//! The provider edits templates; the slot resolver only reads them.
//!
//! Windows are half-open (`[start, end)`), so `09:00-12:00` and `12:00-17:00`
//! may sit on the same day without overlapping.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::time::TimeOfDay;

// ── AvailabilityWindow ──────────────────────────────────────────────────────

/// A single bookable range within a day. Invariant: `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct AvailabilityWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawWindow> for AvailabilityWindow {
    type Error = BookingError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        AvailabilityWindow::new(raw.start, raw.end)
    }
}

impl AvailabilityWindow {
    /// The window a freshly enabled day starts with: 09:00-17:00.
    pub const DEFAULT_WORKDAY: AvailabilityWindow = AvailabilityWindow {
        start: TimeOfDay::from_minutes_unchecked(9 * 60),
        end: TimeOfDay::from_minutes_unchecked(17 * 60),
    };

    /// # Errors
    ///
    /// Returns [`BookingError::InvalidWindow`] if `start >= end`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if start >= end {
            return Err(BookingError::InvalidWindow(format!(
                "start {} must be before end {}",
                start, end
            )));
        }
        Ok(AvailabilityWindow { start, end })
    }

    /// Build a window from two `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        AvailabilityWindow::new(start.parse()?, end.parse()?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn length_minutes(&self) -> u32 {
        self.end.minutes() - self.start.minutes()
    }

    /// Half-open overlap: windows that only touch do not overlap.
    pub fn overlaps(&self, other: &AvailabilityWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

// ── DayTemplate ─────────────────────────────────────────────────────────────

/// Availability for one weekday.
///
/// A day is open only when it is enabled *and* has at least one window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDay")]
pub struct DayTemplate {
    enabled: bool,
    windows: Vec<AvailabilityWindow>,
}

/// Accepted input shapes for a day.
///
/// `Single` is the one-range-per-day form (`isAvailable`/`startTime`/`endTime`);
/// `Windows` is the editor form with any number of ranges. `Single` is tried
/// first because every field of `Windows` is optional; `Windows` rejects
/// unknown keys so a malformed `Single` day is an error, not a closed day.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDay {
    Single {
        #[serde(rename = "isAvailable")]
        is_available: bool,
        #[serde(rename = "startTime")]
        start_time: TimeOfDay,
        #[serde(rename = "endTime")]
        end_time: TimeOfDay,
    },
    Windows(EditorDay),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EditorDay {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default, alias = "timeSlots")]
    windows: Vec<AvailabilityWindow>,
}

impl TryFrom<RawDay> for DayTemplate {
    type Error = BookingError;

    fn try_from(raw: RawDay) -> Result<Self> {
        match raw {
            RawDay::Single {
                is_available,
                start_time,
                end_time,
            } => DayTemplate::with_windows(
                is_available,
                [AvailabilityWindow::new(start_time, end_time)?],
            ),
            RawDay::Windows(EditorDay { enabled, windows }) => {
                let enabled = enabled.unwrap_or(!windows.is_empty());
                DayTemplate::with_windows(enabled, windows)
            }
        }
    }
}

impl DayTemplate {
    /// A disabled day with no windows.
    pub fn closed() -> Self {
        DayTemplate::default()
    }

    /// An enabled day with the given windows.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidWindow`] if any two windows overlap.
    pub fn open(windows: impl IntoIterator<Item = AvailabilityWindow>) -> Result<Self> {
        DayTemplate::with_windows(true, windows)
    }

    fn with_windows(
        enabled: bool,
        windows: impl IntoIterator<Item = AvailabilityWindow>,
    ) -> Result<Self> {
        let mut day = DayTemplate {
            enabled,
            windows: Vec::new(),
        };
        for window in windows {
            day.add_window(window)?;
        }
        Ok(day)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the resolver will consider this day at all.
    pub fn is_open(&self) -> bool {
        self.enabled && !self.windows.is_empty()
    }

    /// All configured windows, sorted by start, regardless of the enabled flag.
    pub fn windows(&self) -> &[AvailabilityWindow] {
        &self.windows
    }

    /// The windows the resolver should enumerate: empty when the day is disabled.
    pub fn open_windows(&self) -> &[AvailabilityWindow] {
        if self.enabled {
            &self.windows
        } else {
            &[]
        }
    }

    /// Toggle the day. Enabling a day with no windows installs
    /// [`AvailabilityWindow::DEFAULT_WORKDAY`]; disabling clears all windows.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            if self.windows.is_empty() {
                self.windows.push(AvailabilityWindow::DEFAULT_WORKDAY);
            }
        } else {
            self.windows.clear();
        }
    }

    /// Insert a window, keeping the list sorted.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidWindow`] if it overlaps an existing window.
    pub fn add_window(&mut self, window: AvailabilityWindow) -> Result<()> {
        check_no_overlap(&self.windows, &window, None)?;
        let pos = self.windows.partition_point(|w| w.start < window.start);
        self.windows.insert(pos, window);
        Ok(())
    }

    /// Remove the window at `index` (in sorted order).
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if `index` is out of range.
    pub fn remove_window(&mut self, index: usize) -> Result<AvailabilityWindow> {
        if index >= self.windows.len() {
            return Err(window_not_found(index, self.windows.len()));
        }
        Ok(self.windows.remove(index))
    }

    /// Replace the window at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if `index` is out of range, or
    /// [`BookingError::InvalidWindow`] if the replacement overlaps another window.
    pub fn update_window(&mut self, index: usize, window: AvailabilityWindow) -> Result<()> {
        if index >= self.windows.len() {
            return Err(window_not_found(index, self.windows.len()));
        }
        check_no_overlap(&self.windows, &window, Some(index))?;
        self.windows[index] = window;
        self.windows.sort_by_key(|w| w.start);
        Ok(())
    }
}

fn check_no_overlap(
    existing: &[AvailabilityWindow],
    window: &AvailabilityWindow,
    skip: Option<usize>,
) -> Result<()> {
    let clash = existing
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip)
        .find(|(_, w)| w.overlaps(window));

    match clash {
        Some((_, w)) => Err(BookingError::InvalidWindow(format!(
            "{}-{} overlaps existing window {}-{}",
            window.start, window.end, w.start, w.end
        ))),
        None => Ok(()),
    }
}

fn window_not_found(index: usize, len: usize) -> BookingError {
    BookingError::NotFound(format!("window {} (day has {})", index, len))
}

// ── WeeklyTemplate ──────────────────────────────────────────────────────────

/// Recurring availability for Monday through Sunday.
///
/// Missing days deserialize as closed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyTemplate {
    monday: DayTemplate,
    tuesday: DayTemplate,
    wednesday: DayTemplate,
    thursday: DayTemplate,
    friday: DayTemplate,
    saturday: DayTemplate,
    sunday: DayTemplate,
}

impl WeeklyTemplate {
    /// Every day closed; the editor's starting state.
    pub fn closed() -> Self {
        WeeklyTemplate::default()
    }

    /// The same single window on each of `days`; every other day closed.
    pub fn uniform(days: &[Weekday], window: AvailabilityWindow) -> Self {
        let mut template = WeeklyTemplate::closed();
        for &day in days {
            let slot = template.day_mut(day);
            slot.enabled = true;
            slot.windows = vec![window];
        }
        template
    }

    /// Builder-style replacement of one day.
    pub fn with_day(mut self, weekday: Weekday, day: DayTemplate) -> Self {
        *self.day_mut(weekday) = day;
        self
    }

    pub fn day(&self, weekday: Weekday) -> &DayTemplate {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DayTemplate {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn is_open(&self, weekday: Weekday) -> bool {
        self.day(weekday).is_open()
    }

    /// True if no weekday is open.
    pub fn is_closed_all_week(&self) -> bool {
        WEEK.iter().all(|&d| !self.is_open(d))
    }

    pub fn set_day_enabled(&mut self, weekday: Weekday, enabled: bool) {
        self.day_mut(weekday).set_enabled(enabled);
    }

    pub fn add_window(&mut self, weekday: Weekday, window: AvailabilityWindow) -> Result<()> {
        self.day_mut(weekday).add_window(window)
    }

    pub fn remove_window(&mut self, weekday: Weekday, index: usize) -> Result<AvailabilityWindow> {
        self.day_mut(weekday).remove_window(index)
    }

    pub fn update_window(
        &mut self,
        weekday: Weekday,
        index: usize,
        window: AvailabilityWindow,
    ) -> Result<()> {
        self.day_mut(weekday).update_window(index, window)
    }
}

/// Monday-first week order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn w(start: &str, end: &str) -> AvailabilityWindow {
        AvailabilityWindow::parse(start, end).unwrap()
    }

    // ── AvailabilityWindow ──────────────────────────────────────────────

    #[test]
    fn test_window_requires_start_before_end() {
        assert!(matches!(
            AvailabilityWindow::parse("17:00", "09:00"),
            Err(BookingError::InvalidWindow(_))
        ));
        assert!(matches!(
            AvailabilityWindow::parse("09:00", "09:00"),
            Err(BookingError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_window_parse_propagates_format_error() {
        assert!(matches!(
            AvailabilityWindow::parse("9am", "17:00"),
            Err(BookingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_window_overlap_is_half_open() {
        assert!(!w("09:00", "12:00").overlaps(&w("12:00", "17:00")));
        assert!(w("09:00", "12:01").overlaps(&w("12:00", "17:00")));
        assert!(w("10:00", "11:00").overlaps(&w("09:00", "17:00")));
    }

    #[test]
    fn test_default_workday() {
        let d = AvailabilityWindow::DEFAULT_WORKDAY;
        assert_eq!(d.start().to_string(), "09:00");
        assert_eq!(d.end().to_string(), "17:00");
        assert_eq!(d.length_minutes(), 480);
    }

    // ── DayTemplate editing ─────────────────────────────────────────────

    #[test]
    fn test_enable_installs_default_window() {
        let mut day = DayTemplate::closed();
        assert!(!day.is_open());
        day.set_enabled(true);
        assert!(day.is_open());
        assert_eq!(day.windows(), &[AvailabilityWindow::DEFAULT_WORKDAY]);
    }

    #[test]
    fn test_disable_clears_windows() {
        let mut day = DayTemplate::open([w("08:00", "12:00"), w("13:00", "18:00")]).unwrap();
        day.set_enabled(false);
        assert!(!day.is_open());
        assert!(day.windows().is_empty());
    }

    #[test]
    fn test_add_window_keeps_sorted() {
        let mut day = DayTemplate::open([w("13:00", "17:00")]).unwrap();
        day.add_window(w("08:00", "12:00")).unwrap();
        assert_eq!(day.windows(), &[w("08:00", "12:00"), w("13:00", "17:00")]);
    }

    #[test]
    fn test_add_overlapping_window_rejected() {
        let mut day = DayTemplate::open([w("09:00", "17:00")]).unwrap();
        let err = day.add_window(w("16:00", "18:00")).unwrap_err();
        assert!(matches!(err, BookingError::InvalidWindow(_)));
        assert_eq!(day.windows().len(), 1);
    }

    #[test]
    fn test_open_rejects_overlapping_windows() {
        assert!(DayTemplate::open([w("09:00", "12:00"), w("11:00", "13:00")]).is_err());
    }

    #[test]
    fn test_remove_window() {
        let mut day = DayTemplate::open([w("08:00", "12:00"), w("13:00", "17:00")]).unwrap();
        assert_eq!(day.remove_window(0).unwrap(), w("08:00", "12:00"));
        assert_eq!(day.windows(), &[w("13:00", "17:00")]);
        assert!(matches!(day.remove_window(5), Err(BookingError::NotFound(_))));
    }

    #[test]
    fn test_update_window_resorts_and_ignores_self() {
        let mut day = DayTemplate::open([w("08:00", "12:00"), w("13:00", "17:00")]).unwrap();
        // Widening a window may overlap its own old extent.
        day.update_window(0, w("07:00", "12:30")).unwrap();
        assert_eq!(day.windows()[0], w("07:00", "12:30"));

        day.update_window(0, w("18:00", "20:00")).unwrap();
        assert_eq!(day.windows(), &[w("13:00", "17:00"), w("18:00", "20:00")]);

        assert!(day.update_window(0, w("19:00", "21:00")).is_err());
        assert!(matches!(
            day.update_window(9, w("06:00", "07:00")),
            Err(BookingError::NotFound(_))
        ));
    }

    #[test]
    fn test_disabled_day_has_no_open_windows() {
        let mut day = DayTemplate::open([w("09:00", "17:00")]).unwrap();
        day.enabled = false;
        assert!(day.open_windows().is_empty());
        assert_eq!(day.windows().len(), 1);
    }

    // ── WeeklyTemplate ──────────────────────────────────────────────────

    #[test]
    fn test_closed_template() {
        let t = WeeklyTemplate::closed();
        assert!(t.is_closed_all_week());
    }

    #[test]
    fn test_uniform_template() {
        let t = WeeklyTemplate::uniform(&[Weekday::Mon, Weekday::Fri], w("09:00", "17:00"));
        assert!(t.is_open(Weekday::Mon));
        assert!(t.is_open(Weekday::Fri));
        assert!(!t.is_open(Weekday::Tue));
        assert!(!t.is_closed_all_week());
    }

    #[test]
    fn test_template_editing_by_weekday() {
        let mut t = WeeklyTemplate::closed();
        t.set_day_enabled(Weekday::Sat, true);
        t.add_window(Weekday::Sat, w("18:00", "20:00")).unwrap();
        assert_eq!(t.day(Weekday::Sat).windows().len(), 2);
        t.update_window(Weekday::Sat, 1, w("18:30", "20:00")).unwrap();
        t.remove_window(Weekday::Sat, 0).unwrap();
        assert_eq!(t.day(Weekday::Sat).windows(), &[w("18:30", "20:00")]);
    }

    // ── Deserialization ─────────────────────────────────────────────────

    #[test]
    fn test_deserialize_editor_shape() {
        let json = r#"{
            "monday": { "enabled": true, "windows": [
                { "start": "13:00", "end": "17:00" },
                { "start": "09:00", "end": "12:00" }
            ] },
            "tuesday": { "enabled": false, "windows": [] }
        }"#;
        let t: WeeklyTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(
            t.day(Weekday::Mon).windows(),
            &[w("09:00", "12:00"), w("13:00", "17:00")]
        );
        assert!(!t.is_open(Weekday::Tue));
        assert!(!t.is_open(Weekday::Sun));
    }

    #[test]
    fn test_deserialize_time_slots_alias() {
        let json = r#"{ "friday": { "enabled": true, "timeSlots": [ { "start": "09:00", "end": "16:00" } ] } }"#;
        let t: WeeklyTemplate = serde_json::from_str(json).unwrap();
        assert!(t.is_open(Weekday::Fri));
    }

    #[test]
    fn test_deserialize_single_window_shape() {
        let json = r#"{
            "saturday": { "isAvailable": true, "startTime": "10:00", "endTime": "14:00" },
            "sunday": { "isAvailable": false, "startTime": "10:00", "endTime": "14:00" }
        }"#;
        let t: WeeklyTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(t.day(Weekday::Sat).windows(), &[w("10:00", "14:00")]);
        assert!(!t.is_open(Weekday::Sun));
    }

    #[test]
    fn test_deserialize_windows_without_enabled_flag() {
        let json = r#"{ "monday": { "windows": [ { "start": "09:00", "end": "10:00" } ] } }"#;
        let t: WeeklyTemplate = serde_json::from_str(json).unwrap();
        assert!(t.is_open(Weekday::Mon));
    }

    #[test]
    fn test_deserialize_rejects_bad_windows() {
        let backwards = r#"{ "monday": { "enabled": true, "windows": [ { "start": "17:00", "end": "09:00" } ] } }"#;
        assert!(serde_json::from_str::<WeeklyTemplate>(backwards).is_err());

        let overlapping = r#"{ "monday": { "enabled": true, "windows": [
            { "start": "09:00", "end": "12:00" }, { "start": "11:00", "end": "13:00" }
        ] } }"#;
        assert!(serde_json::from_str::<WeeklyTemplate>(overlapping).is_err());
    }

    #[test]
    fn test_serialize_uses_editor_shape() {
        let t = WeeklyTemplate::closed().with_day(
            Weekday::Mon,
            DayTemplate::open([w("09:00", "17:00")]).unwrap(),
        );
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["monday"]["enabled"], true);
        assert_eq!(value["monday"]["windows"][0]["start"], "09:00");
        assert_eq!(value["sunday"]["enabled"], false);

        let back: WeeklyTemplate = serde_json::from_value(value).unwrap();
        assert_eq!(back, t);
    }
}
