//! # Meeting Search Core
//!
//! Portable post-processing core for recovery-meeting finder apps.
//!
//! The host application (iOS/Android/desktop) performs the actual server
//! search and owns all rendering; this library provides the pure,
//! synchronous transformations applied to the result list:
//!
//! - Filtering out meetings that have already started today (with a
//!   configurable grace period)
//! - Sorting results by distance or by weekday/start time
//! - Clustering nearby map markers into aggregate pins ([`clustering`])
//! - Building "today and tomorrow" search criteria ([`criteria`])
//!
//! ## Features
//!
//! - **`serde`** - Serde derives on the public result types
//! - **`ffi`** - FFI bindings for mobile platforms (iOS/Android)
//!
//! ## Quick Start
//!
//! ```rust
//! use meeting_search_core::{
//!     filter_passed_meetings, sort_results, Meeting, SearchWindow, SortMode,
//!     StartTime, Weekday,
//! };
//!
//! let meetings = vec![
//!     Meeting::new(1, Weekday::Tuesday, StartTime::new(19, 30).unwrap()),
//!     Meeting::new(2, Weekday::Tuesday, StartTime::new(9, 0).unwrap()),
//!     Meeting::new(3, Weekday::Wednesday, StartTime::new(20, 0).unwrap()),
//! ];
//!
//! // 18:00 on a Tuesday, with a 15 minute grace period.
//! let window = SearchWindow {
//!     today: Weekday::Tuesday,
//!     hour: 18,
//!     minute: 0,
//!     grace_minutes: 15,
//! };
//!
//! // The 9:00 Tuesday meeting has passed; Wednesday is untouched.
//! let upcoming = filter_passed_meetings(&meetings, &window);
//! assert_eq!(upcoming.len(), 2);
//!
//! let ordered = sort_results(&upcoming, SortMode::ByScheduleOrder, Weekday::Sunday, false);
//! assert_eq!(ordered[0].id, 1);
//! ```

use geo::{Distance, Haversine, Point};
use std::cmp::Ordering;

// Map marker clustering
pub mod clustering;
pub use clustering::{
    cluster_meetings, Cluster, MapViewport, ScreenPoint, DEFAULT_MARKER_TOLERANCE,
};

// Client-side criteria building for "today and tomorrow" searches
pub mod criteria;
pub use criteria::SearchCriteria;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("MeetingSearchRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// Errors raised when constructing schedule values from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Weekday indexes are 1-based, Sunday (1) through Saturday (7).
    #[error("weekday index out of range: {0}")]
    InvalidWeekday(u8),
    /// Start times must be a valid wall-clock hour and minute.
    #[error("invalid start time {0:02}:{1:02}")]
    InvalidTime(u8, u8),
}

/// A geographic coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use meeting_search_core::GeoPoint;
/// let point = GeoPoint::new(34.2355, -118.5635);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// 1-based day of the week, Sunday (1) through Saturday (7).
///
/// This is the indexing used by meeting servers and by the host calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    /// The 1-based index of this weekday.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The day after this one, wrapping Saturday back to Sunday.
    pub fn tomorrow(self) -> Weekday {
        match self {
            Weekday::Sunday => Weekday::Monday,
            Weekday::Monday => Weekday::Tuesday,
            Weekday::Tuesday => Weekday::Wednesday,
            Weekday::Wednesday => Weekday::Thursday,
            Weekday::Thursday => Weekday::Friday,
            Weekday::Friday => Weekday::Saturday,
            Weekday::Saturday => Weekday::Sunday,
        }
    }

    /// This weekday expressed relative to the calendar's first weekday,
    /// normalized into 0..=6.
    ///
    /// # Example
    /// ```
    /// use meeting_search_core::Weekday;
    /// assert_eq!(Weekday::Saturday.offset_from(Weekday::Sunday), 6);
    /// assert_eq!(Weekday::Sunday.offset_from(Weekday::Monday), 6);
    /// ```
    pub fn offset_from(self, first_weekday: Weekday) -> u8 {
        (self.index() as i8 - first_weekday.index() as i8).rem_euclid(7) as u8
    }

    fn from_chrono(day: chrono::Weekday) -> Weekday {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = ScheduleError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            1 => Ok(Weekday::Sunday),
            2 => Ok(Weekday::Monday),
            3 => Ok(Weekday::Tuesday),
            4 => Ok(Weekday::Wednesday),
            5 => Ok(Weekday::Thursday),
            6 => Ok(Weekday::Friday),
            7 => Ok(Weekday::Saturday),
            other => Err(ScheduleError::InvalidWeekday(other)),
        }
    }
}

/// A meeting's scheduled start time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartTime {
    pub hour: u8,
    pub minute: u8,
}

impl StartTime {
    /// Create a start time, validating the hour and minute ranges.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidTime(hour, minute));
        }
        Ok(Self { hour, minute })
    }

    /// Minutes since midnight.
    pub fn minutes_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    /// Integer sort key in HMM form: 9:05 -> 905, 14:30 -> 1430.
    pub fn sort_key(&self) -> u32 {
        self.hour as u32 * 100 + self.minute as u32
    }
}

/// A single meeting as delivered by the host's search layer.
///
/// Meetings are consumed read-only: the search layer creates them per
/// search, and they live for the lifetime of one results screen.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meeting {
    /// Stable server-side identifier, unique per meeting.
    pub id: u64,
    pub weekday: Weekday,
    pub start_time: StartTime,
    /// Absent for virtual/format-only or errored results; such meetings
    /// never appear on the map.
    pub location: Option<GeoPoint>,
    /// Distance from the search center, as reported by the search layer.
    pub distance_km: f64,
    pub distance_miles: f64,
    pub name: String,
    pub comments: String,
}

impl Meeting {
    /// Create a meeting with the given schedule, no location and no
    /// distance. Fill the remaining fields directly or via
    /// [`Meeting::with_distance_from`].
    pub fn new(id: u64, weekday: Weekday, start_time: StartTime) -> Self {
        Self {
            id,
            weekday,
            start_time,
            location: None,
            distance_km: 0.0,
            distance_miles: 0.0,
            name: String::new(),
            comments: String::new(),
        }
    }

    /// Recompute both distance fields from a search center.
    ///
    /// No-op when the meeting has no location.
    pub fn with_distance_from(mut self, origin: GeoPoint) -> Self {
        if let Some(location) = self.location {
            let meters = haversine_distance(&origin, &location);
            self.distance_km = meters / 1000.0;
            self.distance_miles = self.distance_km / KM_PER_MILE;
        }
        self
    }

    /// Distance from the search center in the requested units.
    pub fn distance_in(&self, units: DistanceUnits) -> f64 {
        match units {
            DistanceUnits::Kilometers => self.distance_km,
            DistanceUnits::Miles => self.distance_miles,
        }
    }
}

const KM_PER_MILE: f64 = 1.609344;

/// Distance units for display, a user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceUnits {
    #[default]
    Kilometers,
    Miles,
}

/// User preferences consumed by the post-processing step.
///
/// Hosts construct this explicitly (typically from their key-value
/// preferences store) and pass it by reference; there is no process-wide
/// instance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchPrefs {
    /// How long a meeting may already have been running before we decide
    /// it is no longer worth attending.
    pub grace_period_minutes: u32,
    /// First weekday of the host calendar.
    pub first_weekday: Weekday,
    pub distance_units: DistanceUnits,
    /// Default sort toggle state for result lists.
    pub sort_by_distance: bool,
    /// Approximate number of meetings an automatic radius search aims for.
    pub auto_search_density: u32,
    /// Initial radius (in the preferred units) for explicit-distance searches.
    pub default_search_distance: f32,
}

impl Default for SearchPrefs {
    fn default() -> Self {
        Self {
            grace_period_minutes: 15,
            first_weekday: Weekday::Sunday,
            distance_units: DistanceUnits::default(),
            sort_by_distance: false,
            auto_search_density: 10,
            default_search_distance: 10.0,
        }
    }
}

/// The "now" instant a today-search filters against: the current weekday
/// and wall-clock time, plus the grace period.
///
/// Built at the moment of filtering, not at the moment the search was
/// issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchWindow {
    pub today: Weekday,
    pub hour: u8,
    pub minute: u8,
    pub grace_minutes: u32,
}

impl SearchWindow {
    /// Build a window from the local wall clock.
    pub fn now(grace_minutes: u32) -> Self {
        Self::at(&chrono::Local::now(), grace_minutes)
    }

    /// Build a window from an arbitrary instant.
    pub fn at<Tz: chrono::TimeZone>(when: &chrono::DateTime<Tz>, grace_minutes: u32) -> Self {
        use chrono::{Datelike, Timelike};
        Self {
            today: Weekday::from_chrono(when.weekday()),
            hour: when.hour() as u8,
            minute: when.minute() as u8,
            grace_minutes,
        }
    }

    /// The effective "now" in minutes of day, grace period included.
    ///
    /// Deliberately not wrapped past midnight: a window built at 23:55
    /// with a 15 minute grace yields 1450, which no same-day start time
    /// can reach, so every remaining meeting today is filtered out.
    /// This mirrors the shipped client behavior; callers wanting wrap
    /// semantics must normalize before building the window.
    pub fn effective_minutes(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32 + self.grace_minutes
    }
}

/// Comparator selection for [`sort_results`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortMode {
    /// Ascending distance from the search center. All meetings must carry
    /// a valid `distance_km`; missing distances sort as zero.
    ByDistance,
    /// Weekday offset from the calendar's first weekday, then start time.
    ByScheduleOrder,
}

// ============================================================================
// Core Functions
// ============================================================================

/// Remove meetings whose scheduled start has already passed today.
///
/// Meetings on any day other than `window.today` (tomorrow included) are
/// kept unconditionally. Same-day meetings are kept only when their start
/// time is at or after the effective "now" (wall clock plus grace
/// period).
///
/// Pure and total: an empty input yields an empty output, and filtering
/// never fails. Surfacing a "no results" condition when everything was
/// removed is the caller's job.
///
/// # Example
/// ```
/// use meeting_search_core::{filter_passed_meetings, Meeting, SearchWindow, StartTime, Weekday};
///
/// let meetings = vec![
///     Meeting::new(1, Weekday::Tuesday, StartTime::new(18, 10).unwrap()),
///     Meeting::new(2, Weekday::Tuesday, StartTime::new(18, 20).unwrap()),
/// ];
/// let window = SearchWindow { today: Weekday::Tuesday, hour: 18, minute: 0, grace_minutes: 15 };
///
/// // 18:10 is inside the grace window and gets dropped; 18:20 survives.
/// let kept = filter_passed_meetings(&meetings, &window);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].id, 2);
/// ```
pub fn filter_passed_meetings(meetings: &[Meeting], window: &SearchWindow) -> Vec<Meeting> {
    let effective_now = window.effective_minutes();

    meetings
        .iter()
        .filter(|meeting| {
            meeting.weekday != window.today
                || meeting.start_time.minutes_of_day() >= effective_now
        })
        .cloned()
        .collect()
}

/// Sort a result list for display.
///
/// `ByDistance` is a stable ascending sort on `distance_km`; ties keep
/// their input order. `ByScheduleOrder` sorts by weekday offset from
/// `first_weekday`, then by start time within a day.
///
/// When `today_search` is true, the offset-6/offset-0 boundary pair is
/// inverted so that a late Saturday meeting sorts ahead of Sunday in a
/// Sunday today-search ("yesterday, still running" rather than "six days
/// from now"). Only this one pair is special-cased; a today-search input
/// spans at most today and tomorrow, so no other offsets can collide
/// with it.
pub fn sort_results(
    meetings: &[Meeting],
    mode: SortMode,
    first_weekday: Weekday,
    today_search: bool,
) -> Vec<Meeting> {
    let mut sorted = meetings.to_vec();
    match mode {
        SortMode::ByDistance => {
            sorted.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(Ordering::Equal)
            });
        }
        SortMode::ByScheduleOrder => {
            sorted.sort_by(|a, b| schedule_ordering(a, b, first_weekday, today_search));
        }
    }
    sorted
}

/// The `ByScheduleOrder` comparator.
fn schedule_ordering(
    a: &Meeting,
    b: &Meeting,
    first_weekday: Weekday,
    today_search: bool,
) -> Ordering {
    let offset_a = a.weekday.offset_from(first_weekday);
    let offset_b = b.weekday.offset_from(first_weekday);

    // Saturday meetings still running into a Sunday today-search sort
    // ahead of today, not six days out.
    if today_search && offset_a == 0 && offset_b == 6 {
        return Ordering::Greater;
    }
    if today_search && offset_a == 6 && offset_b == 0 {
        return Ordering::Less;
    }

    match offset_a.cmp(&offset_b) {
        Ordering::Equal => a.start_time.sort_key().cmp(&b.start_time.sort_key()),
        unequal => unequal,
    }
}

/// Haversine distance between two points in meters.
fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::info;

    /// Default preferences, matching a fresh install of the host app.
    #[uniffi::export]
    pub fn default_prefs() -> SearchPrefs {
        init_logging();
        SearchPrefs::default()
    }

    /// Build a search window from the device wall clock.
    #[uniffi::export]
    pub fn search_window_now(grace_minutes: u32) -> SearchWindow {
        init_logging();
        SearchWindow::now(grace_minutes)
    }

    /// Filter out meetings that have already started today.
    #[uniffi::export]
    pub fn ffi_filter_passed_meetings(
        meetings: Vec<Meeting>,
        window: SearchWindow,
    ) -> Vec<Meeting> {
        init_logging();
        let kept = filter_passed_meetings(&meetings, &window);
        info!(
            "[MeetingSearchRust] filter: {} of {} meetings kept (effective now {} min)",
            kept.len(),
            meetings.len(),
            window.effective_minutes()
        );
        kept
    }

    /// Sort a result list for display.
    #[uniffi::export]
    pub fn ffi_sort_results(
        meetings: Vec<Meeting>,
        mode: SortMode,
        first_weekday: Weekday,
        today_search: bool,
    ) -> Vec<Meeting> {
        init_logging();
        info!(
            "[MeetingSearchRust] sorting {} meetings ({:?})",
            meetings.len(),
            mode
        );
        sort_results(&meetings, mode, first_weekday, today_search)
    }

    /// Cluster meetings into map markers using a concrete viewport
    /// projection (closures do not cross the FFI boundary).
    #[uniffi::export]
    pub fn ffi_cluster_meetings(
        meetings: Vec<Meeting>,
        viewport: MapViewport,
        tolerance_points: f64,
    ) -> Vec<Cluster> {
        init_logging();
        let clusters =
            cluster_meetings(&meetings, |coord| viewport.project(coord), tolerance_points);
        info!(
            "[MeetingSearchRust] clustered {} meetings into {} markers",
            meetings.len(),
            clusters.len()
        );
        clusters
    }

    /// Build "today and tomorrow" criteria for the host's search layer.
    #[uniffi::export]
    pub fn ffi_today_and_tomorrow_criteria(
        today: Weekday,
        prefs: SearchPrefs,
    ) -> SearchCriteria {
        init_logging();
        SearchCriteria::today_and_tomorrow(today, &prefs)
    }
}

// ============================================================================
// Tests
// ============================================================================
