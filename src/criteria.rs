//! Client-side search criteria building.
//!
//! The host's search layer owns the server protocol; this module only
//! assembles the criteria values the client computes itself, most
//! notably the "today and tomorrow" quick search.

use crate::{GeoPoint, SearchPrefs, Weekday};

/// Criteria handed to the host's search layer.
///
/// A negative `radius` follows the meeting-server convention of "return
/// roughly this many meetings" instead of a fixed distance.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchCriteria {
    /// Weekdays to search, in selection order. Empty means all days.
    pub weekdays: Vec<Weekday>,
    /// Positive: radius in the preferred distance units. Negative:
    /// auto-density meeting count. Zero: unset.
    pub radius: f32,
    pub free_text: Option<String>,
    /// Search center; `None` lets the host fill in the device location.
    pub location: Option<GeoPoint>,
}

impl SearchCriteria {
    /// Criteria for the quick "what can I still attend" search: today
    /// and the wrapped next day, with an auto-density radius widened by
    /// half, since the passed-meeting filter will discard a chunk of
    /// today's results afterwards.
    ///
    /// # Example
    /// ```
    /// use meeting_search_core::{SearchCriteria, SearchPrefs, Weekday};
    ///
    /// let criteria = SearchCriteria::today_and_tomorrow(Weekday::Saturday, &SearchPrefs::default());
    /// assert_eq!(criteria.weekdays, vec![Weekday::Saturday, Weekday::Sunday]);
    /// assert_eq!(criteria.radius, -15.0);
    /// ```
    pub fn today_and_tomorrow(today: Weekday, prefs: &SearchPrefs) -> Self {
        Self {
            weekdays: vec![today, today.tomorrow()],
            radius: -(1.5 * prefs.auto_search_density as f32).ceil(),
            free_text: None,
            location: None,
        }
    }

    /// Criteria for an explicit-radius search around a point, using the
    /// preferred default distance.
    pub fn around(location: GeoPoint, prefs: &SearchPrefs) -> Self {
        Self {
            weekdays: Vec::new(),
            radius: prefs.default_search_distance,
            free_text: None,
            location: Some(location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_and_tomorrow_selects_both_days() {
        let prefs = SearchPrefs::default();
        let criteria = SearchCriteria::today_and_tomorrow(Weekday::Tuesday, &prefs);
        assert_eq!(criteria.weekdays, vec![Weekday::Tuesday, Weekday::Wednesday]);
        assert!(criteria.location.is_none());
        assert!(criteria.free_text.is_none());
    }

    #[test]
    fn test_today_and_tomorrow_wraps_saturday() {
        let prefs = SearchPrefs::default();
        let criteria = SearchCriteria::today_and_tomorrow(Weekday::Saturday, &prefs);
        assert_eq!(criteria.weekdays, vec![Weekday::Saturday, Weekday::Sunday]);
    }

    #[test]
    fn test_auto_density_radius() {
        let mut prefs = SearchPrefs::default();
        prefs.auto_search_density = 10;
        let criteria = SearchCriteria::today_and_tomorrow(Weekday::Monday, &prefs);
        assert_eq!(criteria.radius, -15.0);

        // ceil applies before negation: 1.5 * 7 = 10.5 -> -11.
        prefs.auto_search_density = 7;
        let criteria = SearchCriteria::today_and_tomorrow(Weekday::Monday, &prefs);
        assert_eq!(criteria.radius, -11.0);
    }

    #[test]
    fn test_around_uses_default_distance() {
        let prefs = SearchPrefs::default();
        let here = GeoPoint::new(34.2355, -118.5635);
        let criteria = SearchCriteria::around(here, &prefs);
        assert_eq!(criteria.radius, 10.0);
        assert_eq!(criteria.location, Some(here));
        assert!(criteria.weekdays.is_empty());
    }
}
