//! Map marker clustering.
//!
//! Collapses meetings whose projected screen positions are within a small
//! tolerance of each other into a single aggregate pin, so that a dense
//! downtown search does not render a stack of overlapping markers. The
//! renderer draws single-meeting clusters and multi-meeting clusters
//! differently; this module only tracks membership.
//!
//! The algorithm is a greedy single pass in input order, deliberately not
//! a true spatial clustering: there is no transitive merging and no
//! centroid recomputation, and a cluster's anchor stays fixed at the
//! coordinate of its first meeting. Reordering the input can shift which
//! coordinate becomes an anchor. This matches the behavior map users of
//! the host apps already see, so it is kept as-is.

use crate::{GeoPoint, Meeting};
use log::debug;

/// Default hit-test tolerance in display points.
pub const DEFAULT_MARKER_TOLERANCE: f64 = 4.0;

/// A position in screen space, in display points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// One map marker: an anchor coordinate plus the meetings assigned to it.
///
/// The anchor is the coordinate of the first meeting assigned to the
/// cluster and never moves, even as nearby meetings join later.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    pub anchor: GeoPoint,
    pub meetings: Vec<Meeting>,
}

impl Cluster {
    fn new(anchor: GeoPoint, meeting: Meeting) -> Self {
        Self {
            anchor,
            meetings: vec![meeting],
        }
    }

    /// True when this marker aggregates more than one meeting.
    pub fn is_aggregate(&self) -> bool {
        self.meetings.len() > 1
    }
}

/// Partition meetings into map marker clusters.
///
/// For each meeting (in input order) with a location, a square hit-test
/// region of side `2 * tolerance_points` is centered on the meeting's
/// projected screen position; the meeting joins the first existing
/// cluster (in creation order) whose projected anchor falls inside that
/// region, or starts a new cluster anchored at its own coordinate.
/// Region edges follow rect semantics: min edge inclusive, max edge
/// exclusive.
///
/// Meetings without a location are skipped entirely. Each call returns
/// an independent snapshot; when the viewport (and therefore `project`)
/// changes, rerun from scratch - clusters carry no identity between
/// calls.
///
/// # Example
/// ```
/// use meeting_search_core::{cluster_meetings, GeoPoint, Meeting, ScreenPoint, StartTime, Weekday};
///
/// let mut a = Meeting::new(1, Weekday::Monday, StartTime::new(19, 0).unwrap());
/// a.location = Some(GeoPoint::new(10.0, 10.0));
/// let mut b = Meeting::new(2, Weekday::Monday, StartTime::new(20, 0).unwrap());
/// b.location = Some(GeoPoint::new(11.0, 11.0));
///
/// // Identity projection: coordinates are already screen points.
/// let clusters = cluster_meetings(
///     &[a, b],
///     |c| ScreenPoint { x: c.longitude, y: c.latitude },
///     4.0,
/// );
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].meetings.len(), 2);
/// ```
pub fn cluster_meetings<P>(
    meetings: &[Meeting],
    project: P,
    tolerance_points: f64,
) -> Vec<Cluster>
where
    P: Fn(GeoPoint) -> ScreenPoint,
{
    let mut clusters: Vec<Cluster> = Vec::new();

    for meeting in meetings {
        let Some(coord) = meeting.location else {
            continue;
        };

        if clusters.is_empty() {
            clusters.push(Cluster::new(coord, meeting.clone()));
            continue;
        }

        let candidate = project(coord);
        let mut assigned = false;

        for cluster in clusters.iter_mut() {
            if cluster.meetings.iter().any(|m| m.id == meeting.id) {
                continue;
            }
            let anchor = project(cluster.anchor);
            if hit_test(candidate, tolerance_points, anchor) {
                cluster.meetings.push(meeting.clone());
                assigned = true;
                break;
            }
        }

        if !assigned {
            clusters.push(Cluster::new(coord, meeting.clone()));
        }
    }

    debug!(
        "clustered {} meetings into {} markers",
        meetings.len(),
        clusters.len()
    );

    clusters
}

/// Square hit-test region of side `2 * tolerance` centered on `center`;
/// min edge inclusive, max edge exclusive.
fn hit_test(center: ScreenPoint, tolerance: f64, point: ScreenPoint) -> bool {
    point.x >= center.x - tolerance
        && point.x < center.x + tolerance
        && point.y >= center.y - tolerance
        && point.y < center.y + tolerance
}

/// A concrete geographic-to-screen projection for a map viewport.
///
/// Equirectangular around the viewport center, with screen y growing
/// downward; good enough at city scale, which is all marker hit-testing
/// needs. Hosts with a real map view should pass their own projection to
/// [`cluster_meetings`] instead.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapViewport {
    pub center: GeoPoint,
    pub width_points: f64,
    pub height_points: f64,
    /// Zoom level expressed as display points per meter of ground.
    pub points_per_meter: f64,
}

impl MapViewport {
    /// Project a coordinate into this viewport's screen space.
    pub fn project(&self, coord: GeoPoint) -> ScreenPoint {
        let lat_meters_per_deg = 111_320.0;
        let lng_meters_per_deg = 111_320.0 * self.center.latitude.to_radians().cos();

        let dx = (coord.longitude - self.center.longitude) * lng_meters_per_deg;
        let dy = (coord.latitude - self.center.latitude) * lat_meters_per_deg;

        ScreenPoint {
            x: self.width_points / 2.0 + dx * self.points_per_meter,
            y: self.height_points / 2.0 - dy * self.points_per_meter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StartTime, Weekday};

    fn meeting_at(id: u64, screen: (f64, f64)) -> Meeting {
        // Identity projection in these tests: latitude is y, longitude is x.
        let mut m = Meeting::new(id, Weekday::Monday, StartTime::new(19, 0).unwrap());
        m.location = Some(GeoPoint::new(screen.1, screen.0));
        m
    }

    fn identity(coord: GeoPoint) -> ScreenPoint {
        ScreenPoint {
            x: coord.longitude,
            y: coord.latitude,
        }
    }

    #[test]
    fn test_two_near_one_far() {
        let meetings = vec![
            meeting_at(1, (10.0, 10.0)),
            meeting_at(2, (11.0, 11.0)),
            meeting_at(3, (200.0, 200.0)),
        ];

        let clusters = cluster_meetings(&meetings, identity, 4.0);
        assert_eq!(clusters.len(), 2);

        assert_eq!(clusters[0].anchor, GeoPoint::new(10.0, 10.0));
        assert_eq!(clusters[0].meetings.len(), 2);
        assert!(clusters[0].is_aggregate());

        assert_eq!(clusters[1].anchor, GeoPoint::new(200.0, 200.0));
        assert_eq!(clusters[1].meetings.len(), 1);
        assert!(!clusters[1].is_aggregate());
    }

    #[test]
    fn test_input_order_changes_anchor_not_grouping() {
        let meetings = vec![
            meeting_at(3, (200.0, 200.0)),
            meeting_at(1, (10.0, 10.0)),
            meeting_at(2, (11.0, 11.0)),
        ];

        let clusters = cluster_meetings(&meetings, identity, 4.0);
        assert_eq!(clusters.len(), 2);

        let mut sizes: Vec<usize> = clusters.iter().map(|c| c.meetings.len()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![1, 2]);

        // The far meeting came first, so it owns the first anchor now.
        assert_eq!(clusters[0].anchor, GeoPoint::new(200.0, 200.0));
        assert_eq!(clusters[1].anchor, GeoPoint::new(10.0, 10.0));
    }

    #[test]
    fn test_anchor_never_recomputed() {
        // The third meeting is within tolerance of the first cluster's
        // anchor even though the cluster has since absorbed a second
        // meeting further away; hit-testing is always against the anchor.
        let meetings = vec![
            meeting_at(1, (10.0, 10.0)),
            meeting_at(2, (13.0, 10.0)),
            meeting_at(3, (7.0, 10.0)),
        ];

        let clusters = cluster_meetings(&meetings, identity, 4.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].anchor, GeoPoint::new(10.0, 10.0));
        assert_eq!(clusters[0].meetings.len(), 3);
    }

    #[test]
    fn test_first_matching_cluster_wins() {
        // Two clusters 6 points apart, and a candidate within tolerance
        // of both; it joins the first-created cluster and scanning stops.
        let meetings = vec![
            meeting_at(1, (10.0, 10.0)),
            meeting_at(2, (16.0, 10.0)),
            meeting_at(3, (13.0, 10.0)),
        ];

        let clusters = cluster_meetings(&meetings, identity, 4.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].meetings.len(), 2);
        assert_eq!(clusters[0].meetings[1].id, 3);
        assert_eq!(clusters[1].meetings.len(), 1);
    }

    #[test]
    fn test_locationless_meetings_skipped() {
        let mut no_location = Meeting::new(9, Weekday::Friday, StartTime::new(12, 0).unwrap());
        no_location.location = None;

        let meetings = vec![no_location, meeting_at(1, (10.0, 10.0))];
        let clusters = cluster_meetings(&meetings, identity, 4.0);

        assert_eq!(clusters.len(), 1);
        assert!(clusters
            .iter()
            .all(|c| c.meetings.iter().all(|m| m.id != 9)));
    }

    #[test]
    fn test_member_count_conserved() {
        let meetings: Vec<Meeting> = (0..20)
            .map(|i| meeting_at(i, (i as f64 * 2.5, 0.0)))
            .collect();

        let clusters = cluster_meetings(&meetings, identity, 4.0);
        let total: usize = clusters.iter().map(|c| c.meetings.len()).sum();
        assert_eq!(total, meetings.len());
    }

    #[test]
    fn test_empty_and_all_locationless_input() {
        assert!(cluster_meetings(&[], identity, 4.0).is_empty());

        let no_location = Meeting::new(1, Weekday::Friday, StartTime::new(12, 0).unwrap());
        assert!(cluster_meetings(&[no_location], identity, 4.0).is_empty());
    }

    #[test]
    fn test_hit_test_edges() {
        let center = ScreenPoint { x: 10.0, y: 10.0 };
        // Min edge inclusive, max edge exclusive.
        assert!(hit_test(center, 4.0, ScreenPoint { x: 6.0, y: 6.0 }));
        assert!(!hit_test(center, 4.0, ScreenPoint { x: 14.0, y: 10.0 }));
        assert!(hit_test(center, 4.0, ScreenPoint { x: 13.999, y: 10.0 }));
    }

    #[test]
    fn test_viewport_projection() {
        let viewport = MapViewport {
            center: GeoPoint::new(34.2355, -118.5635),
            width_points: 400.0,
            height_points: 600.0,
            points_per_meter: 0.1,
        };

        // The center lands mid-screen.
        let center = viewport.project(viewport.center);
        assert!((center.x - 200.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);

        // A point due north projects straight up (smaller y).
        let north = viewport.project(GeoPoint::new(34.2365, -118.5635));
        assert!((north.x - 200.0).abs() < 1e-6);
        assert!(north.y < center.y);
    }

    #[test]
    fn test_clustering_with_viewport_projection() {
        let viewport = MapViewport {
            center: GeoPoint::new(34.2355, -118.5635),
            width_points: 400.0,
            height_points: 600.0,
            points_per_meter: 0.01,
        };

        // Two meetings ~110m apart (about 1 screen point at this zoom)
        // and one several kilometers away.
        let mut a = Meeting::new(1, Weekday::Monday, StartTime::new(19, 0).unwrap());
        a.location = Some(GeoPoint::new(34.2355, -118.5635));
        let mut b = Meeting::new(2, Weekday::Monday, StartTime::new(20, 0).unwrap());
        b.location = Some(GeoPoint::new(34.2365, -118.5635));
        let mut c = Meeting::new(3, Weekday::Monday, StartTime::new(21, 0).unwrap());
        c.location = Some(GeoPoint::new(34.3000, -118.5635));

        let clusters = cluster_meetings(&[a, b, c], |p| viewport.project(p), 4.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].meetings.len(), 2);
        assert_eq!(clusters[1].meetings.len(), 1);
    }
}
