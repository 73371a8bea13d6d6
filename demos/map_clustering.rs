//! Cluster search results into map markers at two zoom levels.
//!
//! Run with: cargo run --example map_clustering

use meeting_search_core::{
    cluster_meetings, GeoPoint, MapViewport, Meeting, StartTime, Weekday,
    DEFAULT_MARKER_TOLERANCE,
};

fn main() {
    let center = GeoPoint::new(34.2355, -118.5635);

    // Three venues: two a block apart, one across town.
    let meetings = vec![
        located(1, 34.2360, -118.5630),
        located(2, 34.2362, -118.5628),
        located(3, 34.2700, -118.5200),
    ];

    for points_per_meter in [0.002, 0.05] {
        let viewport = MapViewport {
            center,
            width_points: 400.0,
            height_points: 600.0,
            points_per_meter,
        };

        let clusters = cluster_meetings(
            &meetings,
            |coord| viewport.project(coord),
            DEFAULT_MARKER_TOLERANCE,
        );

        println!("Zoom {} points/m -> {} markers:", points_per_meter, clusters.len());
        for cluster in &clusters {
            let screen = viewport.project(cluster.anchor);
            println!(
                "  {} at ({:.4}, {:.4}) screen ({:.0}, {:.0}) with {} meeting(s)",
                if cluster.is_aggregate() { "aggregate pin" } else { "single pin" },
                cluster.anchor.latitude,
                cluster.anchor.longitude,
                screen.x,
                screen.y,
                cluster.meetings.len()
            );
        }
        println!();
    }
}

fn located(id: u64, latitude: f64, longitude: f64) -> Meeting {
    let mut m = Meeting::new(id, Weekday::Monday, StartTime::new(19, 0).unwrap());
    m.location = Some(GeoPoint::new(latitude, longitude));
    m
}
