//! Filter and sort a "today and tomorrow" search response.
//!
//! Run with: cargo run --example today_search

use meeting_search_core::{
    filter_passed_meetings, sort_results, Meeting, SearchCriteria, SearchPrefs, SearchWindow,
    SortMode, StartTime, Weekday,
};

fn main() {
    let prefs = SearchPrefs::default();

    // What the host would send to its search layer for a Saturday.
    let criteria = SearchCriteria::today_and_tomorrow(Weekday::Saturday, &prefs);
    println!(
        "Criteria: weekdays {:?}, radius {}\n",
        criteria.weekdays, criteria.radius
    );

    // A canned Saturday-evening response.
    let meetings = vec![
        named(1, Weekday::Saturday, 10, 0, "Early Risers"),
        named(2, Weekday::Saturday, 20, 0, "Candlelight"),
        named(3, Weekday::Saturday, 23, 30, "Night Owls"),
        named(4, Weekday::Sunday, 9, 30, "Sunday Serenity"),
    ];

    // 19:50 on Saturday with the default grace period: the morning
    // meeting is gone, the 20:00 meeting is still attendable.
    let window = SearchWindow {
        today: Weekday::Saturday,
        hour: 19,
        minute: 50,
        grace_minutes: prefs.grace_period_minutes,
    };
    let upcoming = filter_passed_meetings(&meetings, &window);

    let ordered = sort_results(
        &upcoming,
        SortMode::ByScheduleOrder,
        prefs.first_weekday,
        true,
    );

    println!("Still attendable ({} of {}):", ordered.len(), meetings.len());
    for m in &ordered {
        println!(
            "  {:9?} {:02}:{:02}  {}",
            m.weekday, m.start_time.hour, m.start_time.minute, m.name
        );
    }
}

fn named(id: u64, weekday: Weekday, hour: u8, minute: u8, name: &str) -> Meeting {
    let mut m = Meeting::new(id, weekday, StartTime::new(hour, minute).unwrap());
    m.name = name.to_string();
    m
}
