use super::*;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn opacity_fades_from_full_to_two_tenths_then_drops() {
    let mut op = Opacity::UNRENDERED;
    let mut rendered = Vec::new();
    while let Some(next) = op.fade() {
        rendered.push(next.to_string());
        op = next;
    }
    assert_eq!(
        rendered,
        vec!["1.0", "0.9", "0.8", "0.7", "0.6", "0.5", "0.4", "0.3", "0.2"]
    );
}

#[test]
fn opacity_first_fade_is_exactly_full() {
    assert_eq!(Opacity::UNRENDERED.fade(), Some(Opacity::FULL));
    assert_eq!(Opacity::FULL.as_f64(), 1.0);
}

#[test]
fn days_between_counts_whole_days() {
    assert_eq!(days_between(d("2020-01-01"), d("2020-01-01")), 0);
    assert_eq!(days_between(d("2020-01-01"), d("2020-01-03")), 2);
    assert_eq!(days_between(d("2020-02-28"), d("2020-03-01")), 2);
    assert_eq!(days_between(d("2020-01-03"), d("2020-01-01")), -2);
}

#[test]
fn day_range_is_inclusive_across_year_end() {
    let r = DayRange::new(d("2019-12-30"), d("2020-01-02")).unwrap();
    assert_eq!(r.len_days(), 4);
    assert!(r.contains(d("2019-12-30")));
    assert!(r.contains(d("2020-01-02")));
    assert!(!r.contains(d("2019-12-29")));
    assert!(r.contains(d("2020-01-01")));
    assert!(!r.contains(d("2020-01-03")));
}

#[test]
fn day_range_rejects_reversed_bounds() {
    assert!(DayRange::new(d("2020-01-02"), d("2020-01-01")).is_err());
}

#[test]
fn latlon_serializes_as_pair_and_parses_api_string() {
    let p: LatLon = serde_json::from_str("[10.5, -20.25]").unwrap();
    assert_eq!(p, LatLon::new(10.5, -20.25));
    assert_eq!(serde_json::to_string(&p).unwrap(), "[10.5,-20.25]");

    let q = LatLon::parse_pair("43.0712, -89.4012").unwrap();
    assert_eq!(q, LatLon::new(43.0712, -89.4012));
    assert!(LatLon::parse_pair("43.0712").is_err());
    assert!(LatLon::parse_pair("north,west").is_err());
}

#[test]
fn rgb_accepts_float_channels_and_ignores_fourth() {
    let c: Rgb8 = serde_json::from_str("[200.4, 99.6, 0.0]").unwrap();
    assert_eq!(c, Rgb8::new(200, 100, 0));
    let c: Rgb8 = serde_json::from_str("[1, 2, 3, 1.1]").unwrap();
    assert_eq!(c, Rgb8::new(1, 2, 3));
    assert!(serde_json::from_str::<Rgb8>("[1, 2]").is_err());
    assert_eq!(
        serde_json::to_string(&Rgb8::new(1, 2, 3)).unwrap(),
        "[1,2,3]"
    );
}

#[test]
fn observation_id_is_untagged() {
    let a: ObservationId = serde_json::from_str("42").unwrap();
    let b: ObservationId = serde_json::from_str("\"obs-7\"").unwrap();
    assert_eq!(a.to_string(), "42");
    assert_eq!(b.to_string(), "obs-7");
}
