use super::*;
use crate::foundation::core::{DayRange, Opacity, Point};
use crate::render::frames::RenderedMarker;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn cfg() -> SinkConfig {
    SinkConfig {
        span: DayRange::new(d("2020-01-01"), d("2020-01-02")).unwrap(),
        map_width: 1000.0,
        map_height: 902.0,
    }
}

fn frame(day: &str, body: &str) -> SvgFrame {
    SvgFrame {
        date: d(day),
        markers: vec![RenderedMarker {
            id: crate::foundation::core::ObservationId::Int(1),
            center: Point::new(1.0, 2.0),
            opacity: Opacity::FULL,
        }],
        document: body.to_owned(),
    }
}

#[test]
fn dir_sink_writes_one_file_per_date() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = SvgDirSink::new(dir.path());
    sink.begin(cfg()).unwrap();
    sink.push_frame(&frame("2020-01-01", "<svg>a</svg>")).unwrap();
    sink.push_frame(&frame("2020-01-02", "<svg>b</svg>")).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written().len(), 2);
    let a = std::fs::read_to_string(dir.path().join("2020-01-01.svg")).unwrap();
    let b = std::fs::read_to_string(dir.path().join("2020-01-02.svg")).unwrap();
    assert_eq!(a, "<svg>a</svg>");
    assert_eq!(b, "<svg>b</svg>");
}

#[test]
fn dir_sink_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = SvgDirSink::new(dir.path().join("absent"));
    let err = sink.begin(cfg()).unwrap_err();
    assert!(matches!(err, LeafError::Io(_)), "{err}");
}

#[test]
fn dir_sink_file_in_place_of_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("frames");
    std::fs::write(&file, b"").unwrap();
    let err = SvgDirSink::new(&file).begin(cfg()).unwrap_err();
    assert!(matches!(err, LeafError::Io(_)), "{err}");
}

#[test]
fn sinks_reject_non_increasing_dates() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(&frame("2020-01-02", "")).unwrap();
    assert!(sink.push_frame(&frame("2020-01-02", "")).is_err());
    assert!(sink.push_frame(&frame("2020-01-01", "")).is_err());
    assert_eq!(sink.frames().len(), 1);
}

#[test]
fn sinks_reject_dates_outside_the_span() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let err = sink.push_frame(&frame("2020-01-05", "")).unwrap_err();
    assert!(matches!(err, LeafError::Validation(_)), "{err}");
    assert!(err.to_string().contains("2020-01-05"));
    assert!(sink.frames().is_empty());

    let dir = tempfile::tempdir().unwrap();
    let mut sink = SvgDirSink::new(dir.path());
    sink.begin(cfg()).unwrap();
    assert!(sink.push_frame(&frame("2019-12-31", "")).is_err());
    assert!(!dir.path().join("2019-12-31.svg").exists());
}

#[test]
fn begin_restarts_ordering() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(&frame("2020-01-02", "")).unwrap();
    sink.begin(cfg()).unwrap();
    sink.push_frame(&frame("2020-01-01", "")).unwrap();
    assert_eq!(sink.frames().len(), 1);
}

#[test]
fn fanout_forwards_to_every_sink() {
    let dir = tempfile::tempdir().unwrap();
    let mut fan = FanoutSink::new()
        .with(SvgDirSink::new(dir.path()))
        .with(InMemorySink::new());
    assert_eq!(fan.len(), 2);
    fan.begin(cfg()).unwrap();
    fan.push_frame(&frame("2020-01-01", "<svg/>")).unwrap();
    fan.end().unwrap();
    assert!(dir.path().join("2020-01-01.svg").is_file());
}

#[test]
fn fanout_stops_at_first_failing_sink() {
    let dir = tempfile::tempdir().unwrap();
    let mut fan = FanoutSink::new().with(SvgDirSink::new(dir.path().join("absent")));
    assert!(fan.begin(cfg()).is_err());
}
