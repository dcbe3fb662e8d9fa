use super::*;
use crate::fetch::transport::StaticTransport;

const BASE: &str = "https://api.example.org/v1/observations?taxon_id=1&page=1&per_page=2";

fn page_url(p: u32) -> String {
    format!("https://api.example.org/v1/observations?taxon_id=1&page={p}&per_page=2")
}

fn result(id: u64, day: &str) -> String {
    format!(
        r#"{{"id": {id}, "observed_on": "{day}", "location": "1.0,2.0", "species_guess": "maple",
            "photos": [{{"id": {pid}, "url": "https://img.example.org/photos/{pid}/square.jpg"}}]}}"#,
        pid = id * 10
    )
}

fn transport() -> StaticTransport {
    StaticTransport::new()
        .with(
            page_url(1),
            format!(
                r#"{{"total_results": 3, "page": 1, "results": [{}, {}]}}"#,
                result(1, "2019-10-03"),
                result(2, "2019-10-02")
            ),
        )
        .with(
            page_url(2),
            format!(
                r#"{{"total_results": 3, "page": 2, "results": [{}]}}"#,
                result(3, "2019-10-01")
            ),
        )
}

#[test]
fn fetch_walks_ceil_div_pages() {
    let t = transport();
    let fetcher = ObservationFetcher::new(&t);
    let records = fetcher.fetch(BASE).unwrap();
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(t.requests(), vec![page_url(1), page_url(1), page_url(2)]);
}

#[test]
fn fetch_with_zero_results_only_counts() {
    let t = StaticTransport::new().with(page_url(1), r#"{"total_results": 0, "results": []}"#);
    let records = ObservationFetcher::new(&t).fetch(BASE).unwrap();
    assert!(records.is_empty());
    assert_eq!(t.requests().len(), 1);
}

#[test]
fn absurd_total_results_does_not_preallocate() {
    let t = StaticTransport::new().with(
        page_url(1),
        r#"{"total_results": 18446744073709551615, "results": []}"#,
    );
    // page 2 has no canned response, so the walk stops there
    let err = ObservationFetcher::new(&t).fetch(BASE).unwrap_err();
    assert!(matches!(err, LeafError::Http(_)), "{err}");
    assert_eq!(t.requests(), vec![page_url(1), page_url(1), page_url(2)]);
}

#[test]
fn fetch_without_pagination_fails_before_any_request() {
    let t = transport();
    let err = ObservationFetcher::new(&t)
        .fetch("https://api.example.org/v1/observations?taxon_id=1")
        .unwrap_err();
    assert!(matches!(err, LeafError::Config(_)));
    assert!(t.requests().is_empty());
}

#[test]
fn non_json_response_is_serde_error() {
    let t = StaticTransport::new().with(page_url(1), "<html>rate limited</html>");
    let err = ObservationFetcher::new(&t).fetch(BASE).unwrap_err();
    assert!(matches!(err, LeafError::Serde(_)));
}

#[test]
fn download_photos_writes_size_variant_by_photo_id() {
    let dir = tempfile::tempdir().unwrap();
    let t = transport()
        .with("https://img.example.org/photos/10/medium.jpg", b"jpeg-10".to_vec())
        .with("https://img.example.org/photos/20/medium.jpg", b"jpeg-20!".to_vec());
    let fetcher = ObservationFetcher::new(&t);
    let records = fetcher.fetch(BASE).unwrap();

    let err = fetcher
        .download_photos(&records, dir.path(), PhotoSize::Medium)
        .unwrap_err();
    // photo 30 has no canned response
    assert!(matches!(err, LeafError::Http(_)));

    let stats = fetcher
        .download_photos(&records[..2], dir.path(), PhotoSize::Medium)
        .unwrap();
    assert_eq!(stats, DownloadStats { photos: 2, bytes: 15 });
    assert_eq!(std::fs::read(dir.path().join("10.jpg")).unwrap(), b"jpeg-10");
    assert_eq!(std::fs::read(dir.path().join("20.jpg")).unwrap(), b"jpeg-20!");
}

#[test]
fn photo_size_parses_and_rewrites_url() {
    assert_eq!("Large".parse::<PhotoSize>().unwrap(), PhotoSize::Large);
    assert!("huge".parse::<PhotoSize>().is_err());
    assert_eq!(
        PhotoSize::Small.photo_url("https://x/photos/1/square.jpeg"),
        "https://x/photos/1/small.jpeg"
    );
}
