use super::*;

const URL: &str = "https://api.example.org/v1/observations?taxon_id=48098&d1=2015-01-01&page=1&per_page=200&order=desc&order_by=observed_on";

#[test]
fn parses_page_and_per_page() {
    let q = PageQuery::parse(URL).unwrap();
    assert_eq!(q.page(), 1);
    assert_eq!(q.per_page(), 200);
}

#[test]
fn with_page_rewrites_only_the_page_key_in_place() {
    let q = PageQuery::parse(URL).unwrap();
    let u = q.with_page(7).unwrap();
    assert_eq!(
        u.query(),
        Some("taxon_id=48098&d1=2015-01-01&page=7&per_page=200&order=desc&order_by=observed_on")
    );
    assert_eq!(u.path(), "/v1/observations");
}

#[test]
fn per_page_is_not_mistaken_for_page() {
    let q = PageQuery::parse("https://h/x?per_page=30&page=2").unwrap();
    assert_eq!(q.page(), 2);
    let u = q.with_page(3).unwrap();
    assert_eq!(u.query(), Some("per_page=30&page=3"));
}

#[test]
fn other_parameters_keep_their_raw_encoding() {
    let q = PageQuery::parse("https://h/x?place_id=1,2&q=red%20maple&page=1&per_page=30").unwrap();
    let u = q.with_page(4).unwrap();
    assert_eq!(u.query(), Some("place_id=1,2&q=red%20maple&page=4&per_page=30"));
}

#[test]
fn page_zero_is_rejected() {
    let q = PageQuery::parse(URL).unwrap();
    assert!(matches!(q.with_page(0), Err(LeafError::Config(_))));
}

#[test]
fn missing_or_bad_pagination_is_config_error() {
    for url in [
        "https://h/x?per_page=30",
        "https://h/x?page=1",
        "https://h/x?page=1&per_page=0",
        "https://h/x?page=one&per_page=30",
        "not a url",
    ] {
        let err = PageQuery::parse(url).unwrap_err();
        assert!(matches!(err, LeafError::Config(_)), "{url}: {err}");
    }
}
