use super::*;

const API_RESULT: &str = r#"{
  "id": 1001,
  "observed_on": "2019-10-12",
  "location": "43.07,-89.40",
  "quality_grade": "research",
  "taxon": {"id": 48098, "name": "Acer rubrum"},
  "photos": [
    {"id": 55, "url": "https://static.example.org/photos/55/square.jpg", "original_dimensions": {"width": 10}}
  ],
  "place_ids": [1, 2],
  "uri": "https://example.org/observations/1001"
}"#;

#[test]
fn unknown_api_fields_are_dropped() {
    let rec: ObservationRecord = serde_json::from_str(API_RESULT).unwrap();
    let back = serde_json::to_value(&rec).unwrap();
    assert!(back.get("quality_grade").is_none());
    assert!(back.get("taxon").is_none());
    assert_eq!(back["photos"][0]["id"], 55);
    assert!(back["photos"][0].get("original_dimensions").is_none());
}

#[test]
fn parses_date_and_location() {
    let rec: ObservationRecord = serde_json::from_str(API_RESULT).unwrap();
    assert_eq!(rec.observed_date().unwrap().unwrap().to_string(), "2019-10-12");
    assert_eq!(rec.lat_lon().unwrap(), Some(LatLon::new(43.07, -89.40)));
}

#[test]
fn missing_fields_are_none_and_bad_date_errors() {
    let mut rec: ObservationRecord = serde_json::from_str(r#"{"id": 7}"#).unwrap();
    assert_eq!(rec.observed_date().unwrap(), None);
    assert_eq!(rec.lat_lon().unwrap(), None);
    assert!(rec.photos.is_empty());

    rec.observed_on = Some("12/10/2019".to_owned());
    assert!(rec.observed_date().is_err());
}
