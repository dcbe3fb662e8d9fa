use super::*;

#[test]
fn circle_carries_style_id_center_and_radius() {
    let mut out = String::new();
    write_circle(
        &mut out,
        &ObservationId::Int(42),
        Point::new(500.0, 451.0),
        2.0,
        Rgb8::new(200, 100, 0),
        Opacity::FULL,
    );
    assert!(out.starts_with("<circle style=\"fill:rgb(200, 100, 0);fill-opacity:1;stroke:rgb(200, 100, 0);"));
    assert!(out.contains("stroke-width:0.71433073;stroke-linecap:square;"));
    assert!(out.contains(";opacity:1.0\" id=\"42\" cx=\"500\" cy=\"451\" r=\"2\" />"));
    assert!(out.ends_with("/>\n"));
}

#[test]
fn string_ids_are_attribute_escaped() {
    let mut out = String::new();
    write_circle(
        &mut out,
        &ObservationId::Str("a\"<b>&c".to_owned()),
        Point::new(0.0, 0.0),
        2.0,
        Rgb8::BLACK,
        Opacity::from_tenths(5),
    );
    assert!(out.contains("id=\"a&quot;&lt;b&gt;&amp;c\""));
    assert!(out.contains("opacity:0.5\""));
}

#[test]
fn date_label_prints_iso_date() {
    let mut out = String::new();
    let date = NaiveDate::from_ymd_opt(2017, 10, 3).unwrap();
    write_date_label(&mut out, date, Point::new(24.0, 878.0));
    assert!(out.contains("id=\"date-label\""));
    assert!(out.contains(">2017-10-03</tspan></text>"));
    assert!(out.contains("x=\"24\" y=\"878\""));
}

#[test]
fn builtin_template_is_well_formed_svg() {
    let t = SvgTemplate::builtin();
    let doc = format!("{}{}", t.header(), t.footer());
    let tree = usvg::Tree::from_str(&doc, &usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 1000.0);
    assert_eq!(tree.size().height(), 902.0);
}

#[test]
fn from_paths_reads_both_halves() {
    let dir = tempfile::tempdir().unwrap();
    let s = dir.path().join("starter.svg");
    let e = dir.path().join("ender.svg");
    std::fs::write(&s, "<svg>").unwrap();
    std::fs::write(&e, "</svg>").unwrap();
    let t = SvgTemplate::from_paths(&s, &e).unwrap();
    assert_eq!(t.header(), "<svg>");
    assert_eq!(t.footer(), "</svg>");

    let missing = SvgTemplate::from_paths(dir.path().join("nope.svg"), &e).unwrap_err();
    assert!(matches!(missing, LeafError::Io(_)));
}
