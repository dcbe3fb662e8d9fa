use super::*;

fn gradient(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| image::Rgb([x as u8, y as u8, 7]))
}

#[test]
fn crops_inside_box() {
    let img = gradient(20, 10);
    let out = crop_to_leaf(&img, &LeafBox::new(5, 2, 4, 3)).unwrap();
    assert_eq!(out.dimensions(), (4, 3));
    assert_eq!(out.get_pixel(0, 0), &image::Rgb([5, 2, 7]));
    assert_eq!(out.get_pixel(3, 2), &image::Rgb([8, 4, 7]));
}

#[test]
fn negative_origin_moves_to_zero_keeping_size() {
    assert_eq!(LeafBox::new(-3, -1, 4, 4).clamp_to(20, 10), (0, 0, 4, 4));
    let out = crop_to_leaf(&gradient(20, 10), &LeafBox::new(-3, -1, 4, 4)).unwrap();
    assert_eq!(out.get_pixel(0, 0), &image::Rgb([0, 0, 7]));
}

#[test]
fn box_past_the_edge_is_truncated() {
    assert_eq!(LeafBox::new(18, 8, 10, 10).clamp_to(20, 10), (18, 8, 2, 2));
}

#[test]
fn box_outside_image_is_rejected() {
    let err = crop_to_leaf(&gradient(20, 10), &LeafBox::new(25, 0, 5, 5)).unwrap_err();
    assert!(matches!(err, LeafError::Validation(_)));
}

#[test]
fn deserializes_from_box_json() {
    let b: LeafBox = serde_json::from_str(r#"{"x": -2, "y": 4, "width": 30, "height": 12}"#).unwrap();
    assert_eq!(b, LeafBox::new(-2, 4, 30, 12));
}
