use super::*;

#[test]
fn dominant_color_ignores_pixels_with_a_zero_channel() {
    // 10 black-ish background pixels, 6 orange, 3 green
    let mut img = RgbImage::from_pixel(19, 1, image::Rgb([0, 12, 40]));
    for x in 10..16 {
        img.put_pixel(x, 0, image::Rgb([210, 120, 30]));
    }
    for x in 16..19 {
        img.put_pixel(x, 0, image::Rgb([40, 160, 50]));
    }
    assert_eq!(dominant_color(&img, 2).unwrap(), Rgb8::new(210, 120, 30));
}

#[test]
fn all_background_image_clusters_every_pixel() {
    let img = RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]));
    assert_eq!(dominant_color(&img, 2).unwrap(), Rgb8::BLACK);
}

#[test]
fn empty_image_is_validation_error() {
    let img = RgbImage::new(0, 0);
    assert!(matches!(
        dominant_color(&img, 2),
        Err(LeafError::Validation(_))
    ));
}

#[test]
fn foreground_samples_filters_on_any_zero_channel() {
    let img = RgbImage::from_vec(3, 1, vec![1, 1, 1, 0, 5, 5, 9, 9, 0]).unwrap();
    assert_eq!(foreground_samples(&img), vec![[1.0, 1.0, 1.0]]);
}

#[test]
fn leaf_color_finds_leaf_inside_box() {
    let sky = image::Rgb([30, 90, 200]);
    let leaf = image::Rgb([200, 40, 20]);
    let img = RgbImage::from_fn(40, 30, |x, y| {
        if (26..34).contains(&x) && (10..18).contains(&y) {
            leaf
        } else {
            sky
        }
    });
    let b = LeafBox::new(20, 4, 20, 20);
    assert_eq!(leaf_color(&img, Some(&b)).unwrap(), Rgb8::new(200, 40, 20));
}

#[test]
fn load_rgb_reports_undecodable_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("broken.jpg");
    std::fs::write(&p, b"not an image").unwrap();
    assert!(matches!(load_rgb(&p), Err(LeafError::Image(_))));
}
