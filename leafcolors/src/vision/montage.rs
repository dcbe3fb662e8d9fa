use crate::foundation::error::{LeafError, LeafResult};
use crate::vision::color::{LEAF_CLUSTERS, dominant_color};
use crate::vision::segment::segment_foreground;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Side-by-side record of how each leaf crop was coloured.
///
/// Each input becomes a column of the original, its segmented foreground and a swatch of the
/// dominant colour. Columns are scaled to the shortest column's height and placed left to right.
pub fn segmentation_montage(images: &[RgbImage]) -> LeafResult<RgbImage> {
    if images.is_empty() {
        return Err(LeafError::validation("montage needs at least one image"));
    }

    let mut columns = Vec::with_capacity(images.len());
    for img in images {
        let segmented = segment_foreground(img);
        let color = dominant_color(&segmented, LEAF_CLUSTERS)?;
        let swatch = RgbImage::from_pixel(img.width(), img.height(), color.into());
        columns.push(vconcat(&[img, &segmented, &swatch]));
    }
    Ok(hconcat_resize(&columns))
}

/// Stack images top to bottom, left-aligned.
pub fn vconcat(images: &[&RgbImage]) -> RgbImage {
    let w = images.iter().map(|i| i.width()).max().unwrap_or(0);
    let h = images.iter().map(|i| i.height()).sum();
    let mut out = RgbImage::new(w, h);
    let mut y = 0i64;
    for img in images {
        imageops::replace(&mut out, *img, 0, y);
        y += i64::from(img.height());
    }
    out
}

/// Scale every image to the smallest height (keeping aspect) and place them left to right.
pub fn hconcat_resize(images: &[RgbImage]) -> RgbImage {
    let Some(min_h) = images.iter().map(|i| i.height()).min() else {
        return RgbImage::new(0, 0);
    };
    let resized: Vec<RgbImage> = images
        .iter()
        .map(|img| {
            if img.height() == min_h {
                return img.clone();
            }
            let w = (u64::from(img.width()) * u64::from(min_h) / u64::from(img.height())) as u32;
            imageops::resize(img, w.max(1), min_h, FilterType::CatmullRom)
        })
        .collect();

    let total_w = resized.iter().map(|i| i.width()).sum();
    let mut out = RgbImage::new(total_w, min_h);
    let mut x = 0i64;
    for img in &resized {
        imageops::replace(&mut out, img, x, 0);
        x += i64::from(img.width());
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/vision/montage.rs"]
mod tests;
