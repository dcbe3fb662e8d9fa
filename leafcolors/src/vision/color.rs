use crate::foundation::core::Rgb8;
use crate::foundation::error::{LeafError, LeafResult};
use crate::vision::crop::{LeafBox, crop_to_leaf};
use crate::vision::kmeans::{KMeansOpts, kmeans};
use crate::vision::segment::segment_foreground;
use image::RgbImage;
use std::path::Path;

/// Clusters used when picking a leaf's colour.
pub const LEAF_CLUSTERS: usize = 2;

/// Decode any supported image file as 8-bit RGB. The format is sniffed from the bytes, not the
/// extension.
pub fn load_rgb(path: impl AsRef<Path>) -> LeafResult<RgbImage> {
    let path = path.as_ref();
    let reader = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| LeafError::io_at(path, e))?;
    reader
        .decode()
        .map(|img| img.to_rgb8())
        .map_err(|e| LeafError::image(format!("decode '{}': {e}", path.display())))
}

pub(crate) fn pixel_sample(p: &image::Rgb<u8>) -> [f32; 3] {
    [f32::from(p[0]), f32::from(p[1]), f32::from(p[2])]
}

/// Pixels with every channel non-zero. Anything with a zero channel counts as removed background.
pub fn foreground_samples(img: &RgbImage) -> Vec<[f32; 3]> {
    img.pixels()
        .filter(|p| p.0.iter().all(|&c| c != 0))
        .map(pixel_sample)
        .collect()
}

/// Centroid of the largest k-means cluster over the foreground pixels.
///
/// Falls back to clustering every pixel when nothing survives background removal.
pub fn dominant_color(img: &RgbImage, k: usize) -> LeafResult<Rgb8> {
    dominant_color_with(img, k, &KMeansOpts::default())
}

pub fn dominant_color_with(img: &RgbImage, k: usize, opts: &KMeansOpts) -> LeafResult<Rgb8> {
    if img.width() == 0 || img.height() == 0 {
        return Err(LeafError::validation("cannot take the colour of an empty image"));
    }
    let mut samples = foreground_samples(img);
    if samples.is_empty() {
        tracing::debug!("no foreground pixels; clustering the whole image");
        samples = img.pixels().map(pixel_sample).collect();
    }
    let clustering = kmeans(&samples, k, opts)?;
    let center = clustering
        .largest_center()
        .ok_or_else(|| LeafError::validation("k-means returned no clusters"))?;
    Ok(Rgb8::from_f32_channels(center))
}

/// Crop to `leaf` (if given), segment the foreground and return its dominant colour.
pub fn leaf_color(img: &RgbImage, leaf: Option<&LeafBox>) -> LeafResult<Rgb8> {
    let cropped;
    let region = match leaf {
        Some(b) => {
            cropped = crop_to_leaf(img, b)?;
            &cropped
        }
        None => img,
    };
    let segmented = segment_foreground(region);
    dominant_color(&segmented, LEAF_CLUSTERS)
}

#[cfg(test)]
#[path = "../../tests/unit/vision/color.rs"]
mod tests;
