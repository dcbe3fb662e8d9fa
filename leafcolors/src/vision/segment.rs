use crate::vision::color::pixel_sample;
use crate::vision::kmeans::{KMeansOpts, kmeans, nearest_dist};
use image::{GrayImage, Luma, RgbImage};

/// Knobs for [`segment_foreground_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentOpts {
    /// Model-fit / relabel rounds.
    pub iterations: u32,
    /// Colour clusters per model.
    pub components: usize,
    /// Clustering settings for each model fit.
    pub kmeans: KMeansOpts,
}

impl Default for SegmentOpts {
    fn default() -> Self {
        Self {
            iterations: 5,
            components: 5,
            kmeans: KMeansOpts {
                max_iter: 10,
                epsilon: 1.0,
                attempts: 1,
                ..KMeansOpts::default()
            },
        }
    }
}

/// Black out the background of a subject framed by the image.
///
/// Everything on the one-pixel border is background; everything inside starts as foreground
/// and is relabelled against colour models of both sides. If nothing is left the original image
/// is returned unchanged.
pub fn segment_foreground(img: &RgbImage) -> RgbImage {
    segment_foreground_with(img, &SegmentOpts::default())
}

pub fn segment_foreground_with(img: &RgbImage, opts: &SegmentOpts) -> RgbImage {
    let Some(mask) = foreground_mask(img, opts) else {
        return img.clone();
    };

    let mut out = img.clone();
    for (p, m) in out.pixels_mut().zip(mask.pixels()) {
        if m[0] == 0 {
            *p = image::Rgb([0, 0, 0]);
        }
    }

    let luma = image::imageops::grayscale(&out);
    if luma.pixels().all(|p| p[0] == 0) {
        tracing::warn!(
            width = img.width(),
            height = img.height(),
            "segmentation removed everything; keeping the original image"
        );
        return img.clone();
    }
    out
}

/// Foreground mask (255 = foreground), or `None` when the image is too small to have an
/// interior.
pub fn foreground_mask(img: &RgbImage, opts: &SegmentOpts) -> Option<GrayImage> {
    let (w, h) = img.dimensions();
    if w < 3 || h < 3 {
        return None;
    }
    let inside = |x: u32, y: u32| x >= 1 && y >= 1 && x < w - 1 && y < h - 1;

    let samples: Vec<[f32; 3]> = img.pixels().map(pixel_sample).collect();
    let mut fg: Vec<bool> = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .map(|(x, y)| inside(x, y))
        .collect();

    for round in 0..opts.iterations {
        let mut fg_px = Vec::new();
        let mut bg_px = Vec::new();
        for (s, &is_fg) in samples.iter().zip(&fg) {
            if is_fg {
                fg_px.push(*s);
            } else {
                bg_px.push(*s);
            }
        }
        if fg_px.is_empty() {
            break;
        }

        let (Ok(fg_model), Ok(bg_model)) = (
            kmeans(&fg_px, opts.components, &opts.kmeans),
            kmeans(&bg_px, opts.components, &opts.kmeans),
        ) else {
            break;
        };

        let mut changed = 0usize;
        for (i, s) in samples.iter().enumerate() {
            let (x, y) = ((i as u32) % w, (i as u32) / w);
            if !inside(x, y) {
                continue;
            }
            let is_fg = nearest_dist(*s, &fg_model.centers) < nearest_dist(*s, &bg_model.centers);
            if is_fg != fg[i] {
                fg[i] = is_fg;
                changed += 1;
            }
        }
        tracing::trace!(round, changed, "segmentation round");
        if changed == 0 {
            break;
        }
    }

    Some(GrayImage::from_fn(w, h, |x, y| {
        Luma([if fg[(y * w + x) as usize] { 255 } else { 0 }])
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/vision/segment.rs"]
mod tests;
