use crate::foundation::error::{LeafError, LeafResult};
use image::RgbImage;

/// Pixel rectangle locating a leaf inside a photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LeafBox {
    /// Left edge; negative values are clamped to 0.
    pub x: i64,
    /// Top edge; negative values are clamped to 0.
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl LeafBox {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `(x, y, w, h)` of the box clamped to a `img_w × img_h` image.
    ///
    /// A negative edge moves to 0 and the box keeps its size from there; whatever then runs
    /// past the image is cut off.
    pub fn clamp_to(&self, img_w: u32, img_h: u32) -> (u32, u32, u32, u32) {
        fn axis(start: i64, len: u32, limit: u32) -> (u32, u32) {
            let limit = i64::from(limit);
            let start = start.clamp(0, limit);
            let end = (start + i64::from(len)).min(limit);
            (start as u32, (end - start) as u32)
        }
        let (x, w) = axis(self.x, self.width, img_w);
        let (y, h) = axis(self.y, self.height, img_h);
        (x, y, w, h)
    }
}

/// Copy out the part of `img` covered by `leaf`.
pub fn crop_to_leaf(img: &RgbImage, leaf: &LeafBox) -> LeafResult<RgbImage> {
    let (x, y, w, h) = leaf.clamp_to(img.width(), img.height());
    if w == 0 || h == 0 {
        return Err(LeafError::validation(format!(
            "leaf box {leaf:?} lies outside the {}x{} image",
            img.width(),
            img.height()
        )));
    }
    Ok(image::imageops::crop_imm(img, x, y, w, h).to_image())
}

#[cfg(test)]
#[path = "../../tests/unit/vision/crop.rs"]
mod tests;
