use crate::foundation::error::{LeafError, LeafResult};
use std::path::Path;
use std::sync::Arc;

const MAX_DIM: u32 = 16_384;

/// Premultiplied RGBA8 pixels of one rasterized frame, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Pixel size for a map of `map_width × map_height` units rendered `target_width` pixels wide.
///
/// Both sides are rounded up to even numbers so the result can be fed to yuv420p encoders.
pub fn raster_size(map_width: f64, map_height: f64, target_width: u32) -> LeafResult<(u32, u32)> {
    if !(map_width.is_finite() && map_height.is_finite()) || map_width <= 0.0 || map_height <= 0.0
    {
        return Err(LeafError::validation("map has invalid width/height"));
    }
    if target_width == 0 {
        return Err(LeafError::validation("raster width must be non-zero"));
    }
    fn even(v: u32) -> u32 {
        v + (v % 2)
    }
    let w = even(target_width);
    let h = even(((f64::from(target_width) * map_height / map_width).ceil() as u32).max(1));
    if w > MAX_DIM || h > MAX_DIM {
        return Err(LeafError::validation(format!(
            "raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

/// Parses SVG frame documents and renders them with resvg.
///
/// The font database is built once; the date label needs a sans-serif face to show up.
pub struct SvgRasterizer {
    opts: usvg::Options<'static>,
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SvgRasterizer {
    /// Load system fonts plus any `.ttf`/`.otf`/`.ttc` files in `font_dir`.
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        let opts = usvg::Options {
            fontdb: Arc::new(db),
            ..Default::default()
        };
        Self { opts }
    }

    pub fn parse(&self, document: &str) -> LeafResult<usvg::Tree> {
        usvg::Tree::from_str(document, &self.opts)
            .map_err(|e| LeafError::encode(format!("parse svg frame: {e}")))
    }

    /// Render `document` scaled to exactly `width × height` pixels.
    pub fn rasterize(&self, document: &str, width: u32, height: u32) -> LeafResult<RasterFrame> {
        let tree = self.parse(document)?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| LeafError::encode("failed to allocate svg pixmap"))?;

        let sx = (width as f32) / tree.size().width();
        let sy = (height as f32) / tree.size().height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

        resvg::render(&tree, xform, &mut pixmap.as_mut());
        Ok(RasterFrame {
            width,
            height,
            data: pixmap.take(),
        })
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc") {
            let _ = db.load_font_file(&path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/raster.rs"]
mod tests;
