use crate::foundation::core::{LatLon, Point};
use std::f64::consts::PI;

/// Mercator-style projection onto a fixed-size map canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapProjection {
    /// Map width in SVG user units.
    pub width: f64,
    /// Map height in SVG user units.
    pub height: f64,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 902.0,
        }
    }
}

impl MapProjection {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn x(&self, lon: f64) -> f64 {
        (lon + 180.0) * (self.width / 360.0)
    }

    pub fn y(&self, lat: f64) -> f64 {
        let phi = lat * PI / 180.0;
        (self.height / 2.0) - (self.width * (PI / 4.0 + phi / 2.0).tan().ln() / (2.0 * PI))
    }

    pub fn project(&self, p: LatLon) -> Point {
        Point::new(self.x(p.lon), self.y(p.lat))
    }

    /// Like [`project`](Self::project), but `None` when the point has no finite map position
    /// (the south pole, latitudes beyond ±90°, or non-finite input).
    pub fn try_project(&self, p: LatLon) -> Option<Point> {
        let pt = self.project(p);
        (pt.x.is_finite() && pt.y.is_finite()).then_some(pt)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/projection.rs"]
mod tests;
