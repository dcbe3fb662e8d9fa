use crate::foundation::error::{LeafError, LeafResult};
use chrono::NaiveDate;
use std::fmt;

pub use kurbo::Point;

/// Observation identifier as issued by the upstream API (integer or string).
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ObservationId {
    /// Numeric id.
    Int(u64),
    /// Opaque string id.
    Str(String),
}

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ObservationId {
    fn from(v: u64) -> Self {
        Self::Int(v)
    }
}

/// Geographic position in degrees. Serialized as `[lat, lon]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLon {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parse the API's `"lat,lon"` string form.
    pub fn parse_pair(s: &str) -> LeafResult<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| LeafError::validation(format!("location \"{s}\" is not \"lat,lon\"")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| LeafError::validation(format!("location \"{s}\": {e}")))
        };
        Ok(Self::new(parse(lat)?, parse(lon)?))
    }
}

impl From<[f64; 2]> for LatLon {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(v: LatLon) -> Self {
        [v.lat, v.lon]
    }
}

/// Straight 8-bit RGB color. Serialized as `[r, g, b]`.
///
/// Deserialization also accepts float channels (rounded and clamped) and a trailing fourth
/// element, which is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[u8; 3]")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Quantize a floating-point channel triple (0..=255 scale).
    pub fn from_f32_channels(c: [f32; 3]) -> Self {
        fn q(v: f32) -> u8 {
            v.round().clamp(0.0, 255.0) as u8
        }
        Self::new(q(c[0]), q(c[1]), q(c[2]))
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl TryFrom<Vec<f64>> for Rgb8 {
    type Error = String;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        if v.len() != 3 && v.len() != 4 {
            return Err(format!(
                "color must have 3 ([r,g,b]) or 4 elements, got {}",
                v.len()
            ));
        }
        if v[..3].iter().any(|c| !c.is_finite()) {
            return Err("color channels must be finite".to_owned());
        }
        Ok(Self::from_f32_channels([v[0] as f32, v[1] as f32, v[2] as f32]))
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        c.to_array()
    }
}

impl From<image::Rgb<u8>> for Rgb8 {
    fn from(p: image::Rgb<u8>) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

impl From<Rgb8> for image::Rgb<u8> {
    fn from(c: Rgb8) -> Self {
        image::Rgb(c.to_array())
    }
}

/// Marker opacity held in tenths so every rendered value is an exact one-decimal string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opacity(u8);

impl Opacity {
    /// Value assigned when an observation enters the active set; never rendered as-is.
    pub const UNRENDERED: Self = Self(11);
    /// Full opacity (first render).
    pub const FULL: Self = Self(10);
    /// Removal threshold: a marker that would fade to this value is dropped.
    pub const FLOOR: Self = Self(1);

    const STEP: u8 = 1;

    /// Build from a tenths count.
    pub fn from_tenths(t: u8) -> Self {
        Self(t)
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Step one frame forward. `None` means the marker is fully faded and leaves the active set.
    pub fn fade(self) -> Option<Self> {
        let next = Self(self.0.saturating_sub(Self::STEP));
        (next > Self::FLOOR).then_some(next)
    }
}

impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Whole calendar days from `start` to `end` (exclusive of `start`). Negative when `end` precedes
/// `start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Inclusive calendar-day range `[first, last]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayRange {
    /// First day (inclusive).
    pub first: NaiveDate,
    /// Last day (inclusive).
    pub last: NaiveDate,
}

impl DayRange {
    /// Create a validated range with `first <= last`.
    pub fn new(first: NaiveDate, last: NaiveDate) -> LeafResult<Self> {
        if first > last {
            return Err(LeafError::validation(format!(
                "day range start {first} is after end {last}"
            )));
        }
        Ok(Self { first, last })
    }

    /// Number of days in the range, always >= 1.
    pub fn len_days(self) -> u64 {
        days_between(self.first, self.last) as u64 + 1
    }

    /// Whether `d` falls within `[first, last]`.
    pub fn contains(self, d: NaiveDate) -> bool {
        self.first <= d && d <= self.last
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
