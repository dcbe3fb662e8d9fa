use crate::foundation::core::{ObservationId, Opacity, Point, Rgb8};
use crate::foundation::error::{LeafError, LeafResult};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;

const BUILTIN_STARTER: &str = include_str!("../../assets/starter.svg");
const BUILTIN_ENDER: &str = include_str!("../../assets/ender.svg");

/// Static frame boilerplate: everything before the markers and everything after the date label.
///
/// Both halves are emitted verbatim into every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgTemplate {
    header: String,
    footer: String,
}

impl Default for SvgTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SvgTemplate {
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            footer: footer.into(),
        }
    }

    /// Bundled world graticule header and legend footer.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_STARTER, BUILTIN_ENDER)
    }

    /// Read `starter` (header) and `ender` (footer) from disk.
    pub fn from_paths(starter: impl AsRef<Path>, ender: impl AsRef<Path>) -> LeafResult<Self> {
        fn read(path: &Path) -> LeafResult<String> {
            std::fs::read_to_string(path).map_err(|e| LeafError::io_at(path, e))
        }
        Ok(Self::new(read(starter.as_ref())?, read(ender.as_ref())?))
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }
}

/// Append one observation marker.
pub(crate) fn write_circle(
    out: &mut String,
    id: &ObservationId,
    center: Point,
    radius: f64,
    color: Rgb8,
    opacity: Opacity,
) {
    let rgb = format!("{}, {}, {}", color.r, color.g, color.b);
    let _ = writeln!(
        out,
        "<circle style=\"fill:rgb({rgb});fill-opacity:1;stroke:rgb({rgb});stroke-width:0.71433073;\
         stroke-linecap:square;stroke-linejoin:miter;stroke-miterlimit:4;stroke-dasharray:none;\
         stroke-opacity:1;opacity:{opacity}\" id=\"{id}\" cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" />",
        id = escape_attr(&id.to_string()),
        cx = center.x,
        cy = center.y,
    );
}

/// Append the frame's date stamp.
pub(crate) fn write_date_label(out: &mut String, date: NaiveDate, origin: Point) {
    let _ = write!(
        out,
        "<text xml:space=\"preserve\" style=\"font-style:normal;font-weight:normal;font-size:24px;\
         line-height:1.25;font-family:sans-serif;letter-spacing:0px;word-spacing:0px;fill:#000000;\
         fill-opacity:1;stroke:none\" x=\"{x}\" y=\"{y}\" id=\"date-label\"><tspan x=\"{x}\" \
         y=\"{y}\">{date}</tspan></text>\n",
        x = origin.x,
        y = origin.y,
        date = date.format("%Y-%m-%d"),
    );
}

fn escape_attr(s: &str) -> std::borrow::Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return std::borrow::Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    std::borrow::Cow::Owned(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
