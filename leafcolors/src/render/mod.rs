//! Per-day map frames.

use crate::encode::sink::SvgDirSink;
use crate::foundation::error::LeafResult;
use crate::scene::observation::Observation;
use std::path::Path;

/// Active set, renderer and frame types.
pub mod frames;
/// Lat/lon to map-space projection.
pub mod projection;
/// SVG templates and element writers.
pub mod svg;

pub use frames::{FrameRenderer, RenderOpts, RenderStats};

/// Write `<output_folder>/<YYYY-MM-DD>.svg` for every day from the first to the last observation,
/// using the default map layout and the bundled templates.
///
/// `output_folder` must already exist.
pub fn render_frames(observations: &[Observation], output_folder: impl AsRef<Path>) -> LeafResult<()> {
    render_frames_with(observations, output_folder, RenderOpts::default()).map(|_| ())
}

/// [`render_frames`] with explicit options, returning the run counters.
pub fn render_frames_with(
    observations: &[Observation],
    output_folder: impl AsRef<Path>,
    opts: RenderOpts,
) -> LeafResult<RenderStats> {
    let mut sink = SvgDirSink::new(output_folder.as_ref());
    FrameRenderer::new(opts).render(observations, &mut sink)
}
