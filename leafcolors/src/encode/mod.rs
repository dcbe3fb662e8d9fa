//! Frame sinks: where rendered days go.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// SVG rasterization with resvg.
pub mod raster;
/// Sink trait and built-in sinks.
pub mod sink;
