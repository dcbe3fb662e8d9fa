//! Leaf colour map frames.
//!
//! The pipeline runs in four stages, each usable on its own:
//!
//! - Fetch paginated observation records and their photos ([`ObservationFetcher`])
//! - Pick each leaf's dominant colour from its photo ([`colorize`], [`leaf_color`])
//! - Render one SVG map per calendar day with fading markers ([`FrameRenderer`], [`render_frames`])
//! - Optionally encode the frames to MP4 ([`FfmpegSink`])
#![forbid(unsafe_code)]

mod foundation;

/// Record-to-observation colouring.
pub mod colorize;
/// Frame sinks.
pub mod encode;
/// Observation API client.
pub mod fetch;
/// Per-day map rendering.
pub mod render;
/// Observation data model.
pub mod scene;
/// Image colour extraction.
pub mod vision;

pub use crate::foundation::core::{
    DayRange, LatLon, ObservationId, Opacity, Point, Rgb8, days_between,
};
pub use crate::foundation::error::{LeafError, LeafResult};

pub use crate::colorize::{ColorizeStats, LeafBoxes, colorize, read_leaf_boxes};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::raster::{RasterFrame, SvgRasterizer};
pub use crate::encode::sink::{FanoutSink, FrameSink, InMemorySink, SinkConfig, SvgDirSink};
pub use crate::fetch::client::{DownloadStats, ObservationFetcher, PhotoSize};
pub use crate::fetch::query::PageQuery;
pub use crate::fetch::transport::{HttpTransport, StaticTransport, Transport};
pub use crate::render::frames::{RenderedMarker, SvgFrame};
pub use crate::render::projection::MapProjection;
pub use crate::render::svg::SvgTemplate;
pub use crate::render::{FrameRenderer, RenderOpts, RenderStats, render_frames, render_frames_with};
pub use crate::scene::observation::{Observation, ObservationSet};
pub use crate::scene::record::{ObservationRecord, PhotoRecord, read_records, write_records};
pub use crate::vision::color::{dominant_color, leaf_color, load_rgb};
pub use crate::vision::crop::{LeafBox, crop_to_leaf};
pub use crate::vision::kmeans::{Clustering, KMeansOpts, kmeans};
pub use crate::vision::montage::segmentation_montage;
pub use crate::vision::segment::{SegmentOpts, segment_foreground};
