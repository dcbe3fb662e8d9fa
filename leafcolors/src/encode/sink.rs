use crate::foundation::core::DayRange;
use crate::foundation::error::{LeafError, LeafResult};
use crate::render::frames::SvgFrame;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkConfig {
    /// Days the render will cover, one frame each.
    pub span: DayRange,
    /// Map width in SVG user units.
    pub map_width: f64,
    /// Map height in SVG user units.
    pub map_height: f64,
}

/// Sink contract for consuming rendered frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing dates, one per calendar day
/// of `SinkConfig::span`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> LeafResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, frame: &SvgFrame) -> LeafResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> LeafResult<()>;
}

/// Rejects frames that do not move strictly forward in time or fall outside the configured span.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DateOrder {
    span: Option<DayRange>,
    last: Option<NaiveDate>,
}

impl DateOrder {
    pub(crate) fn advance(&mut self, date: NaiveDate) -> LeafResult<()> {
        if let Some(span) = self.span
            && !span.contains(date)
        {
            return Err(LeafError::validation(format!(
                "frame {date} lies outside {}..={}",
                span.first, span.last
            )));
        }
        if let Some(last) = self.last
            && date <= last
        {
            return Err(LeafError::validation(format!(
                "frame {date} pushed after {last}; frames must be strictly increasing"
            )));
        }
        self.last = Some(date);
        Ok(())
    }

    pub(crate) fn start(&mut self, span: DayRange) {
        self.span = Some(span);
        self.last = None;
    }
}

/// Writes each frame to `<dir>/<YYYY-MM-DD>.svg`.
#[derive(Debug)]
pub struct SvgDirSink {
    dir: PathBuf,
    order: DateOrder,
    written: Vec<PathBuf>,
}

impl SvgDirSink {
    /// The directory must already exist when the render begins.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            order: DateOrder::default(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.svg", date.format("%Y-%m-%d")))
    }
}

impl FrameSink for SvgDirSink {
    fn begin(&mut self, cfg: SinkConfig) -> LeafResult<()> {
        let meta = std::fs::metadata(&self.dir).map_err(|e| LeafError::io_at(&self.dir, e))?;
        if !meta.is_dir() {
            return Err(LeafError::io_at(
                &self.dir,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }
        if meta.permissions().readonly() {
            return Err(LeafError::io_at(
                &self.dir,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "directory is read-only"),
            ));
        }
        self.order.start(cfg.span);
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &SvgFrame) -> LeafResult<()> {
        self.order.advance(frame.date)?;
        let path = self.frame_path(frame.date);
        std::fs::write(&path, frame.document.as_bytes()).map_err(|e| LeafError::io_at(&path, e))?;
        tracing::debug!(path = %path.display(), markers = frame.markers.len(), "wrote frame");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> LeafResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    order: DateOrder,
    /// Frames in date order.
    pub(crate) frames: Vec<SvgFrame>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[SvgFrame] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LeafResult<()> {
        self.cfg = Some(cfg);
        self.order.start(cfg.span);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &SvgFrame) -> LeafResult<()> {
        self.order.advance(frame.date)?;
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> LeafResult<()> {
        Ok(())
    }
}

/// Forwards every call to each inner sink in order, stopping at the first error.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn FrameSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl FrameSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl FrameSink for FanoutSink {
    fn begin(&mut self, cfg: SinkConfig) -> LeafResult<()> {
        self.sinks.iter_mut().try_for_each(|s| s.begin(cfg))
    }

    fn push_frame(&mut self, frame: &SvgFrame) -> LeafResult<()> {
        self.sinks.iter_mut().try_for_each(|s| s.push_frame(frame))
    }

    fn end(&mut self) -> LeafResult<()> {
        self.sinks.iter_mut().try_for_each(|s| s.end())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
