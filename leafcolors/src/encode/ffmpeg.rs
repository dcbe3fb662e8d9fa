use crate::encode::raster::{SvgRasterizer, raster_size};
use crate::encode::sink::{DateOrder, FrameSink, SinkConfig};
use crate::foundation::core::Rgb8;
use crate::foundation::error::{LeafError, LeafResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frames::SvgFrame;
use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 path; missing parent directories are created.
    pub out_path: PathBuf,
    /// Replace `out_path` if it exists.
    pub overwrite: bool,
    /// Days shown per second of video.
    pub fps: u32,
    /// Video width in pixels. Height follows the map aspect ratio.
    pub width: u32,
    /// Colour behind transparent parts of the map.
    pub background: Rgb8,
    /// Extra fonts for the date label.
    pub font_dir: Option<PathBuf>,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            fps: 10,
            width: 1000,
            background: Rgb8::new(255, 255, 255),
            font_dir: None,
        }
    }
}

/// A running `ffmpeg` child reading raw RGBA from stdin.
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    rasterizer: SvgRasterizer,
    size: (u32, u32),
    rgba: Vec<u8>,
}

impl Encoder {
    fn spawn(opts: &FfmpegSinkOpts, size: (u32, u32)) -> LeafResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(opts, size))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LeafError::encode(format!("spawn ffmpeg: {e}")))?;

        let stdin = child.stdin.take();
        // ffmpeg blocks once its stderr pipe fills, so drain it off-thread
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf).map(|_| buf)
            })
        });
        if stdin.is_none() {
            return Err(LeafError::encode("ffmpeg stdin was not captured"));
        }

        Ok(Self {
            child,
            stdin,
            stderr,
            rasterizer: SvgRasterizer::new(opts.font_dir.as_deref()),
            size,
            rgba: Vec::new(),
        })
    }

    fn write(&mut self, frame: &SvgFrame, background: Rgb8) -> LeafResult<()> {
        let (w, h) = self.size;
        let raster = self.rasterizer.rasterize(&frame.document, w, h)?;
        self.rgba.resize(raster.data.len(), 0);
        flatten_onto(&mut self.rgba, &raster.data, background)?;

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| LeafError::encode("ffmpeg input already closed"))?;
        stdin
            .write_all(&self.rgba)
            .map_err(|e| LeafError::encode(format!("frame {}: write to ffmpeg: {e}", frame.date)))
    }

    fn finish(mut self) -> LeafResult<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| LeafError::encode(format!("wait for ffmpeg: {e}")))?;
        let log = match self.stderr.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| LeafError::encode("ffmpeg stderr reader panicked"))?
                .map_err(|e| LeafError::encode(format!("read ffmpeg stderr: {e}")))?,
            None => Vec::new(),
        };
        if status.success() {
            return Ok(());
        }
        Err(LeafError::encode(format!(
            "ffmpeg failed ({status}): {}",
            String::from_utf8_lossy(&log).trim()
        )))
    }
}

/// Encodes frames into an MP4 by rasterizing each SVG and piping it to the system `ffmpeg`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    order: DateOrder,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            order: DateOrder::default(),
        }
    }

    pub fn opts(&self) -> &FfmpegSinkOpts {
        &self.opts
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LeafResult<()> {
        if self.opts.fps == 0 {
            return Err(LeafError::validation("video fps must be at least 1"));
        }
        let size = raster_size(cfg.map_width, cfg.map_height, self.opts.width)?;

        let out = &self.opts.out_path;
        if !self.opts.overwrite && out.exists() {
            return Err(LeafError::validation(format!(
                "'{}' exists and overwrite is off",
                out.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(LeafError::validation(
                "MP4 output needs `ffmpeg` on PATH, which was not found",
            ));
        }
        ensure_parent_dir(out)?;

        tracing::info!(
            out = %out.display(),
            width = size.0,
            height = size.1,
            fps = self.opts.fps,
            days = cfg.span.len_days(),
            "starting video encode"
        );
        self.encoder = Some(Encoder::spawn(&self.opts, size)?);
        self.order.start(cfg.span);
        Ok(())
    }

    fn push_frame(&mut self, frame: &SvgFrame) -> LeafResult<()> {
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| LeafError::encode("video sink used before begin"))?;
        self.order.advance(frame.date)?;
        encoder.write(frame, self.opts.background)
    }

    fn end(&mut self) -> LeafResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| LeafError::encode("video sink ended before begin"))?;
        encoder.finish()?;
        tracing::info!(out = %self.opts.out_path.display(), "video written");
        Ok(())
    }
}

/// Command line for a raw-RGBA-in, H.264-out encode of `size` frames.
fn ffmpeg_args(opts: &FfmpegSinkOpts, size: (u32, u32)) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        if opts.overwrite { "-y" } else { "-n" },
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push("-s".into());
    args.push(format!("{}x{}", size.0, size.1).into());
    args.push("-r".into());
    args.push(opts.fps.to_string().into());
    args.extend(
        [
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(OsString::from),
    );
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Composite premultiplied RGBA over an opaque background; every output pixel has alpha 255.
fn flatten_onto(dst: &mut [u8], premul: &[u8], background: Rgb8) -> LeafResult<()> {
    if dst.len() != premul.len() || !dst.len().is_multiple_of(4) {
        return Err(LeafError::encode(format!(
            "rgba buffers differ in length ({} vs {})",
            dst.len(),
            premul.len()
        )));
    }
    let bg = background.to_array().map(u16::from);
    for (out, px) in dst.chunks_exact_mut(4).zip(premul.chunks_exact(4)) {
        let keep = 255 - u16::from(px[3]);
        for c in 0..3 {
            out[c] = (u16::from(px[c]) + mul_div255_u16(bg[c], keep)).min(255) as u8;
        }
        out[3] = 255;
    }
    Ok(())
}

/// Create `path`'s parent directory when it has one.
pub fn ensure_parent_dir(path: &Path) -> LeafResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| LeafError::io_at(dir, e))
        }
        _ => Ok(()),
    }
}

/// Whether `ffmpeg -version` runs.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
