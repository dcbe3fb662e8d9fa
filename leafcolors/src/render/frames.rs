use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{DayRange, ObservationId, Opacity, Point, days_between};
use crate::foundation::error::{LeafError, LeafResult};
use crate::render::projection::MapProjection;
use crate::render::svg::{SvgTemplate, write_circle, write_date_label};
use crate::scene::observation::Observation;
use chrono::{Days, NaiveDate};

/// Frame layout and styling.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOpts {
    pub projection: MapProjection,
    /// Marker circle radius in map units.
    pub marker_radius: f64,
    /// Baseline origin of the date label.
    pub label_origin: Point,
    pub template: SvgTemplate,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            projection: MapProjection::default(),
            marker_radius: 2.0,
            label_origin: Point::new(24.0, 878.0),
            template: SvgTemplate::builtin(),
        }
    }
}

/// One rendered day.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgFrame {
    pub date: NaiveDate,
    /// Visible markers in draw order.
    pub markers: Vec<RenderedMarker>,
    /// Complete SVG document.
    pub document: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMarker {
    pub id: ObservationId,
    pub center: Point,
    pub opacity: Opacity,
}

/// Counters from a [`FrameRenderer::render`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames pushed, carry-forward frames included.
    pub frames: u64,
    /// Frames for days without any new observation.
    pub carry_forward_frames: u64,
    pub observations: usize,
    /// Largest number of markers drawn in a single frame.
    pub peak_active: usize,
}

#[derive(Clone, Copy, Debug)]
struct Marker<'a> {
    obs: &'a Observation,
    opacity: Opacity,
}

/// Observations still visible as of the current frame, in admission order.
#[derive(Clone, Debug, Default)]
pub struct ActiveSet<'a> {
    markers: Vec<Marker<'a>>,
}

impl<'a> ActiveSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a day's observations behind the existing markers. New markers start unrendered.
    pub fn admit(&mut self, batch: impl IntoIterator<Item = &'a Observation>) {
        self.markers.extend(batch.into_iter().map(|obs| Marker {
            obs,
            opacity: Opacity::UNRENDERED,
        }));
    }

    /// Fade every marker by one step, rebuilding the set without the ones that fully faded.
    ///
    /// Returns the survivors with the opacity to draw them at, in admission order.
    pub fn fade(&mut self) -> Vec<(&'a Observation, Opacity)> {
        let mut visible = Vec::with_capacity(self.markers.len());
        self.markers = std::mem::take(&mut self.markers)
            .into_iter()
            .filter_map(|m| {
                let opacity = m.opacity.fade()?;
                visible.push((m.obs, opacity));
                Some(Marker { obs: m.obs, opacity })
            })
            .collect();
        visible
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Turns dated observations into one fading map frame per calendar day.
#[derive(Clone, Debug, Default)]
pub struct FrameRenderer {
    opts: RenderOpts,
}

impl FrameRenderer {
    pub fn new(opts: RenderOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Render every day from the earliest to the latest `observed_on` into `sink`.
    ///
    /// Observations are stably sorted by date first. Days without observations still get a frame
    /// showing the fading remainder.
    #[tracing::instrument(skip_all, fields(observations = observations.len()))]
    pub fn render(
        &self,
        observations: &[Observation],
        sink: &mut dyn FrameSink,
    ) -> LeafResult<RenderStats> {
        let mut ordered: Vec<&Observation> = observations.iter().collect();
        ordered.sort_by_key(|o| o.observed_on);

        let (Some(first), Some(last)) = (ordered.first(), ordered.last()) else {
            return Err(LeafError::validation("no observations to render"));
        };
        let span = DayRange::new(first.observed_on, last.observed_on)?;
        if let Some(bad) = ordered
            .iter()
            .find(|o| self.opts.projection.try_project(o.location).is_none())
        {
            return Err(LeafError::validation(format!(
                "observation {}: location ({}, {}) has no map position",
                bad.id, bad.location.lat, bad.location.lon
            )));
        }

        sink.begin(SinkConfig {
            span,
            map_width: self.opts.projection.width,
            map_height: self.opts.projection.height,
        })?;

        let mut stats = RenderStats {
            observations: ordered.len(),
            ..RenderStats::default()
        };
        let mut active = ActiveSet::new();
        let mut pending: Vec<&Observation> = Vec::new();
        let mut today = span.first;

        for obs in ordered {
            if obs.observed_on == today {
                pending.push(obs);
                continue;
            }

            let gap = days_between(today, obs.observed_on);
            active.admit(pending.drain(..));
            self.emit(&mut active, today, sink, &mut stats)?;
            for offset in 1..gap {
                let day = add_days(today, offset)?;
                self.emit(&mut active, day, sink, &mut stats)?;
                stats.carry_forward_frames += 1;
            }

            pending.push(obs);
            today = obs.observed_on;
        }

        active.admit(pending.drain(..));
        self.emit(&mut active, today, sink, &mut stats)?;
        sink.end()?;

        tracing::info!(
            frames = stats.frames,
            carry_forward = stats.carry_forward_frames,
            peak_active = stats.peak_active,
            "rendered frames {}..={}",
            span.first,
            span.last
        );
        Ok(stats)
    }

    /// Fade `active` one step and compose the frame for `date`.
    pub fn render_one_frame(&self, active: &mut ActiveSet<'_>, date: NaiveDate) -> SvgFrame {
        let visible = active.fade();
        let template = &self.opts.template;

        let mut document = String::with_capacity(
            template.header().len() + template.footer().len() + visible.len() * 360 + 512,
        );
        document.push_str(template.header());

        let mut markers = Vec::with_capacity(visible.len());
        for (obs, opacity) in visible {
            let center = self.opts.projection.project(obs.location);
            write_circle(
                &mut document,
                &obs.id,
                center,
                self.opts.marker_radius,
                obs.color,
                opacity,
            );
            markers.push(RenderedMarker {
                id: obs.id.clone(),
                center,
                opacity,
            });
        }

        write_date_label(&mut document, date, self.opts.label_origin);
        document.push_str(template.footer());

        SvgFrame {
            date,
            markers,
            document,
        }
    }

    fn emit(
        &self,
        active: &mut ActiveSet<'_>,
        date: NaiveDate,
        sink: &mut dyn FrameSink,
        stats: &mut RenderStats,
    ) -> LeafResult<()> {
        let frame = self.render_one_frame(active, date);
        tracing::debug!(%date, markers = frame.markers.len(), "frame");
        stats.frames += 1;
        stats.peak_active = stats.peak_active.max(frame.markers.len());
        sink.push_frame(&frame)
    }
}

fn add_days(date: NaiveDate, n: i64) -> LeafResult<NaiveDate> {
    u64::try_from(n)
        .ok()
        .and_then(|n| date.checked_add_days(Days::new(n)))
        .ok_or_else(|| LeafError::validation(format!("date {date} + {n} days is out of range")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/frames.rs"]
mod tests;
