use crate::fetch::client::photo_path;
use crate::foundation::error::{LeafError, LeafResult};
use crate::scene::observation::{Observation, ObservationSet};
use crate::scene::record::ObservationRecord;
use crate::vision::color::{leaf_color, load_rgb};
use crate::vision::crop::LeafBox;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Leaf boxes keyed by photo id.
pub type LeafBoxes = HashMap<u64, LeafBox>;

/// Load a `{ "<photo id>": {x, y, width, height} }` file.
pub fn read_leaf_boxes(path: impl AsRef<Path>) -> LeafResult<LeafBoxes> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        LeafError::validation(format!("open leaf boxes JSON '{}': {e}", path.display()))
    })?;
    let raw: HashMap<String, LeafBox> = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
        LeafError::validation(format!("parse leaf boxes JSON '{}': {e}", path.display()))
    })?;
    raw.into_iter()
        .map(|(k, v)| {
            k.parse::<u64>()
                .map(|id| (id, v))
                .map_err(|_| LeafError::validation(format!("leaf box key \"{k}\" is not a photo id")))
        })
        .collect()
}

/// How many records made it through [`colorize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorizeStats {
    pub colored: usize,
    pub skipped: usize,
}

/// Turn fetched records into renderer input by colouring each record's first photo.
///
/// Records without a date, a location, a photo, or a downloaded photo file are skipped. The
/// result is sorted chronologically.
#[tracing::instrument(skip(records, boxes), fields(records = records.len()))]
pub fn colorize(
    records: &[ObservationRecord],
    photo_dir: &Path,
    boxes: &LeafBoxes,
) -> LeafResult<(ObservationSet, ColorizeStats)> {
    let mut stats = ColorizeStats::default();
    let mut out = Vec::with_capacity(records.len());

    for rec in records {
        let (Some(observed_on), Some(location)) = (rec.observed_date()?, rec.lat_lon()?) else {
            tracing::warn!(id = rec.id, "missing date or location; skipped");
            stats.skipped += 1;
            continue;
        };
        let Some(photo) = rec.photos.first() else {
            tracing::warn!(id = rec.id, "no photos; skipped");
            stats.skipped += 1;
            continue;
        };
        let path = photo_path(photo_dir, photo);
        if !path.is_file() {
            tracing::warn!(id = rec.id, path = %path.display(), "photo not downloaded; skipped");
            stats.skipped += 1;
            continue;
        }

        let img = load_rgb(&path)?;
        let color = leaf_color(&img, boxes.get(&photo.id))?;
        tracing::debug!(id = rec.id, ?color, "coloured");
        out.push(Observation::new(rec.id, location, observed_on, color));
        stats.colored += 1;
    }

    let mut set = ObservationSet::new(out);
    set.sort_chronological();
    tracing::info!(colored = stats.colored, skipped = stats.skipped, "colorize finished");
    Ok((set, stats))
}

#[cfg(test)]
#[path = "../tests/unit/colorize.rs"]
mod tests;
