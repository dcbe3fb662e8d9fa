use crate::foundation::core::{LatLon, ObservationId, Rgb8};
use crate::foundation::error::{LeafError, LeafResult};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

/// A colourized sighting, the unit the frame renderer consumes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Observation {
    pub id: ObservationId,
    /// `[lat, lon]` in degrees.
    pub location: LatLon,
    /// Calendar day of the sighting (`YYYY-MM-DD`).
    pub observed_on: NaiveDate,
    /// Dominant leaf colour.
    pub color: Rgb8,
}

impl Observation {
    pub fn new(
        id: impl Into<ObservationId>,
        location: LatLon,
        observed_on: NaiveDate,
        color: Rgb8,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            observed_on,
            color,
        }
    }
}

/// Ordered collection of observations as stored in the observations JSON file.
///
/// Loading never reorders; call [`ObservationSet::sort_chronological`] (the renderer does) to
/// get earliest-first order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationSet {
    items: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(items: Vec<Observation>) -> Self {
        Self { items }
    }

    /// Parse a JSON array of observations.
    pub fn from_reader<R: std::io::Read>(r: R) -> LeafResult<Self> {
        let items: Vec<Observation> = serde_json::from_reader(r)
            .map_err(|e| LeafError::validation(format!("parse observations JSON: {e}")))?;
        Ok(Self { items })
    }

    /// Parse a JSON array of observations from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LeafResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LeafError::validation(format!("open observations JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
            .map_err(|e| LeafError::validation(format!("'{}': {e}", path.display())))
    }

    /// Write the set as pretty-printed JSON.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> LeafResult<()> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| LeafError::io_at(path, e))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, &self.items)
            .map_err(|e| LeafError::serde(format!("write '{}': {e}", path.display())))?;
        w.flush().map_err(|e| LeafError::io_at(path, e))
    }

    /// Stable sort by `observed_on`; same-day observations keep their relative order.
    pub fn sort_chronological(&mut self) {
        self.items.sort_by_key(|o| o.observed_on);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Observation> {
        self.items
    }
}

impl From<Vec<Observation>> for ObservationSet {
    fn from(items: Vec<Observation>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/observation.rs"]
mod tests;
