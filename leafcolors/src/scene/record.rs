use crate::foundation::core::LatLon;
use crate::foundation::error::{LeafError, LeafResult};
use chrono::NaiveDate;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

/// The fields of an API observation result that the pipeline keeps.
///
/// Unknown fields in the API payload are dropped at deserialization, which is how page results
/// are filtered down to this subset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObservationRecord {
    pub id: u64,
    #[serde(default)]
    pub observed_on: Option<String>,
    #[serde(default)]
    pub observed_on_details: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_at_details: Option<Value>,
    #[serde(default)]
    pub geojson: Option<Value>,
    #[serde(default)]
    pub place_ids: Vec<u64>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    /// `"lat,lon"` as served by the API.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub place_guess: Option<String>,
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}

impl ObservationRecord {
    /// Parsed `observed_on`, `None` when absent. A present but malformed date is an error.
    pub fn observed_date(&self) -> LeafResult<Option<NaiveDate>> {
        self.observed_on
            .as_deref()
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
                    LeafError::validation(format!(
                        "observation {}: observed_on \"{s}\": {e}",
                        self.id
                    ))
                })
            })
            .transpose()
    }

    /// Parsed `location`, `None` when absent.
    pub fn lat_lon(&self) -> LeafResult<Option<LatLon>> {
        self.location.as_deref().map(LatLon::parse_pair).transpose()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoRecord {
    pub id: u64,
    /// Square-thumbnail URL; other sizes are derived from it.
    pub url: String,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub license_code: Option<String>,
}

/// Load a records file written by the fetcher.
pub fn read_records(path: impl AsRef<Path>) -> LeafResult<Vec<ObservationRecord>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        LeafError::validation(format!("open records JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| LeafError::validation(format!("parse records JSON '{}': {e}", path.display())))
}

/// Write records as pretty-printed JSON.
pub fn write_records(path: impl AsRef<Path>, records: &[ObservationRecord]) -> LeafResult<()> {
    let path = path.as_ref();
    let f = File::create(path).map_err(|e| LeafError::io_at(path, e))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, records)
        .map_err(|e| LeafError::serde(format!("write '{}': {e}", path.display())))?;
    w.flush().map_err(|e| LeafError::io_at(path, e))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/record.rs"]
mod tests;
