use crate::fetch::query::PageQuery;
use crate::fetch::transport::Transport;
use crate::foundation::error::{LeafError, LeafResult};
use crate::foundation::math::ceil_div;
use crate::scene::record::{ObservationRecord, PhotoRecord};
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Photo size variants served by the API. URLs come back as `.../square.jpg`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PhotoSize {
    Square,
    Small,
    #[default]
    Medium,
    Large,
    Original,
}

impl PhotoSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Original => "original",
        }
    }

    /// Derive this variant's URL from the square-thumbnail URL.
    pub fn photo_url(self, square_url: &str) -> String {
        square_url.replace("square", self.as_str())
    }
}

impl fmt::Display for PhotoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoSize {
    type Err = LeafError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "original" => Ok(Self::Original),
            _ => Err(LeafError::config(format!(
                "unknown photo size \"{s}\" (square, small, medium, large, original)"
            ))),
        }
    }
}

#[derive(serde::Deserialize)]
struct PageHeader {
    total_results: u64,
}

#[derive(serde::Deserialize)]
struct Page {
    #[serde(default)]
    results: Vec<ObservationRecord>,
}

/// Counters from [`ObservationFetcher::download_photos`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub photos: usize,
    pub bytes: u64,
}

/// Paginated observation client.
pub struct ObservationFetcher<T: Transport> {
    transport: T,
}

impl<T: Transport> ObservationFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch every result of `query_url`, one request per page.
    ///
    /// The URL must carry `page` and `per_page`; that is checked before any request goes out.
    #[tracing::instrument(skip(self))]
    pub fn fetch(&self, query_url: &str) -> LeafResult<Vec<ObservationRecord>> {
        let query = PageQuery::parse(query_url)?;

        tracing::info!("requesting total result count");
        let header: PageHeader = self.get_json(query.url())?;
        let pages = ceil_div(header.total_results, u64::from(query.per_page()));
        tracing::info!(
            total_results = header.total_results,
            pages,
            "paging through results"
        );

        let mut all = Vec::new();
        for p in 1..=pages {
            let p = u32::try_from(p)
                .map_err(|_| LeafError::config(format!("page {p} out of range")))?;
            let url = query.with_page(p)?;
            let page: Page = self.get_json(&url)?;
            tracing::debug!(page = p, results = page.results.len(), "fetched page");
            all.extend(page.results);
        }
        Ok(all)
    }

    /// Save every photo of every record as `<folder>/<photo id>.jpg`.
    #[tracing::instrument(skip(self, records), fields(records = records.len()))]
    pub fn download_photos(
        &self,
        records: &[ObservationRecord],
        folder: &Path,
        size: PhotoSize,
    ) -> LeafResult<DownloadStats> {
        let mut stats = DownloadStats::default();
        for photo in records.iter().flat_map(|r| r.photos.iter()) {
            let url = Url::parse(&size.photo_url(&photo.url))
                .map_err(|e| LeafError::http(format!("photo {}: bad url: {e}", photo.id)))?;
            let bytes = self.transport.get(&url)?;
            let path = photo_path(folder, photo);
            std::fs::write(&path, &bytes).map_err(|e| LeafError::io_at(&path, e))?;
            tracing::debug!(photo = photo.id, bytes = bytes.len(), "saved photo");
            stats.photos += 1;
            stats.bytes += bytes.len() as u64;
        }
        tracing::info!(photos = stats.photos, bytes = stats.bytes, "download finished");
        Ok(stats)
    }

    fn get_json<D: serde::de::DeserializeOwned>(&self, url: &Url) -> LeafResult<D> {
        let body = self.transport.get(url)?;
        serde_json::from_slice(&body)
            .map_err(|e| LeafError::serde(format!("decode response of {url}: {e}")))
    }
}

/// Where [`ObservationFetcher::download_photos`] stores `photo`.
pub fn photo_path(folder: &Path, photo: &PhotoRecord) -> PathBuf {
    folder.join(format!("{}.jpg", photo.id))
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/client.rs"]
mod tests;
