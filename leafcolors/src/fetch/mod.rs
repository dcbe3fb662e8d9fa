//! Paginated observation API client and photo downloader.

/// Fetcher and photo download.
pub mod client;
/// Page-parameter handling for query URLs.
pub mod query;
/// HTTP transport seam.
pub mod transport;
