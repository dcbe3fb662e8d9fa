/// Colourized observations consumed by the renderer.
pub mod observation;
/// Filtered API records produced by the fetcher.
pub mod record;
