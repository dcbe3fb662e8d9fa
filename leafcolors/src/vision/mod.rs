//! Leaf colour extraction: cropping, foreground segmentation and dominant-colour clustering.

/// Dominant-colour extraction.
pub mod color;
/// Leaf bounding boxes.
pub mod crop;
/// Seeded Lloyd k-means over RGB samples.
pub mod kmeans;
/// Diagnostic montages.
pub mod montage;
/// Border-seeded foreground segmentation.
pub mod segment;
