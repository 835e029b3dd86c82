//! Artwork module type definitions

use image::ImageFormat;

/// Canonical cover size used by Sunshine's app grid
pub const COVER_WIDTH: u32 = 600;
pub const COVER_HEIGHT: u32 = 900;

/// Anything smaller is treated as a corrupt or placeholder payload
pub const MIN_IMAGE_BYTES: u64 = 1024;

/// Target format, size and limits for materialized images
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalSpec {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub min_bytes: u64,
    pub fetch_timeout_secs: u64,
    /// Deadline for external conversion tools before they are killed
    pub tool_timeout_secs: u64,
}

impl Default for CanonicalSpec {
    fn default() -> Self {
        CanonicalSpec {
            width: COVER_WIDTH,
            height: COVER_HEIGHT,
            format: ImageFormat::Png,
            min_bytes: MIN_IMAGE_BYTES,
            fetch_timeout_secs: 20,
            tool_timeout_secs: 60,
        }
    }
}

impl CanonicalSpec {
    /// File extension of the canonical format, without the dot
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("png")
    }
}

/// Where image bytes come from
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    Remote(String),
    Local(std::path::PathBuf),
}
