//! Check whether an image file already satisfies the canonical spec

use crate::artwork::types::CanonicalSpec;
use image::ImageReader;
use std::path::Path;

/// Large enough, decodable header in the canonical format, canonical size
pub fn is_canonical(path: &Path, spec: &CanonicalSpec) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() || meta.len() <= spec.min_bytes {
        return false;
    }

    let Ok(reader) = ImageReader::open(path).and_then(|r| r.with_guessed_format()) else {
        return false;
    };
    if reader.format() != Some(spec.format) {
        return false;
    }

    reader
        .into_dimensions()
        .is_ok_and(|dims| dims == (spec.width, spec.height))
}
