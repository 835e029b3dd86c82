//! Bring remote or local image bytes into a temporary file

use crate::artwork::types::{CanonicalSpec, ImageSource};
use crate::error::{CoverError, CoverResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::debug;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Classify a source string; relative paths and unknown schemes are rejected
pub fn parse_source(source: &str) -> Option<ImageSource> {
    let source = source.trim();
    let lower = source.to_ascii_lowercase();

    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(ImageSource::Remote(source.to_string()));
    }

    if lower.starts_with("file://") {
        let path = reqwest::Url::parse(source).ok()?.to_file_path().ok()?;
        return path.is_absolute().then_some(ImageSource::Local(path));
    }

    let path = PathBuf::from(source);
    path.is_absolute().then_some(ImageSource::Local(path))
}

/// ".ext" of the source, so external tools can sniff the input type
fn temp_suffix(source: &ImageSource) -> String {
    let path = match source {
        ImageSource::Remote(url) => reqwest::Url::parse(url)
            .map(|u| PathBuf::from(u.path()))
            .unwrap_or_default(),
        ImageSource::Local(path) => path.clone(),
    };
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 5)
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| ".img".to_string())
}

fn temp_file(suffix: &str) -> CoverResult<NamedTempFile> {
    Ok(tempfile::Builder::new()
        .prefix("sg_")
        .suffix(suffix)
        .tempfile()?)
}

fn check_size(len: u64, origin: &str, spec: &CanonicalSpec) -> CoverResult<()> {
    if len < spec.min_bytes {
        return Err(CoverError::Decode(format!(
            "{} is only {} bytes",
            origin, len
        )));
    }
    Ok(())
}

fn download(url: &str, spec: &CanonicalSpec, suffix: &str) -> CoverResult<NamedTempFile> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(spec.fetch_timeout_secs.max(1)))
        .user_agent(BROWSER_USER_AGENT)
        .build()?;

    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(CoverError::network(url, format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes()?;
    check_size(bytes.len() as u64, url, spec)?;

    let mut tmp = temp_file(suffix)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    debug!("Downloaded {} bytes from {}", bytes.len(), url);
    Ok(tmp)
}

fn copy_local(path: &Path, spec: &CanonicalSpec, suffix: &str) -> CoverResult<NamedTempFile> {
    let meta = std::fs::metadata(path)
        .map_err(|_| CoverError::NotFound(path.display().to_string()))?;
    if !meta.is_file() {
        return Err(CoverError::NotFound(path.display().to_string()));
    }
    check_size(meta.len(), &path.display().to_string(), spec)?;

    let tmp = temp_file(suffix)?;
    std::fs::copy(path, tmp.path())?;
    Ok(tmp)
}

/// Fetch `source` into a temporary file that is removed when dropped
pub fn fetch_to_temp(source: &str, spec: &CanonicalSpec) -> CoverResult<NamedTempFile> {
    let parsed = parse_source(source)
        .ok_or_else(|| CoverError::NotFound(format!("unsupported image source '{}'", source)))?;
    let suffix = temp_suffix(&parsed);

    match &parsed {
        ImageSource::Remote(url) => download(url, spec, &suffix),
        ImageSource::Local(path) => copy_local(path, spec, &suffix),
    }
}
