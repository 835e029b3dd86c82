//! Conversion strategies: source image file -> canonical image file
//!
//! Each strategy is self-contained and reports failure instead of
//! panicking; the materializer tries them in order until one succeeds.

use crate::artwork::types::CanonicalSpec;
use crate::error::{CoverError, CoverResult};
use crate::util::have_cmd;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage};
use std::ffi::OsStr;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Common contract for every conversion technique
pub trait ConvertStrategy {
    fn name(&self) -> &'static str;

    /// Write a canonical image derived from `src` to `dst`.
    /// Returns the path actually written.
    fn convert(&self, src: &Path, dst: &Path, spec: &CanonicalSpec) -> CoverResult<PathBuf>;
}

/// Ordered strategy list: in-process, ImageMagick, ffmpeg, re-encode copy
pub fn default_strategies() -> Vec<Box<dyn ConvertStrategy>> {
    vec![
        Box::new(InProcessResize),
        Box::new(ImageMagickResize),
        Box::new(FfmpegScale),
        Box::new(ReencodeCopy),
    ]
}

fn write_output(dst: &Path, bytes: &[u8]) -> CoverResult<()> {
    std::fs::write(dst, bytes).map_err(|source| CoverError::Write {
        path: dst.to_path_buf(),
        source,
    })
}

/// Only RGB and RGBA are encoded as-is; anything else is flattened to RGB
fn normalize_color(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::Rgb8 | ColorType::Rgba8 => img,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

fn encode(img: &DynamicImage, spec: &CanonicalSpec) -> CoverResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), spec.format)?;
    Ok(buf)
}

/// Decode with the `image` crate and resize with a bicubic filter
pub struct InProcessResize;

impl ConvertStrategy for InProcessResize {
    fn name(&self) -> &'static str {
        "image"
    }

    fn convert(&self, src: &Path, dst: &Path, spec: &CanonicalSpec) -> CoverResult<PathBuf> {
        let img = normalize_color(image::open(src)?);
        let resized = img.resize_exact(spec.width, spec.height, FilterType::CatmullRom);
        write_output(dst, &encode(&resized, spec)?)?;
        Ok(dst.to_path_buf())
    }
}

/// Run a tool to completion, killing it at the spec's deadline
fn run_tool(tool: &'static str, args: &[&OsStr], spec: &CanonicalSpec) -> CoverResult<()> {
    if !have_cmd(tool) {
        return Err(CoverError::ToolUnavailable(tool));
    }

    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let secs = spec.tool_timeout_secs.max(1);
    match child.wait_timeout(Duration::from_secs(secs))? {
        Some(status) if status.success() => Ok(()),
        Some(status) => Err(CoverError::Decode(format!("{} exited with {}", tool, status))),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(CoverError::Timeout { tool, secs })
        }
    }
}

/// External tools choose the encoder from the output extension. When `dst`
/// carries a different extension the result is renamed to the canonical one.
fn finish_tool_output(tool: &'static str, dst: &Path, spec: &CanonicalSpec) -> CoverResult<PathBuf> {
    let written = std::fs::metadata(dst).map(|m| m.len()).unwrap_or(0);
    if written == 0 {
        return Err(CoverError::Decode(format!("{} produced no output", tool)));
    }

    let canonical_ext = spec.extension();
    let matches = dst
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(canonical_ext));
    if matches {
        return Ok(dst.to_path_buf());
    }

    let renamed = dst.with_extension(canonical_ext);
    std::fs::rename(dst, &renamed).map_err(|source| CoverError::Write {
        path: renamed.clone(),
        source,
    })?;
    Ok(renamed)
}

/// ImageMagick forced resize (`WxH!` ignores aspect ratio)
pub struct ImageMagickResize;

impl ImageMagickResize {
    fn tool() -> &'static str {
        if have_cmd("magick") { "magick" } else { "convert" }
    }
}

impl ConvertStrategy for ImageMagickResize {
    fn name(&self) -> &'static str {
        "imagemagick"
    }

    fn convert(&self, src: &Path, dst: &Path, spec: &CanonicalSpec) -> CoverResult<PathBuf> {
        let tool = Self::tool();
        let geometry = format!("{}x{}!", spec.width, spec.height);
        run_tool(
            tool,
            &[
                src.as_os_str(),
                OsStr::new("-resize"),
                OsStr::new(&geometry),
                dst.as_os_str(),
            ],
            spec,
        )?;
        finish_tool_output(tool, dst, spec)
    }
}

/// ffmpeg with an exact scale filter
pub struct FfmpegScale;

impl ConvertStrategy for FfmpegScale {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn convert(&self, src: &Path, dst: &Path, spec: &CanonicalSpec) -> CoverResult<PathBuf> {
        let filter = format!("scale={}:{}", spec.width, spec.height);
        run_tool(
            "ffmpeg",
            &[
                OsStr::new("-y"),
                OsStr::new("-loglevel"),
                OsStr::new("error"),
                OsStr::new("-i"),
                src.as_os_str(),
                OsStr::new("-vf"),
                OsStr::new(&filter),
                dst.as_os_str(),
            ],
            spec,
        )?;
        finish_tool_output("ffmpeg", dst, spec)
    }
}

/// Last resort: copy the source aside, decode it and re-encode it in the
/// canonical format without resizing
pub struct ReencodeCopy;

impl ConvertStrategy for ReencodeCopy {
    fn name(&self) -> &'static str {
        "reencode"
    }

    fn convert(&self, src: &Path, dst: &Path, spec: &CanonicalSpec) -> CoverResult<PathBuf> {
        let suffix = src
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let copy = tempfile::Builder::new()
            .prefix("img_")
            .suffix(&suffix)
            .tempfile()?;
        std::fs::copy(src, copy.path())?;

        let img = normalize_color(image::open(copy.path())?);
        write_output(dst, &encode(&img, spec)?)?;
        Ok(dst.to_path_buf())
    }
}
