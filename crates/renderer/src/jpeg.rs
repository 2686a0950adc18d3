//! JPEG encoding and frame file output.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};
use tracing::debug;

use crate::error::{RenderError, RenderResult};

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Distinguishes concurrent writers of the same frame name.
static PARTIAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Encode an RGB image as baseline JPEG at `quality` (1-100).
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> RenderResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(RenderError::invalid_parameter(format!(
            "JPEG quality must be 1-100, got {}",
            quality
        )));
    }

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)?;
    Ok(buf)
}

/// Encode and write a JPEG, replacing any existing file at `path`.
///
/// The bytes go to a sibling temporary file first and are renamed into place,
/// so a reader never sees a partially written frame.
pub fn write_jpeg(path: &Path, img: &RgbImage, quality: u8) -> RenderResult<()> {
    let bytes = encode_jpeg(img, quality)?;
    let temp = partial_path(path);

    std::fs::write(&temp, &bytes)?;
    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(e.into());
    }

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote JPEG");
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let n = PARTIAL_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}-{}.partial", name, std::process::id(), n))
}
