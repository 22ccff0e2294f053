//! Client-side compression.
//!
//! Large photos are downscaled to fit 1920x1080 and re-encoded as JPEG before
//! they leave the machine. Compression is an optimization only: any decode or
//! encode failure hands back the original file.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use savanna_core::constants::{
    COMPRESS_JPEG_QUALITY, COMPRESS_MAX_HEIGHT, COMPRESS_MAX_WIDTH, COMPRESS_THRESHOLD_BYTES,
};

use crate::file::PendingFile;

/// Compresses `file` if it is at least 1 MiB. Never fails.
pub async fn compress(file: PendingFile) -> PendingFile {
    if (file.bytes.len() as u64) < COMPRESS_THRESHOLD_BYTES {
        return file;
    }

    let data = file.bytes.clone();
    let encoded = tokio::task::spawn_blocking(move || reencode(&data)).await;

    match encoded {
        Ok(Ok(bytes)) => {
            tracing::debug!(
                file = %file.name,
                before = file.bytes.len(),
                after = bytes.len(),
                "Compressed image"
            );
            PendingFile {
                name: jpeg_name(&file.name),
                declared_size: bytes.len() as u64,
                bytes,
                content_type: Some("image/jpeg".to_string()),
            }
        }
        Ok(Err(e)) => {
            tracing::warn!(file = %file.name, error = %e, "Compression failed, uploading original");
            file
        }
        Err(e) => {
            tracing::warn!(file = %file.name, error = %e, "Compression task failed, uploading original");
            file
        }
    }
}

/// Decodes, fits into the bounding box and re-encodes as JPEG.
pub fn reencode(data: &[u8]) -> Result<Bytes, anyhow::Error> {
    let img = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;

    let (width, height) = img.dimensions();
    let (target_width, target_height) =
        fit_within(width, height, COMPRESS_MAX_WIDTH, COMPRESS_MAX_HEIGHT);
    let img = if (target_width, target_height) != (width, height) {
        img.resize_exact(target_width, target_height, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Vec::with_capacity(data.len() / 2);
    let encoder = JpegEncoder::new_with_quality(&mut buffer, COMPRESS_JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;

    Ok(Bytes::from(buffer))
}

/// Largest size with the same aspect ratio that fits `max_width` x `max_height`.
/// Images already inside the box are left alone.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let scaled = |v: u32, max: u32| ((v as f64 * scale).round() as u32).clamp(1, max);
    (scaled(width, max_width), scaled(height, max_height))
}

fn jpeg_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{}.jpg", stem),
        _ => format!("{}.jpg", name),
    }
}
