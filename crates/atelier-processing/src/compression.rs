//! Size-budgeted re-encoding.
//!
//! [`IterativeCompressor`] encodes the cropped image at decreasing quality and
//! dimensions until the output fits `target_max_bytes` or `max_attempts` is
//! reached. Each attempt starts from the same source image, so artifacts never
//! compound. Running out of attempts is not an error: the last candidate is
//! returned even when it is still over budget.

use std::borrow::Cow;
use std::time::Instant;

use atelier_core::{CompressionSettings, OutputFormat, ProcessedAsset};
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::UploadError;

/// What one encode attempt produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptReport {
    pub attempt: u32,
    pub quality: f32,
    pub max_dimension: u32,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
}

pub struct IterativeCompressor {
    settings: CompressionSettings,
}

impl IterativeCompressor {
    pub fn new(settings: CompressionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompressionSettings {
        &self.settings
    }

    pub fn compress(&self, img: &DynamicImage) -> Result<ProcessedAsset, UploadError> {
        self.compress_with(img, |_| {})
    }

    /// Run the compression loop, calling `on_attempt` after every encode.
    pub fn compress_with<F>(
        &self,
        img: &DynamicImage,
        mut on_attempt: F,
    ) -> Result<ProcessedAsset, UploadError>
    where
        F: FnMut(&AttemptReport),
    {
        let settings = &self.settings;
        let max_attempts = settings.max_attempts.max(1);
        let format = settings.output_format;
        let start = Instant::now();

        let mut attempt = 1;
        loop {
            let quality = settings.quality_for_attempt(attempt);
            let max_dimension = settings.max_dimension_for_attempt(attempt);

            let resized = fit_within(img, max_dimension);
            let (width, height) = resized.dimensions();
            let data = encode(&resized, format, quality)?;

            let report = AttemptReport {
                attempt,
                quality,
                max_dimension,
                width,
                height,
                size_bytes: data.len(),
            };
            on_attempt(&report);

            tracing::debug!(
                attempt = attempt,
                quality = quality,
                max_dimension = max_dimension,
                size_bytes = report.size_bytes,
                target_max_bytes = settings.target_max_bytes,
                "Compression attempt"
            );

            let candidate = ProcessedAsset::new(
                data,
                format.to_mime_type(),
                width,
                height,
                quality,
                attempt,
            );

            if candidate.size_bytes() <= settings.target_max_bytes {
                tracing::debug!(
                    attempts = attempt,
                    size_bytes = candidate.size_bytes(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Image compressed within budget"
                );
                return Ok(candidate);
            }

            if attempt >= max_attempts {
                tracing::warn!(
                    attempts = attempt,
                    size_bytes = candidate.size_bytes(),
                    target_max_bytes = settings.target_max_bytes,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Compression ceiling reached, keeping oversized image"
                );
                return Ok(candidate);
            }

            attempt += 1;
        }
    }
}

/// Downscale so neither side exceeds `max_dimension`. Never upscales.
pub fn fit_within(img: &DynamicImage, max_dimension: u32) -> Cow<'_, DynamicImage> {
    let (width, height) = img.dimensions();
    if width <= max_dimension && height <= max_dimension {
        Cow::Borrowed(img)
    } else {
        Cow::Owned(img.resize(max_dimension, max_dimension, FilterType::Triangle))
    }
}

/// Encode at `quality` in `[0.0, 1.0]`
pub fn encode(img: &DynamicImage, format: OutputFormat, quality: f32) -> Result<Bytes, UploadError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(img, quality),
        OutputFormat::WebP => encode_webp(img, quality),
    }
}

/// Encode to JPEG using mozjpeg
fn encode_jpeg(img: &DynamicImage, quality: f32) -> Result<Bytes, UploadError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality * 100.0);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| UploadError::Compression(e.to_string()))?;
    comp.write_scanlines(&rgb_img)
        .map_err(|e| UploadError::Compression(e.to_string()))?;
    let jpeg_data = comp
        .finish()
        .map_err(|e| UploadError::Compression(e.to_string()))?;

    Ok(Bytes::from(jpeg_data))
}

/// Encode to lossy WebP
fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Bytes, UploadError> {
    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder
        .encode_simple(false, quality * 100.0)
        .map_err(|e| UploadError::Compression(format!("{:?}", e)))?;

    Ok(Bytes::copy_from_slice(&webp_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn flat(side: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(side, side, Rgb([200, 120, 40])))
    }

    // xorshift so the noise is reproducible and incompressible
    fn noise(side: u32) -> DynamicImage {
        let mut state: u32 = 0x9E37_79B9;
        DynamicImage::ImageRgb8(RgbImage::from_fn(side, side, |_, _| {
            let mut next = || {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xFF) as u8
            };
            Rgb([next(), next(), next()])
        }))
    }

    fn small_settings() -> CompressionSettings {
        CompressionSettings {
            initial_max_dimension: 96,
            dimension_step: 16,
            ..Default::default()
        }
    }

    #[test]
    fn stops_at_first_attempt_within_budget() {
        let compressor = IterativeCompressor::new(small_settings());
        let mut attempts = 0;
        let asset = compressor
            .compress_with(&flat(64), |_| attempts += 1)
            .unwrap();

        assert_eq!(attempts, 1);
        assert_eq!(asset.attempts(), 1);
        assert!(asset.size_bytes() <= 102_400);
        assert_eq!(asset.content_type(), "image/jpeg");
        assert_eq!((asset.width(), asset.height()), (64, 64));
    }

    #[test]
    fn ceiling_returns_oversized_result() {
        let settings = CompressionSettings {
            target_max_bytes: 1,
            ..small_settings()
        };
        let compressor = IterativeCompressor::new(settings);
        let mut reports = Vec::new();
        let asset = compressor
            .compress_with(&noise(128), |r| reports.push(*r))
            .unwrap();

        assert_eq!(reports.len(), 4);
        assert_eq!(asset.attempts(), 4);
        assert!(asset.size_bytes() > 1);
        let dims: Vec<u32> = reports.iter().map(|r| r.max_dimension).collect();
        assert_eq!(dims, vec![96, 80, 64, 48]);
        assert_eq!(asset.width(), 48);
    }

    #[test]
    fn never_continues_after_fitting() {
        let settings = CompressionSettings {
            target_max_bytes: 6_000,
            max_attempts: 6,
            ..small_settings()
        };
        let compressor = IterativeCompressor::new(settings.clone());
        let mut reports = Vec::new();
        let asset = compressor
            .compress_with(&noise(128), |r| reports.push(*r))
            .unwrap();

        assert!(reports.len() as u32 <= settings.max_attempts);
        let (last, earlier) = reports.split_last().unwrap();
        assert!(earlier.iter().all(|r| r.size_bytes > settings.target_max_bytes));
        assert_eq!(last.size_bytes, asset.size_bytes());
        assert_eq!(last.attempt, asset.attempts());
    }

    #[test]
    fn fit_within_only_downscales() {
        let img = flat(50);
        assert!(matches!(fit_within(&img, 80), Cow::Borrowed(_)));
        assert_eq!(fit_within(&img, 20).dimensions(), (20, 20));
    }

    #[test]
    fn encodes_webp() {
        let settings = CompressionSettings {
            output_format: OutputFormat::WebP,
            ..small_settings()
        };
        let asset = IterativeCompressor::new(settings).compress(&flat(32)).unwrap();
        assert_eq!(asset.content_type(), "image/webp");
        assert_eq!(&asset.data()[0..4], b"RIFF");
    }
}
