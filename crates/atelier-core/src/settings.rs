//! Tunables for image ingestion: the compression loop and content hashing.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

pub const DEFAULT_TARGET_MAX_BYTES: usize = 100 * 1024;
pub const DEFAULT_INITIAL_QUALITY: f32 = 0.6;
pub const DEFAULT_QUALITY_STEP: f32 = 0.1;
pub const DEFAULT_INITIAL_MAX_DIMENSION: u32 = 1000;
pub const DEFAULT_DIMENSION_STEP: u32 = 200;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Lowest quality an attempt may be encoded at, however many steps were taken.
pub const MIN_QUALITY: f32 = 0.05;

/// Encoded container for processed images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    WebP,
}

impl OutputFormat {
    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(anyhow::anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Hash used to key stored objects by content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Length of the lowercase hex encoding
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 40,
            DigestAlgorithm::Sha256 => 64,
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            _ => Err(anyhow::anyhow!("Invalid digest algorithm: {}", s)),
        }
    }
}

impl Display for DigestAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DigestAlgorithm::Sha1 => write!(f, "sha1"),
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Parameters of the iterative compression loop.
///
/// Attempt `n` (1-based) encodes at `initial_quality - (n - 1) * quality_step`
/// and `initial_max_dimension - (n - 1) * dimension_step`. The loop stops on the
/// first attempt at or under `target_max_bytes`, or after `max_attempts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionSettings {
    pub target_max_bytes: usize,
    pub initial_quality: f32,
    pub quality_step: f32,
    pub initial_max_dimension: u32,
    pub dimension_step: u32,
    pub max_attempts: u32,
    pub output_format: OutputFormat,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            target_max_bytes: DEFAULT_TARGET_MAX_BYTES,
            initial_quality: DEFAULT_INITIAL_QUALITY,
            quality_step: DEFAULT_QUALITY_STEP,
            initial_max_dimension: DEFAULT_INITIAL_MAX_DIMENSION,
            dimension_step: DEFAULT_DIMENSION_STEP,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            output_format: OutputFormat::Jpeg,
        }
    }
}

impl CompressionSettings {
    /// Quality for a 1-based attempt number, clamped to `[MIN_QUALITY, 1.0]`
    pub fn quality_for_attempt(&self, attempt: u32) -> f32 {
        let steps = attempt.saturating_sub(1) as f32;
        (self.initial_quality - steps * self.quality_step).clamp(MIN_QUALITY, 1.0)
    }

    /// Max width/height for a 1-based attempt number, never below 1px
    pub fn max_dimension_for_attempt(&self, attempt: u32) -> u32 {
        let reduction = attempt.saturating_sub(1).saturating_mul(self.dimension_step);
        self.initial_max_dimension.saturating_sub(reduction).max(1)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_attempts == 0 {
            return Err(anyhow::anyhow!("max_attempts must be at least 1"));
        }
        if !(self.initial_quality > 0.0 && self.initial_quality <= 1.0) {
            return Err(anyhow::anyhow!(
                "initial_quality must be in (0.0, 1.0], got {}",
                self.initial_quality
            ));
        }
        if self.quality_step < 0.0 {
            return Err(anyhow::anyhow!("quality_step must not be negative"));
        }
        if self.initial_max_dimension == 0 {
            return Err(anyhow::anyhow!("initial_max_dimension must be at least 1"));
        }
        if self.target_max_bytes == 0 {
            return Err(anyhow::anyhow!("target_max_bytes must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upload_budget() {
        let settings = CompressionSettings::default();
        assert_eq!(settings.target_max_bytes, 102_400);
        assert_eq!(settings.max_attempts, 4);
        assert_eq!(settings.output_format, OutputFormat::Jpeg);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn attempt_parameters_step_down() {
        let settings = CompressionSettings::default();
        let qualities: Vec<f32> = (1..=4).map(|a| settings.quality_for_attempt(a)).collect();
        let expected = [0.6f32, 0.5, 0.4, 0.3];
        for (got, want) in qualities.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{} != {}", got, want);
        }
        let dims: Vec<u32> = (1..=4)
            .map(|a| settings.max_dimension_for_attempt(a))
            .collect();
        assert_eq!(dims, vec![1000, 800, 600, 400]);
    }

    #[test]
    fn attempt_parameters_are_clamped() {
        let settings = CompressionSettings {
            max_attempts: 20,
            ..Default::default()
        };
        assert_eq!(settings.quality_for_attempt(20), MIN_QUALITY);
        assert_eq!(settings.max_dimension_for_attempt(20), 1);
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let settings = CompressionSettings {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_quality() {
        let settings = CompressionSettings {
            initial_quality: 1.5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn parse_digest_algorithm() {
        assert_eq!(
            "SHA-256".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha256
        );
        assert_eq!("sha1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        assert!("md5".parse::<DigestAlgorithm>().is_err());
    }

    #[test]
    fn parse_output_format() {
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("webp".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
        assert!("avif".parse::<OutputFormat>().is_err());
    }
}
