//! Render configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Base seed used when none is given.
pub const DEFAULT_SEED: u32 = 42;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("image dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    #[error("sample count must be at least 1")]
    ZeroSamples,

    #[error("gamma must be positive and finite (got {0})")]
    InvalidGamma(f64),

    #[error("unknown antialiasing quality '{0}' (expected none, low, medium, high or ultra)")]
    UnknownQuality(String),
}

/// Antialiasing preset. Every preset other than `None` samples stratified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntialiasQuality {
    None,
    Low,
    Medium,
    High,
    Ultra,
}

impl AntialiasQuality {
    pub fn sample_count(self) -> u32 {
        match self {
            AntialiasQuality::None => 1,
            AntialiasQuality::Low => 4,
            AntialiasQuality::Medium => 9,
            AntialiasQuality::High => 16,
            AntialiasQuality::Ultra => 25,
        }
    }
}

impl fmt::Display for AntialiasQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AntialiasQuality::None => "none",
            AntialiasQuality::Low => "low",
            AntialiasQuality::Medium => "medium",
            AntialiasQuality::High => "high",
            AntialiasQuality::Ultra => "ultra",
        };
        f.write_str(name)
    }
}

impl FromStr for AntialiasQuality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(AntialiasQuality::None),
            "low" => Ok(AntialiasQuality::Low),
            "medium" => Ok(AntialiasQuality::Medium),
            "high" => Ok(AntialiasQuality::High),
            "ultra" => Ok(AntialiasQuality::Ultra),
            _ => Err(ConfigError::UnknownQuality(s.to_string())),
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Requested samples per pixel (ignored when `antialiasing` is set)
    pub samples: u32,
    pub antialiasing: Option<AntialiasQuality>,
    /// Recursion ceiling for reflection rays
    pub max_depth: u32,
    /// Output color is `c^(1/gamma)`
    pub gamma: f64,
    pub stratified: bool,
    /// Worker count; `None` uses the detected core count
    pub threads: Option<usize>,
    pub seed: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            samples: 1,
            antialiasing: None,
            max_depth: 10,
            gamma: 2.2,
            stratified: false,
            threads: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl RenderConfig {
    /// Requested samples per pixel after resolving the quality preset.
    pub fn effective_samples(&self) -> u32 {
        match self.antialiasing {
            Some(quality) => quality.sample_count(),
            None => self.samples.max(1),
        }
    }

    pub fn uses_stratified(&self) -> bool {
        self.stratified || self.antialiasing.is_some()
    }

    /// Cells per axis of the stratified grid, `ceil(sqrt(samples))`.
    pub fn strata_per_axis(&self) -> u32 {
        let samples = u64::from(self.effective_samples());
        let mut n = (samples as f64).sqrt() as u64;
        while n * n < samples {
            n += 1;
        }
        // ceil(sqrt(u32::MAX)) is 65536, which fits
        n as u32
    }

    /// Samples actually traced per pixel.
    ///
    /// Stratified sampling rounds up to the next perfect square, so asking
    /// for 10 traces 16.
    pub fn samples_traced(&self) -> u64 {
        let samples = u64::from(self.effective_samples());
        if samples <= 1 {
            1
        } else if self.uses_stratified() {
            let n = u64::from(self.strata_per_axis());
            n * n
        } else {
            samples
        }
    }

    /// Worker count, never below 1.
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.antialiasing.is_none() && self.samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        Ok(())
    }
}
