//! Evaluation configuration

use anyhow::Context;
use annotool_core::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// Value of precision or recall when its denominator is zero
/// (no predictions kept, or no ground truth at all).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyRatio {
    /// Nothing to get wrong counts as perfect
    #[default]
    One,
    Zero,
}

impl EmptyRatio {
    pub fn value(self) -> f64 {
        match self {
            EmptyRatio::One => 1.0,
            EmptyRatio::Zero => 0.0,
        }
    }

    /// `numerator / denominator`, or the policy value for `0 / 0`
    pub fn ratio(self, numerator: usize, denominator: usize) -> f64 {
        if denominator == 0 {
            self.value()
        } else {
            numerator as f64 / denominator as f64
        }
    }
}

impl FromStr for EmptyRatio {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one" | "1" => Ok(EmptyRatio::One),
            "zero" | "0" => Ok(EmptyRatio::Zero),
            other => Err(ValidationError::InvalidConfig(format!(
                "empty ratio must be 'one' or 'zero', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for EmptyRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyRatio::One => f.write_str("one"),
            EmptyRatio::Zero => f.write_str("zero"),
        }
    }
}

/// Main evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Minimum IoU for a prediction to claim a ground-truth box
    pub iou_threshold: f64,
    /// The sweep visits `i / threshold_steps` for `i = 0..=threshold_steps`
    pub threshold_steps: usize,
    pub empty_ratio: EmptyRatio,
    /// Confidence cutoff for the per-image breakdown
    pub per_image_threshold: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.5,
            threshold_steps: 10,
            empty_ratio: EmptyRatio::One,
            per_image_threshold: 0.5,
        }
    }
}

impl EvaluationConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config: {:?}", path))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse evaluation config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.iou_threshold > 0.0 && self.iou_threshold <= 1.0) {
            return Err(ValidationError::InvalidConfig(format!(
                "IoU threshold must be in (0, 1], got {}",
                self.iou_threshold
            )));
        }
        if self.threshold_steps == 0 {
            return Err(ValidationError::InvalidConfig(
                "threshold steps must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.per_image_threshold) {
            return Err(ValidationError::InvalidConfig(format!(
                "per-image confidence threshold must be in [0, 1], got {}",
                self.per_image_threshold
            )));
        }
        Ok(())
    }

    /// Confidence thresholds in ascending order
    pub fn thresholds(&self) -> Vec<f64> {
        (0..=self.threshold_steps)
            .map(|i| i as f64 / self.threshold_steps as f64)
            .collect()
    }
}
