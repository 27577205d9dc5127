//! Axle merging configuration

use annotool_core::ValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Largest gap between one box's `xmax` and the next box's `xmin` that
    /// still merges them, in box coordinate units. Inclusive.
    pub proximity_threshold: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 0.01,
        }
    }
}

impl MergeConfig {
    pub fn with_threshold(proximity_threshold: f64) -> Self {
        Self { proximity_threshold }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.proximity_threshold.is_finite() || self.proximity_threshold < 0.0 {
            return Err(ValidationError::InvalidConfig(format!(
                "proximity threshold must be a non-negative number, got {}",
                self.proximity_threshold
            )));
        }
        Ok(())
    }
}
