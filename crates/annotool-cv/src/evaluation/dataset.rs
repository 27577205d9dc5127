//! Ground truth and predictions joined by image location

use crate::bbox::{ConfidenceStats, ScoredBoxCollection};
use annotool_core::{BBox, GroundTruthImage, PredictedImage};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// One image's boxes on both sides; predictions stay in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageEntry {
    pub location: String,
    pub ground_truth: Vec<BBox>,
    pub predictions: ScoredBoxCollection,
}

/// Images sorted by location, each present on at least one side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationDataset {
    entries: Vec<ImageEntry>,
}

impl EvaluationDataset {
    /// An image missing from one side contributes nothing from that side:
    /// all its ground truth becomes misses, or all its predictions false positives.
    pub fn new(ground_truth: &[GroundTruthImage], predictions: &[PredictedImage]) -> Self {
        let mut by_location: BTreeMap<&str, ImageEntry> = BTreeMap::new();

        for image in ground_truth {
            let entry = by_location.entry(image.location.as_str()).or_default();
            entry.location = image.location.clone();
            entry.ground_truth = image.boxes.clone();
        }

        for image in predictions {
            let entry = by_location.entry(image.location.as_str()).or_insert_with(|| {
                warn!(location = %image.location, "predictions for an image without ground truth");
                ImageEntry {
                    location: image.location.clone(),
                    ..Default::default()
                }
            });
            entry.predictions = ScoredBoxCollection::from_predictions(&image.predictions);
        }

        let entries: Vec<ImageEntry> = by_location.into_values().collect();
        let with_predictions: HashSet<&str> = predictions.iter().map(|p| p.location.as_str()).collect();
        for entry in &entries {
            if !with_predictions.contains(entry.location.as_str()) {
                warn!(location = %entry.location, "no prediction found for image");
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    /// Confidence summary over every prediction in the dataset
    pub fn prediction_stats(&self) -> ConfidenceStats {
        self.entries
            .iter()
            .flat_map(|entry| entry.predictions.iter().copied())
            .collect::<ScoredBoxCollection>()
            .stats()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
