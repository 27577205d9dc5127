//! Scored boxes and confidence-ordered collections
//!
//! Core abstraction for the prediction side of detection evaluation.

use annotool_core::{BBox, Prediction};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A predicted box with its confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredBox {
    pub bbox: BBox,
    pub confidence: f64,
}

impl ScoredBox {
    pub fn new(bbox: BBox, confidence: f64) -> Self {
        Self { bbox, confidence }
    }

    /// Calculate intersection over union (IoU) with a ground-truth box
    pub fn iou(&self, other: &BBox) -> f64 {
        self.bbox.iou(other)
    }

    /// Descending confidence, `total_cmp` so NaN never panics the sort
    fn by_confidence_desc(a: &ScoredBox, b: &ScoredBox) -> Ordering {
        b.confidence.total_cmp(&a.confidence)
    }
}

impl From<Prediction> for ScoredBox {
    fn from(prediction: Prediction) -> Self {
        Self::new(prediction.bbox, prediction.confidence)
    }
}

/// Collection of scored boxes with batch operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredBoxCollection {
    boxes: Vec<ScoredBox>,
}

impl ScoredBoxCollection {
    /// Create new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from vector of boxes
    pub fn from_vec(boxes: Vec<ScoredBox>) -> Self {
        Self { boxes }
    }

    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        predictions.iter().copied().map(ScoredBox::from).collect()
    }

    pub fn as_slice(&self) -> &[ScoredBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Sort by confidence (descending); equal scores keep their input order
    pub fn sort_by_confidence(&mut self) {
        self.boxes.sort_by(ScoredBox::by_confidence_desc);
    }

    /// Keep boxes with `confidence >= threshold`
    pub fn filter_by_confidence(mut self, threshold: f64) -> Self {
        self.boxes.retain(|scored| scored.confidence >= threshold);
        self
    }

    /// Number of leading boxes with `confidence >= threshold`.
    /// Only meaningful after [`Self::sort_by_confidence`].
    pub fn count_at_or_above(&self, threshold: f64) -> usize {
        self.boxes.partition_point(|scored| scored.confidence >= threshold)
    }

    pub fn stats(&self) -> ConfidenceStats {
        let mut total_confidence = 0.0;
        let mut max_confidence: f64 = 0.0;
        let mut min_confidence = f64::INFINITY;

        for scored in &self.boxes {
            total_confidence += scored.confidence;
            max_confidence = max_confidence.max(scored.confidence);
            min_confidence = min_confidence.min(scored.confidence);
        }

        let avg_confidence = if self.boxes.is_empty() {
            0.0
        } else {
            total_confidence / self.boxes.len() as f64
        };

        ConfidenceStats {
            total_boxes: self.boxes.len(),
            avg_confidence,
            max_confidence,
            min_confidence: if min_confidence == f64::INFINITY { 0.0 } else { min_confidence },
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredBox> {
        self.boxes.iter()
    }
}

impl IntoIterator for ScoredBoxCollection {
    type Item = ScoredBox;
    type IntoIter = std::vec::IntoIter<ScoredBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.into_iter()
    }
}

impl FromIterator<ScoredBox> for ScoredBoxCollection {
    fn from_iter<T: IntoIterator<Item = ScoredBox>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Statistics about the confidences in a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceStats {
    pub total_boxes: usize,
    pub avg_confidence: f64,
    pub max_confidence: f64,
    pub min_confidence: f64,
}
