use super::Category;
use crate::{BBox, ValidationError};
use serde::{Deserialize, Serialize};

/// A labelled box from an annotation file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub category: Category,
    pub bbox: BBox,
}

impl Annotation {
    pub fn new(category: Category, bbox: BBox) -> Self {
        Self { category, bbox }
    }
}

/// A detector output: box plus confidence in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PredictionRecord")]
pub struct Prediction {
    pub bbox: BBox,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(bbox: BBox, confidence: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self { bbox, confidence })
    }
}

#[derive(Deserialize)]
struct PredictionRecord {
    bbox: BBox,
    confidence: f64,
}

impl TryFrom<PredictionRecord> for Prediction {
    type Error = ValidationError;

    fn try_from(record: PredictionRecord) -> Result<Self, Self::Error> {
        Prediction::new(record.bbox, record.confidence)
    }
}

/// One image of the vehicle annotation set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedImage {
    pub location: String,
    pub annotations: Vec<Annotation>,
}

impl AnnotatedImage {
    pub fn new(location: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            location: location.into(),
            annotations,
        }
    }

    /// Annotations with the given label, in file order
    pub fn with_category(&self, category: Category) -> impl Iterator<Item = &Annotation> {
        self.annotations
            .iter()
            .filter(move |annotation| annotation.category == category)
    }

    pub fn count(&self, category: Category) -> usize {
        self.with_category(category).count()
    }
}

/// Ground-truth boxes of one image; the class is implicit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthImage {
    pub location: String,
    pub boxes: Vec<BBox>,
}

impl GroundTruthImage {
    pub fn new(location: impl Into<String>, boxes: Vec<BBox>) -> Self {
        Self {
            location: location.into(),
            boxes,
        }
    }
}

/// Detector output for one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedImage {
    pub location: String,
    pub predictions: Vec<Prediction>,
}

impl PredictedImage {
    pub fn new(location: impl Into<String>, predictions: Vec<Prediction>) -> Self {
        Self {
            location: location.into(),
            predictions,
        }
    }
}
