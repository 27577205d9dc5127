//! Typed annotation model shared by the axle merger and the detector evaluator.

pub mod annotations;
pub mod error;
pub mod geometry;

pub use annotations::{
    AnnotatedImage, Annotation, AnnotationFile, Category, GroundTruthImage, PredictedImage, Prediction,
};
pub use error::ValidationError;
pub use geometry::BBox;
