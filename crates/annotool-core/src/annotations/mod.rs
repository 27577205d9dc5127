pub mod annotation;
pub mod category;
pub mod data;

pub use annotation::{AnnotatedImage, Annotation, GroundTruthImage, PredictedImage, Prediction};
pub use category::Category;
pub use data::AnnotationFile;
