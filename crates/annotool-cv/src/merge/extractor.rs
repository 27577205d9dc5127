//! Splits an image's annotations into mergeable axles and passthrough labels

use annotool_core::{AnnotatedImage, Annotation, BBox, Category, ValidationError};

/// Annotations of one image, separated for the merger
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBoxes {
    pub location: String,
    /// `single_axle` boxes in file order
    pub single_axles: Vec<BBox>,
    /// `car` and `other` annotations in file order
    pub passthrough: Vec<Annotation>,
}

pub struct BoxExtractor;

impl BoxExtractor {
    /// Fails on labels that may only be produced by the merger
    pub fn extract(image: &AnnotatedImage) -> Result<ExtractedBoxes, ValidationError> {
        let mut single_axles = Vec::new();
        let mut passthrough = Vec::new();

        for annotation in &image.annotations {
            if !annotation.category.is_input() {
                return Err(ValidationError::SynthesizedCategoryInInput(
                    annotation.category.to_string(),
                ));
            }
            if annotation.category == Category::SingleAxle {
                single_axles.push(annotation.bbox);
            } else {
                passthrough.push(*annotation);
            }
        }

        Ok(ExtractedBoxes {
            location: image.location.clone(),
            single_axles,
            passthrough,
        })
    }
}
