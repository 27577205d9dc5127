//! Reassembles an image's annotation list after merging

use super::extractor::ExtractedBoxes;
use super::merger::AxleCluster;
use annotool_core::{AnnotatedImage, Category};

pub struct AnnotationRebuilder;

impl AnnotationRebuilder {
    /// Passthrough labels first (file order), then `grouped_axles`, then the
    /// remaining `single_axle` boxes, both left to right.
    pub fn rebuild(extracted: ExtractedBoxes, clusters: Vec<AxleCluster>) -> AnnotatedImage {
        let (grouped, single): (Vec<_>, Vec<_>) = clusters
            .into_iter()
            .map(AxleCluster::into_annotation)
            .partition(|annotation| annotation.category == Category::GroupedAxles);

        let mut annotations = extracted.passthrough;
        annotations.extend(grouped);
        annotations.extend(single);

        AnnotatedImage::new(extracted.location, annotations)
    }
}
