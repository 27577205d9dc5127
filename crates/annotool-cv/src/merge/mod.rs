//! Vehicle axle merging: extract → merge → rebuild

pub mod config;
pub mod extractor;
pub mod merger;
pub mod rebuilder;

pub use config::MergeConfig;
pub use extractor::{BoxExtractor, ExtractedBoxes};
pub use merger::{AxleCluster, ProximityMerger};
pub use rebuilder::AnnotationRebuilder;

use crate::Result;
use anyhow::Context;
use annotool_core::{AnnotatedImage, ValidationError};
use serde::Serialize;
use tracing::{debug, info};

/// Counts collected while merging a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeSummary {
    pub images: usize,
    pub single_axles_in: usize,
    pub groups_created: usize,
    /// `single_axle` boxes that ended up inside a group
    pub axles_absorbed: usize,
}

/// Runs the merge pipeline over whole images and datasets
pub struct AxleMerger {
    merger: ProximityMerger,
}

impl AxleMerger {
    pub fn new(config: MergeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            merger: ProximityMerger::new(config.proximity_threshold),
        })
    }

    /// Merge one image into a new image; the input is left untouched
    pub fn merge_image(&self, image: &AnnotatedImage) -> Result<AnnotatedImage, ValidationError> {
        self.merge_counted(image).map(|(merged, _)| merged)
    }

    fn merge_counted(&self, image: &AnnotatedImage) -> Result<(AnnotatedImage, MergeSummary), ValidationError> {
        let extracted = BoxExtractor::extract(image)?;
        let clusters = self.merger.cluster(&extracted.single_axles);

        let grouped: Vec<&AxleCluster> = clusters.iter().filter(|c| c.is_grouped()).collect();
        let summary = MergeSummary {
            images: 1,
            single_axles_in: extracted.single_axles.len(),
            groups_created: grouped.len(),
            axles_absorbed: grouped.iter().map(|c| c.len()).sum(),
        };

        debug!(
            location = %image.location,
            single_axles = summary.single_axles_in,
            groups = summary.groups_created,
            "merged axles"
        );

        Ok((AnnotationRebuilder::rebuild(extracted, clusters), summary))
    }

    pub fn merge_dataset(&self, images: &[AnnotatedImage]) -> Result<(Vec<AnnotatedImage>, MergeSummary)> {
        let mut merged = Vec::with_capacity(images.len());
        let mut summary = MergeSummary::default();

        for image in images {
            let (image, counts) = self
                .merge_counted(image)
                .with_context(|| format!("Failed to merge axles of '{}'", image.location))?;
            summary.images += counts.images;
            summary.single_axles_in += counts.single_axles_in;
            summary.groups_created += counts.groups_created;
            summary.axles_absorbed += counts.axles_absorbed;
            merged.push(image);
        }

        info!(
            images = summary.images,
            single_axles = summary.single_axles_in,
            groups = summary.groups_created,
            absorbed = summary.axles_absorbed,
            threshold = self.merger.threshold(),
            "axle merge finished"
        );

        Ok((merged, summary))
    }
}
