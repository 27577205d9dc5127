//! JSON annotation files: `{"images": [{"location", "annotated_regions"}]}`.
//!
//! The same file shape carries vehicle annotations, ground truth and
//! detector predictions. Records are read as-is and then converted into the
//! typed model, which is where every check happens.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::{AnnotatedImage, Annotation, Category, GroundTruthImage, PredictedImage, Prediction};
use crate::geometry::Corners;
use crate::{BBox, ValidationError};

const BOX_REGION: &str = "Box";

fn default_region_type() -> String {
    BOX_REGION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_region_type")]
    pub region_type: String,
    pub region: Corners,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub location: String,
    #[serde(default)]
    pub annotated_regions: Vec<RegionRecord>,
}

/// Raw contents of an annotation file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub images: Vec<ImageRecord>,
}

impl AnnotationFile {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Annotation JSON does not match the expected {\"images\": [...]} layout")
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;

        let data: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse {:?} as an annotation file", path))?;

        info!(images = data.images.len(), path = ?path, "loaded annotation file");
        Ok(data)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
        let mut writer = BufWriter::new(file);

        if pretty {
            serde_json::to_writer_pretty(&mut writer, self)
        } else {
            serde_json::to_writer(&mut writer, self)
        }
        .with_context(|| format!("Could not save {:?} in json format", path))?;
        writer.flush()?;

        info!(images = self.images.len(), path = ?path, "saved annotation file");
        Ok(())
    }

    /// Typed vehicle annotations; every region needs exactly one known tag
    pub fn into_annotated_images(self) -> Result<Vec<AnnotatedImage>, ValidationError> {
        check_unique_locations(&self.images)?;

        self.images
            .into_iter()
            .map(|image| {
                let annotations = image
                    .annotated_regions
                    .into_iter()
                    .map(|region| {
                        let bbox = region.checked_box()?;
                        let category = match region.tags.as_slice() {
                            [tag] => tag.parse::<Category>()?,
                            tags => {
                                return Err(ValidationError::TagCount {
                                    location: image.location.clone(),
                                    count: tags.len(),
                                });
                            }
                        };
                        Ok(Annotation::new(category, bbox))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(AnnotatedImage::new(image.location, annotations))
            })
            .collect()
    }

    /// Ground-truth boxes; tags and scores are ignored
    pub fn into_ground_truth(self) -> Result<Vec<GroundTruthImage>, ValidationError> {
        check_unique_locations(&self.images)?;

        self.images
            .into_iter()
            .map(|image| {
                let boxes = image
                    .annotated_regions
                    .iter()
                    .map(RegionRecord::checked_box)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(GroundTruthImage::new(image.location, boxes))
            })
            .collect()
    }

    /// Detector predictions; every region needs a score in `[0, 1]`
    pub fn into_predictions(self) -> Result<Vec<PredictedImage>, ValidationError> {
        check_unique_locations(&self.images)?;

        self.images
            .into_iter()
            .map(|image| {
                let predictions = image
                    .annotated_regions
                    .iter()
                    .map(|region| {
                        let bbox = region.checked_box()?;
                        let score = region
                            .score
                            .ok_or_else(|| ValidationError::MissingScore(image.location.clone()))?;
                        Prediction::new(bbox, score)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PredictedImage::new(image.location, predictions))
            })
            .collect()
    }

    pub fn from_annotated_images(images: &[AnnotatedImage]) -> Self {
        let images = images
            .iter()
            .map(|image| ImageRecord {
                location: image.location.clone(),
                annotated_regions: image
                    .annotations
                    .iter()
                    .map(|annotation| RegionRecord {
                        tags: vec![annotation.category.to_string()],
                        region_type: default_region_type(),
                        region: annotation.bbox.into(),
                        score: None,
                    })
                    .collect(),
            })
            .collect();

        Self { images }
    }
}

impl RegionRecord {
    fn checked_box(&self) -> Result<BBox, ValidationError> {
        if self.region_type != BOX_REGION {
            return Err(ValidationError::UnsupportedRegionType(self.region_type.clone()));
        }
        BBox::try_from(self.region)
    }
}

fn check_unique_locations(images: &[ImageRecord]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for image in images {
        if !seen.insert(image.location.as_str()) {
            return Err(ValidationError::DuplicateImage(image.location.clone()));
        }
    }
    Ok(())
}

pub fn load_annotated_images<P: AsRef<Path>>(path: P) -> Result<Vec<AnnotatedImage>> {
    let path = path.as_ref();
    AnnotationFile::read(path)?
        .into_annotated_images()
        .with_context(|| format!("Invalid annotations in {:?}", path))
}

pub fn load_ground_truth<P: AsRef<Path>>(path: P) -> Result<Vec<GroundTruthImage>> {
    let path = path.as_ref();
    AnnotationFile::read(path)?
        .into_ground_truth()
        .with_context(|| format!("Invalid ground truth in {:?}", path))
}

pub fn load_predictions<P: AsRef<Path>>(path: P) -> Result<Vec<PredictedImage>> {
    let path = path.as_ref();
    AnnotationFile::read(path)?
        .into_predictions()
        .with_context(|| format!("Invalid predictions in {:?}", path))
}

pub fn save_annotated_images<P: AsRef<Path>>(path: P, images: &[AnnotatedImage], pretty: bool) -> Result<()> {
    AnnotationFile::from_annotated_images(images).write(path, pretty)
}
