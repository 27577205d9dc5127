//! Precision/recall across confidence thresholds
//!
//! [`NaiveSweep`] re-matches every image at every threshold.
//! [`IncrementalSweep`] walks the thresholds from high to low and keeps each
//! image's matching state between them: lowering the threshold only adds
//! predictions, and greedy matching in confidence order never revisits an
//! earlier claim, so only the newly admitted predictions need IoU work.
//! Both produce the same curve.

use super::config::EvaluationConfig;
use super::dataset::{EvaluationDataset, ImageEntry};
use super::matcher::{IoUMatcher, MatchResult, MatchState};
use super::scorer::PerImageScorer;
use crate::bbox::ScoredBoxCollection;
use crate::traits::ThresholdSweep;
use crate::Result;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    pub counts: MatchResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepStats {
    pub images: usize,
    pub thresholds: usize,
    pub iou_evaluations: usize,
    pub processing_time_ms: u64,
}

/// Curve points in ascending threshold order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub points: Vec<SweepPoint>,
    pub stats: SweepStats,
}

impl SweepReport {
    pub fn point_at(&self, threshold: f64) -> Option<&SweepPoint> {
        self.points
            .iter()
            .find(|point| (point.threshold - threshold).abs() < 1e-12)
    }
}

fn point(config: &EvaluationConfig, threshold: f64, counts: MatchResult) -> SweepPoint {
    SweepPoint {
        threshold,
        precision: counts.precision(config.empty_ratio),
        recall: counts.recall(config.empty_ratio),
        counts,
    }
}

pub struct NaiveSweep {
    config: EvaluationConfig,
    scorer: PerImageScorer,
}

impl NaiveSweep {
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        let scorer = PerImageScorer::new(IoUMatcher::new(config.iou_threshold));
        Ok(Self { config, scorer })
    }
}

impl ThresholdSweep for NaiveSweep {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn sweep(&self, dataset: &EvaluationDataset) -> SweepReport {
        let start_time = Instant::now();
        let thresholds = self.config.thresholds();
        let mut iou_evaluations = 0;

        let points = thresholds
            .iter()
            .map(|&threshold| {
                let outcomes = self.scorer.score_outcomes(dataset, threshold);
                iou_evaluations += outcomes.iter().map(|o| o.iou_evaluations).sum::<usize>();
                let counts = outcomes.into_iter().map(|o| o.result).sum();
                point(&self.config, threshold, counts)
            })
            .collect();

        let stats = SweepStats {
            images: dataset.len(),
            thresholds: thresholds.len(),
            iou_evaluations,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };
        debug!(sweep = self.name(), ?stats, "sweep finished");

        SweepReport { points, stats }
    }
}

/// Matching state carried across thresholds for one image
struct IncrementalImage<'a> {
    /// Predictions in descending confidence
    sorted: ScoredBoxCollection,
    /// Number of leading predictions already offered
    cursor: usize,
    state: MatchState<'a>,
}

impl<'a> IncrementalImage<'a> {
    fn new(entry: &'a ImageEntry, matcher: &IoUMatcher) -> Self {
        let mut sorted = entry.predictions.clone();
        sorted.sort_by_confidence();

        Self {
            sorted,
            cursor: 0,
            state: matcher.state(&entry.ground_truth),
        }
    }

    /// Offer the predictions admitted by lowering the cutoff to `threshold`
    fn advance_to(&mut self, threshold: f64) -> MatchResult {
        let admitted = self.sorted.count_at_or_above(threshold).max(self.cursor);
        for prediction in &self.sorted.as_slice()[self.cursor..admitted] {
            self.state.offer(prediction);
        }
        self.cursor = admitted;
        self.state.result()
    }
}

pub struct IncrementalSweep {
    config: EvaluationConfig,
    matcher: IoUMatcher,
}

impl IncrementalSweep {
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        let matcher = IoUMatcher::new(config.iou_threshold);
        Ok(Self { config, matcher })
    }
}

impl ThresholdSweep for IncrementalSweep {
    fn name(&self) -> &'static str {
        "incremental"
    }

    fn sweep(&self, dataset: &EvaluationDataset) -> SweepReport {
        let start_time = Instant::now();
        let thresholds = self.config.thresholds();

        let mut images: Vec<IncrementalImage> = dataset
            .entries()
            .iter()
            .map(|entry| IncrementalImage::new(entry, &self.matcher))
            .collect();

        let mut points: Vec<SweepPoint> = thresholds
            .iter()
            .rev()
            .map(|&threshold| {
                let counts = images.iter_mut().map(|image| image.advance_to(threshold)).sum();
                point(&self.config, threshold, counts)
            })
            .collect();
        points.reverse();

        let stats = SweepStats {
            images: dataset.len(),
            thresholds: thresholds.len(),
            iou_evaluations: images.iter().map(|image| image.state.iou_evaluations()).sum(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };
        debug!(sweep = self.name(), ?stats, "sweep finished");

        SweepReport { points, stats }
    }
}
