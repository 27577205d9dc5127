//! Greedy confidence-first IoU matching for one image

use super::config::EmptyRatio;
use crate::bbox::{ScoredBox, ScoredBoxCollection};
use annotool_core::BBox;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// True positive, false positive and false negative counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl MatchResult {
    pub fn new(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    /// `TP / (TP + FP)`
    pub fn precision(&self, empty: EmptyRatio) -> f64 {
        empty.ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// `TP / (TP + FN)`
    pub fn recall(&self, empty: EmptyRatio) -> f64 {
        empty.ratio(self.true_positives, self.true_positives + self.false_negatives)
    }
}

impl Add for MatchResult {
    type Output = MatchResult;

    fn add(self, other: MatchResult) -> MatchResult {
        MatchResult {
            true_positives: self.true_positives + other.true_positives,
            false_positives: self.false_positives + other.false_positives,
            false_negatives: self.false_negatives + other.false_negatives,
        }
    }
}

impl AddAssign for MatchResult {
    fn add_assign(&mut self, other: MatchResult) {
        *self = *self + other;
    }
}

impl Sum for MatchResult {
    fn sum<I: Iterator<Item = MatchResult>>(iter: I) -> Self {
        iter.fold(MatchResult::default(), Add::add)
    }
}

/// Matching progress against one image's ground truth.
///
/// Predictions must be offered in descending confidence order. Each one
/// claims the unused ground-truth box with the highest IoU (ties go to the
/// lower index) if that IoU reaches the threshold. Claims are never revisited,
/// so offering more predictions later extends the result of a previous run.
#[derive(Debug, Clone)]
pub struct MatchState<'a> {
    ground_truth: &'a [BBox],
    used: Vec<bool>,
    iou_threshold: f64,
    true_positives: usize,
    false_positives: usize,
    iou_evaluations: usize,
}

impl<'a> MatchState<'a> {
    pub fn new(ground_truth: &'a [BBox], iou_threshold: f64) -> Self {
        Self {
            ground_truth,
            used: vec![false; ground_truth.len()],
            iou_threshold,
            true_positives: 0,
            false_positives: 0,
            iou_evaluations: 0,
        }
    }

    /// Returns true when the prediction became a true positive
    pub fn offer(&mut self, prediction: &ScoredBox) -> bool {
        let mut best: Option<(usize, f64)> = None;

        for (idx, gt) in self.ground_truth.iter().enumerate() {
            if self.used[idx] {
                continue;
            }

            let iou = prediction.iou(gt);
            self.iou_evaluations += 1;
            if best.is_none_or(|(_, best_iou)| iou > best_iou) {
                best = Some((idx, iou));
            }
        }

        match best {
            Some((idx, iou)) if iou >= self.iou_threshold => {
                self.used[idx] = true;
                self.true_positives += 1;
                true
            }
            _ => {
                self.false_positives += 1;
                false
            }
        }
    }

    pub fn result(&self) -> MatchResult {
        MatchResult {
            true_positives: self.true_positives,
            false_positives: self.false_positives,
            false_negatives: self.ground_truth.len() - self.true_positives,
        }
    }

    pub fn iou_evaluations(&self) -> usize {
        self.iou_evaluations
    }
}

/// Counts for one image plus the work it took
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub result: MatchResult,
    pub iou_evaluations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IoUMatcher {
    iou_threshold: f64,
}

impl IoUMatcher {
    pub fn new(iou_threshold: f64) -> Self {
        Self { iou_threshold }
    }

    pub fn iou_threshold(&self) -> f64 {
        self.iou_threshold
    }

    pub fn state<'a>(&self, ground_truth: &'a [BBox]) -> MatchState<'a> {
        MatchState::new(ground_truth, self.iou_threshold)
    }

    /// Match predictions in any order; they are sorted by confidence first
    pub fn match_image(&self, ground_truth: &[BBox], predictions: ScoredBoxCollection) -> MatchOutcome {
        let mut predictions = predictions;
        predictions.sort_by_confidence();

        let mut state = self.state(ground_truth);
        for prediction in predictions.iter() {
            state.offer(prediction);
        }

        MatchOutcome {
            result: state.result(),
            iou_evaluations: state.iou_evaluations(),
        }
    }
}
