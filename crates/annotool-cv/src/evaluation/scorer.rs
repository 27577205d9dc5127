//! Per-image TP/FP/FN at a fixed confidence threshold

use super::dataset::{EvaluationDataset, ImageEntry};
use super::matcher::{IoUMatcher, MatchOutcome, MatchResult};
use serde::Serialize;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageScore {
    pub location: String,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Scores each image from scratch: filter by confidence, then match
#[derive(Debug, Clone, Copy)]
pub struct PerImageScorer {
    matcher: IoUMatcher,
}

impl PerImageScorer {
    pub fn new(matcher: IoUMatcher) -> Self {
        Self { matcher }
    }

    pub fn score_entry(&self, entry: &ImageEntry, threshold: f64) -> MatchOutcome {
        let kept = entry.predictions.clone().filter_by_confidence(threshold);
        self.matcher.match_image(&entry.ground_truth, kept)
    }

    /// Outcomes in dataset (location) order
    pub fn score_outcomes(&self, dataset: &EvaluationDataset, threshold: f64) -> Vec<MatchOutcome> {
        #[cfg(feature = "parallel")]
        let outcomes = dataset
            .entries()
            .par_iter()
            .map(|entry| self.score_entry(entry, threshold))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes = dataset
            .entries()
            .iter()
            .map(|entry| self.score_entry(entry, threshold))
            .collect();

        outcomes
    }

    pub fn score(&self, dataset: &EvaluationDataset, threshold: f64) -> Vec<ImageScore> {
        debug!(
            images = dataset.len(),
            confidence = threshold,
            iou = self.matcher.iou_threshold(),
            "scoring images"
        );
        dataset
            .entries()
            .iter()
            .zip(self.score_outcomes(dataset, threshold))
            .map(|(entry, outcome)| ImageScore {
                location: entry.location.clone(),
                result: outcome.result,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotool_core::{BBox, GroundTruthImage, PredictedImage, Prediction};

    #[test]
    fn test_threshold_filters_before_matching() {
        let plane = BBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let truth = vec![GroundTruthImage::new("a.jpg", vec![plane])];
        let predictions = vec![
            PredictedImage::new(
                "a.jpg",
                vec![
                    Prediction::new(plane, 0.3).unwrap(),
                    Prediction::new(BBox::new(50.0, 50.0, 60.0, 60.0).unwrap(), 0.7).unwrap(),
                ],
            ),
            PredictedImage::new("ghost.jpg", vec![Prediction::new(plane, 0.9).unwrap()]),
        ];
        let dataset = EvaluationDataset::new(&truth, &predictions);
        let scorer = PerImageScorer::new(IoUMatcher::new(0.5));

        let scores = scorer.score(&dataset, 0.5);
        assert_eq!(scores[0].location, "a.jpg");
        assert_eq!(scores[0].result, MatchResult::new(0, 1, 1));
        assert_eq!(scores[1].location, "ghost.jpg");
        assert_eq!(scores[1].result, MatchResult::new(0, 1, 0));

        let scores = scorer.score(&dataset, 0.0);
        assert_eq!(scores[0].result, MatchResult::new(1, 1, 0));
    }
}
