//! Annotation tooling
//!
//! Axle box merging for vehicle annotations and precision/recall evaluation
//! of detector output against ground truth.

pub mod bbox;
pub mod evaluation;
pub mod merge;

// Re-export commonly used types
pub use bbox::{ScoredBox, ScoredBoxCollection};
pub use evaluation::{
    EvaluationConfig, EvaluationDataset, IncrementalSweep, IoUMatcher, MatchResult, NaiveSweep,
    PerImageScorer, SweepReport,
};
pub use merge::{AxleMerger, MergeConfig, MergeSummary, ProximityMerger};

// Error handling
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Core traits
pub mod traits {
    use crate::evaluation::{EvaluationDataset, SweepReport};

    /// Computes the precision/recall curve over a dataset.
    ///
    /// Every implementation must produce the same points for the same
    /// configuration; they differ only in how much matching work they redo.
    pub trait ThresholdSweep {
        fn name(&self) -> &'static str;
        fn sweep(&self, dataset: &EvaluationDataset) -> SweepReport;
    }
}
