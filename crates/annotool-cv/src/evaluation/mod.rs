//! Detector evaluation: IoU matching, per-image scoring, threshold sweeps

pub mod config;
pub mod dataset;
pub mod matcher;
pub mod scorer;
pub mod sweep;

pub use config::{EmptyRatio, EvaluationConfig};
pub use dataset::{EvaluationDataset, ImageEntry};
pub use matcher::{IoUMatcher, MatchOutcome, MatchResult, MatchState};
pub use scorer::{ImageScore, PerImageScorer};
pub use sweep::{IncrementalSweep, NaiveSweep, SweepPoint, SweepReport, SweepStats};
