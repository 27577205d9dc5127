//! Subcommands wiring file I/O to the annotool-cv pipelines

use annotool_core::annotations::data;
use annotool_cv::{
    evaluation::{EmptyRatio, EvaluationConfig, EvaluationDataset, ImageScore, IncrementalSweep, NaiveSweep},
    traits::ThresholdSweep,
    AxleMerger, IoUMatcher, MergeConfig, MergeSummary, PerImageScorer, SweepReport,
};
use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Annotation file to read
    #[arg(default_value = "annotations.json")]
    pub input: PathBuf,

    /// Where to write the merged annotations
    #[arg(short, long, default_value = "new_annotations.json")]
    pub output: PathBuf,

    /// Largest x gap between axles that still merges them
    #[arg(long, default_value_t = MergeConfig::default().proximity_threshold)]
    pub threshold: f64,

    /// Indent the output file
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    #[arg(default_value = "groundtruth.json")]
    pub groundtruth: PathBuf,

    #[arg(default_value = "predictions.json")]
    pub predictions: PathBuf,

    /// JSON file with evaluation settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum IoU for a match
    #[arg(long)]
    pub iou: Option<f64>,

    /// Number of threshold intervals; the sweep has steps + 1 points
    #[arg(long)]
    pub steps: Option<usize>,

    /// Precision/recall value for a zero denominator: one or zero
    #[arg(long)]
    pub empty_ratio: Option<EmptyRatio>,

    /// Confidence cutoff for the per-image breakdown
    #[arg(long)]
    pub per_image_threshold: Option<f64>,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl EvaluateArgs {
    fn config(&self) -> Result<EvaluationConfig> {
        let mut config = match &self.config {
            Some(path) => EvaluationConfig::from_json_file(path)?,
            None => EvaluationConfig::default(),
        };

        if let Some(iou) = self.iou {
            config.iou_threshold = iou;
        }
        if let Some(steps) = self.steps {
            config.threshold_steps = steps;
        }
        if let Some(empty_ratio) = self.empty_ratio {
            config.empty_ratio = empty_ratio;
        }
        if let Some(threshold) = self.per_image_threshold {
            config.per_image_threshold = threshold;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn run_merge(args: MergeArgs) -> Result<()> {
    let images = data::load_annotated_images(&args.input)?;

    let merger = AxleMerger::new(MergeConfig::with_threshold(args.threshold))?;
    let (merged, summary) = merger.merge_dataset(&images)?;

    data::save_annotated_images(&args.output, &merged, args.pretty)?;
    print_merge_summary(&summary);
    Ok(())
}

fn print_merge_summary(summary: &MergeSummary) {
    println!("Merge completed:");
    println!("  - Images: {}", summary.images);
    println!("  - single_axle in: {}", summary.single_axles_in);
    println!("  - grouped_axles created: {}", summary.groups_created);
    println!(
        "  - single_axle out: {}",
        summary.single_axles_in - summary.axles_absorbed
    );
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    config: EvaluationConfig,
    per_image: Vec<ImageScore>,
    naive: SweepReport,
    incremental: SweepReport,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let config = args.config()?;

    let ground_truth = data::load_ground_truth(&args.groundtruth)?;
    let predictions = data::load_predictions(&args.predictions)?;
    let dataset = EvaluationDataset::new(&ground_truth, &predictions);

    let stats = dataset.prediction_stats();
    info!(
        images = dataset.len(),
        predictions = stats.total_boxes,
        avg_confidence = stats.avg_confidence,
        "evaluation dataset ready"
    );

    let scorer = PerImageScorer::new(IoUMatcher::new(config.iou_threshold));
    let per_image = scorer.score(&dataset, config.per_image_threshold);

    let naive = NaiveSweep::new(config.clone())?.sweep(&dataset);
    let incremental = IncrementalSweep::new(config.clone())?.sweep(&dataset);
    check_agreement(&naive, &incremental)?;

    info!(
        naive_ms = naive.stats.processing_time_ms,
        incremental_ms = incremental.stats.processing_time_ms,
        naive_iou = naive.stats.iou_evaluations,
        incremental_iou = incremental.stats.iou_evaluations,
        "threshold sweeps finished"
    );

    let report = EvaluationReport {
        config,
        per_image,
        naive,
        incremental,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Both sweeps must trace the same curve
fn check_agreement(naive: &SweepReport, incremental: &SweepReport) -> Result<()> {
    for (a, b) in naive.points.iter().zip(&incremental.points) {
        if a.counts != b.counts
            || (a.precision - b.precision).abs() > 1e-9
            || (a.recall - b.recall).abs() > 1e-9
        {
            bail!(
                "naive and incremental sweeps disagree at threshold {:.2}: {:?} vs {:?}",
                a.threshold,
                a.counts,
                b.counts
            );
        }
    }
    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!(
        "Per image at confidence >= {:.2} (IoU >= {:.2}):",
        report.config.per_image_threshold, report.config.iou_threshold
    );
    for score in &report.per_image {
        println!(
            "  {}: TP {} / FP {} / FN {}",
            score.location,
            score.result.true_positives,
            score.result.false_positives,
            score.result.false_negatives
        );
    }
    if report.per_image.is_empty() {
        warn!("no images to evaluate");
    }

    println!(
        "Naive sweep: {}ms, {} IoU evaluations",
        report.naive.stats.processing_time_ms, report.naive.stats.iou_evaluations
    );
    println!(
        "Incremental sweep: {}ms, {} IoU evaluations",
        report.incremental.stats.processing_time_ms, report.incremental.stats.iou_evaluations
    );

    for (a, b) in report.naive.points.iter().zip(&report.incremental.points) {
        println!(
            "Threshold {:.1} -> Naive: P={:.2}, R={:.2} | Incremental: P={:.2}, R={:.2}",
            a.threshold, a.precision, a.recall, b.precision, b.recall
        );
    }
}
