// tests/evaluation_tests.rs
use annotool_core::{AnnotationFile, BBox, GroundTruthImage, PredictedImage, Prediction};
use annotool_cv::{
    evaluation::{EmptyRatio, EvaluationConfig, EvaluationDataset, IncrementalSweep, MatchResult, NaiveSweep},
    traits::ThresholdSweep,
    IoUMatcher, PerImageScorer,
};
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_box(rng: &mut StdRng) -> BBox {
    let xmin = rng.gen_range(0.0..80.0);
    let ymin = rng.gen_range(0.0..80.0);
    BBox::new(xmin, ymin, xmin + rng.gen_range(5.0..20.0), ymin + rng.gen_range(5.0..20.0)).unwrap()
}

/// Jitter a box so that some predictions land above and some below IoU 0.5
fn jitter(rng: &mut StdRng, bbox: &BBox) -> BBox {
    let dx = rng.gen_range(-6.0..6.0);
    let dy = rng.gen_range(-6.0..6.0);
    BBox::new(bbox.xmin + dx, bbox.ymin + dy, bbox.xmax + dx, bbox.ymax + dy).unwrap()
}

fn random_dataset(rng: &mut StdRng) -> (Vec<GroundTruthImage>, Vec<PredictedImage>) {
    let images = rng.gen_range(0..8);
    let mut truth = Vec::new();
    let mut predictions = Vec::new();

    for i in 0..images {
        let location = format!("img_{:03}.jpg", i);
        let boxes: Vec<BBox> = (0..rng.gen_range(0..6)).map(|_| random_box(rng)).collect();

        let mut predicted = Vec::new();
        for gt in &boxes {
            for _ in 0..rng.gen_range(0..3) {
                // coarse scores so ties on confidence and on thresholds happen
                let confidence = rng.gen_range(0..=20) as f64 / 20.0;
                predicted.push(Prediction::new(jitter(rng, gt), confidence).unwrap());
            }
        }
        for _ in 0..rng.gen_range(0..3) {
            predicted.push(Prediction::new(random_box(rng), rng.gen_range(0.0..=1.0)).unwrap());
        }

        // some images only exist on one side
        match rng.gen_range(0..10) {
            0 => truth.push(GroundTruthImage::new(location, boxes)),
            1 => predictions.push(PredictedImage::new(location, predicted)),
            _ => {
                truth.push(GroundTruthImage::new(location.clone(), boxes));
                predictions.push(PredictedImage::new(location, predicted));
            }
        }
    }

    (truth, predictions)
}

#[test]
fn test_naive_and_incremental_sweeps_agree() {
    let mut rng = StdRng::seed_from_u64(42);

    for empty_ratio in [EmptyRatio::One, EmptyRatio::Zero] {
        for steps in [1, 4, 10, 20] {
            let config = EvaluationConfig {
                threshold_steps: steps,
                empty_ratio,
                ..Default::default()
            };
            let naive = NaiveSweep::new(config.clone()).unwrap();
            let incremental = IncrementalSweep::new(config).unwrap();

            for _ in 0..25 {
                let (truth, predictions) = random_dataset(&mut rng);
                let dataset = EvaluationDataset::new(&truth, &predictions);

                let a = naive.sweep(&dataset);
                let b = incremental.sweep(&dataset);
                assert_eq!(a.points.len(), steps + 1);
                assert_eq!(b.points.len(), steps + 1);
                assert!(b.stats.iou_evaluations <= a.stats.iou_evaluations);

                for (p, q) in a.points.iter().zip(&b.points) {
                    assert_eq!(p.threshold, q.threshold);
                    assert_eq!(p.counts, q.counts);
                    assert_relative_eq!(p.precision, q.precision, epsilon = 1e-9);
                    assert_relative_eq!(p.recall, q.recall, epsilon = 1e-9);
                }
            }
        }
    }
}

#[test]
fn test_recall_monotone_and_precision_bounded() {
    let mut rng = StdRng::seed_from_u64(5);
    let sweep = IncrementalSweep::new(EvaluationConfig::default()).unwrap();

    for _ in 0..100 {
        let (truth, predictions) = random_dataset(&mut rng);
        let report = sweep.sweep(&EvaluationDataset::new(&truth, &predictions));

        for point in &report.points {
            assert!((0.0..=1.0).contains(&point.precision));
            assert!((0.0..=1.0).contains(&point.recall));
        }
        for pair in report.points.windows(2) {
            assert!(pair[1].recall <= pair[0].recall);
            // lowering the cutoff never loses a true positive
            assert!(pair[1].counts.true_positives <= pair[0].counts.true_positives);
        }
    }
}

#[test]
fn test_iou_properties() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..500 {
        let a = random_box(&mut rng);
        let b = random_box(&mut rng);
        assert_eq!(a.iou(&a), 1.0);
        assert_eq!(a.iou(&b), b.iou(&a));
        assert!((0.0..=1.0).contains(&a.iou(&b)));
    }

    let left = BBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
    let right = BBox::new(10.5, 0.0, 20.0, 10.0).unwrap();
    assert_eq!(left.iou(&right), 0.0);
}

#[test]
fn test_single_image_file_layout() {
    let groundtruth = r#"{"images": [
        {"location": "plane_1.jpg", "annotated_regions": [
            {"tags": ["airplane"], "region_type": "Box", "region": {"xmin": 0, "ymin": 0, "xmax": 10, "ymax": 10}},
            {"tags": ["airplane"], "region_type": "Box", "region": {"xmin": 30, "ymin": 30, "xmax": 40, "ymax": 40}}
        ]}
    ]}"#;
    let predictions = r#"{"images": [
        {"location": "plane_1.jpg", "annotated_regions": [
            {"tags": ["airplane"], "region_type": "Box", "region": {"xmin": 0, "ymin": 0, "xmax": 10, "ymax": 10}, "score": 0.9},
            {"tags": ["airplane"], "region_type": "Box", "region": {"xmin": 31, "ymin": 30, "xmax": 41, "ymax": 40}, "score": 0.45},
            {"tags": ["airplane"], "region_type": "Box", "region": {"xmin": 60, "ymin": 60, "xmax": 70, "ymax": 70}, "score": 0.6}
        ]}
    ]}"#;

    let truth = AnnotationFile::parse(groundtruth).unwrap().into_ground_truth().unwrap();
    let predicted = AnnotationFile::parse(predictions).unwrap().into_predictions().unwrap();
    let dataset = EvaluationDataset::new(&truth, &predicted);

    let scores = PerImageScorer::new(IoUMatcher::new(0.5)).score(&dataset, 0.5);
    assert_eq!(scores[0].result, MatchResult::new(1, 1, 1));

    let report = IncrementalSweep::new(EvaluationConfig::default())
        .unwrap()
        .sweep(&dataset);
    let low = report.point_at(0.0).unwrap();
    assert_eq!(low.counts, MatchResult::new(2, 1, 0));
    assert_relative_eq!(low.precision, 2.0 / 3.0, epsilon = 1e-12);
    assert_eq!(low.recall, 1.0);

    let top = report.point_at(1.0).unwrap();
    assert_eq!(top.counts, MatchResult::new(0, 0, 2));
    assert_eq!(top.precision, 1.0);
    assert_eq!(top.recall, 0.0);
}
