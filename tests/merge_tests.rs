// tests/merge_tests.rs
use annotool_core::{annotations::data, AnnotatedImage, Annotation, AnnotationFile, BBox, Category};
use annotool_cv::{AxleMerger, MergeConfig, ProximityMerger};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_axles(rng: &mut StdRng, count: usize) -> Vec<BBox> {
    (0..count)
        .map(|_| {
            let xmin = rng.gen_range(0.0..0.9);
            let width = rng.gen_range(0.005..0.08);
            let ymin = rng.gen_range(0.5..0.8);
            let height = rng.gen_range(0.02..0.15);
            BBox::new(xmin, ymin, xmin + width, ymin + height).unwrap()
        })
        .collect()
}

#[test]
fn test_every_axle_lands_in_exactly_one_output_box() {
    let mut rng = StdRng::seed_from_u64(7);
    let merger = ProximityMerger::new(0.01);

    for _ in 0..200 {
        let count = rng.gen_range(0..12);
        let axles = random_axles(&mut rng, count);
        let clusters = merger.cluster(&axles);

        assert_eq!(clusters.iter().map(|c| c.len()).sum::<usize>(), axles.len());
        for axle in &axles {
            let holders = clusters.iter().filter(|c| c.members.contains(axle)).count();
            assert_eq!(holders, 1);
        }

        let output = merger.merge(&axles);
        assert_eq!(output.len(), clusters.len());
        for axle in &axles {
            let covering = output.iter().filter(|a| a.bbox.contains(axle)).count();
            assert_eq!(covering, 1);
        }

        // Any point inside an input box is inside some output box, so the
        // output union covers the input union.
        for axle in &axles {
            for _ in 0..4 {
                let x = rng.gen_range(axle.xmin..=axle.xmax);
                let y = rng.gen_range(axle.ymin..=axle.ymax);
                assert!(output.iter().any(|a| {
                    a.bbox.xmin <= x && x <= a.bbox.xmax && a.bbox.ymin <= y && y <= a.bbox.ymax
                }));
            }
        }
    }
}

#[test]
fn test_clusters_respect_gap_on_both_sides() {
    let mut rng = StdRng::seed_from_u64(11);
    let threshold = 0.01;
    let merger = ProximityMerger::new(threshold);

    for _ in 0..200 {
        let count = rng.gen_range(1..15);
        let clusters = merger.cluster(&random_axles(&mut rng, count));

        for cluster in &clusters {
            let mut reach = cluster.members[0];
            for member in &cluster.members[1..] {
                assert!(reach.horizontal_gap(member) <= threshold);
                reach = reach.union(member);
            }
            assert_eq!(reach, cluster.envelope);
        }

        for pair in clusters.windows(2) {
            assert!(pair[0].envelope.horizontal_gap(&pair[1].members[0]) > threshold);
        }
    }
}

#[test]
fn test_merging_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(23);
    let merger = ProximityMerger::new(0.01);

    for _ in 0..200 {
        let count = rng.gen_range(0..15);
        let once: Vec<BBox> = merger
            .merge(&random_axles(&mut rng, count))
            .into_iter()
            .map(|annotation| annotation.bbox)
            .collect();

        let twice = merger.cluster(&once);
        assert_eq!(twice.len(), once.len());
        assert!(twice.iter().all(|c| !c.is_grouped()));
    }
}

#[test]
fn test_documented_example() {
    let axle = |xmin: f64, xmax: f64| {
        Annotation::new(Category::SingleAxle, BBox::new(xmin, 0.7, xmax, 0.8).unwrap())
    };
    let car = Annotation::new(Category::Car, BBox::new(0.2, 0.2, 0.6, 0.8).unwrap());
    let image = AnnotatedImage::new("truck.jpg", vec![axle(0.50, 0.55), car, axle(0.405, 0.45), axle(0.30, 0.40)]);

    let merger = AxleMerger::new(MergeConfig::default()).unwrap();
    let merged = merger.merge_image(&image).unwrap();

    assert_eq!(merged.annotations.len(), 3);
    assert_eq!(merged.annotations[0], car);
    assert_eq!(merged.annotations[1].category, Category::GroupedAxles);
    assert_eq!(merged.annotations[1].bbox, BBox::new(0.30, 0.7, 0.45, 0.8).unwrap());
    assert_eq!(merged.annotations[2], axle(0.50, 0.55));

    // the input image is left as it was
    assert_eq!(image.annotations.len(), 4);
}

#[test]
fn test_merge_file_round_trip() {
    let json = r#"{"images": [
        {"location": "a.jpg", "annotated_regions": [
            {"tags": ["other"], "region_type": "Box", "region": {"xmin": 0.0, "ymin": 0.0, "xmax": 0.1, "ymax": 0.1}},
            {"tags": ["single_axle"], "region_type": "Box", "region": {"xmin": 0.1, "ymin": 0.6, "xmax": 0.2, "ymax": 0.7}},
            {"tags": ["single_axle"], "region_type": "Box", "region": {"xmin": 0.205, "ymin": 0.6, "xmax": 0.3, "ymax": 0.7}}
        ]},
        {"location": "b.jpg", "annotated_regions": []}
    ]}"#;
    let images = AnnotationFile::parse(json).unwrap().into_annotated_images().unwrap();
    let (merged, summary) = AxleMerger::new(MergeConfig::default())
        .unwrap()
        .merge_dataset(&images)
        .unwrap();
    assert_eq!(summary.groups_created, 1);

    let path = std::env::temp_dir().join(format!("annotool-merge-{}.json", std::process::id()));
    data::save_annotated_images(&path, &merged, true).unwrap();
    let reloaded = data::load_annotated_images(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(reloaded, merged);
    let categories: Vec<Category> = reloaded[0].annotations.iter().map(|a| a.category).collect();
    assert_eq!(categories, vec![Category::Other, Category::GroupedAxles]);
}

#[test]
fn test_unknown_category_is_rejected_at_load() {
    let json = r#"{"images": [{"location": "a.jpg", "annotated_regions": [
        {"tags": ["bicycle"], "region": {"xmin": 0.0, "ymin": 0.0, "xmax": 0.1, "ymax": 0.1}}
    ]}]}"#;
    let err = AnnotationFile::parse(json).unwrap().into_annotated_images().unwrap_err();
    assert_eq!(err.to_string(), "unknown category 'bicycle'");
}
