//! One-dimensional interval merge of axle boxes along x

use annotool_core::{Annotation, BBox, Category};

/// Run of axle boxes that sit within the proximity threshold of each other
#[derive(Debug, Clone, PartialEq)]
pub struct AxleCluster {
    /// Members in merge order (ascending `xmin`)
    pub members: Vec<BBox>,
    /// Minimum bounding rectangle of the members
    pub envelope: BBox,
}

impl AxleCluster {
    fn new(first: BBox) -> Self {
        Self {
            members: vec![first],
            envelope: first,
        }
    }

    fn push(&mut self, bbox: BBox) {
        self.envelope = self.envelope.union(&bbox);
        self.members.push(bbox);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_grouped(&self) -> bool {
        self.members.len() > 1
    }

    /// A lone box stays `single_axle` untouched, anything larger becomes
    /// one `grouped_axles` box spanning the members.
    pub fn into_annotation(self) -> Annotation {
        if self.is_grouped() {
            Annotation::new(Category::GroupedAxles, self.envelope)
        } else {
            Annotation::new(Category::SingleAxle, self.members[0])
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMerger {
    threshold: f64,
}

impl ProximityMerger {
    /// `threshold` is expected to be validated through `MergeConfig`
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Partition boxes into clusters, left to right.
    ///
    /// Boxes are visited by ascending `xmin` (stable, so equal `xmin` keeps
    /// input order). A box joins the open cluster when its horizontal gap to
    /// the cluster envelope is at most the threshold, otherwise it opens a
    /// new one.
    /// Once a box misses, no later box can reach the closed cluster.
    pub fn cluster(&self, boxes: &[BBox]) -> Vec<AxleCluster> {
        let mut ordered = boxes.to_vec();
        ordered.sort_by(|a, b| a.xmin.total_cmp(&b.xmin));

        let mut clusters: Vec<AxleCluster> = Vec::new();
        for bbox in ordered {
            match clusters.last_mut() {
                Some(open) if open.envelope.horizontal_gap(&bbox) <= self.threshold => open.push(bbox),
                _ => clusters.push(AxleCluster::new(bbox)),
            }
        }

        clusters
    }

    /// Merged boxes as annotations, left to right
    pub fn merge(&self, boxes: &[BBox]) -> Vec<Annotation> {
        self.cluster(boxes)
            .into_iter()
            .map(AxleCluster::into_annotation)
            .collect()
    }
}
