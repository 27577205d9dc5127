//! Axis-aligned boxes in corner form.

use crate::ValidationError;
use serde::{Deserialize, Serialize};

/// Corner coordinates as they appear in a file, not yet checked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// Axis-aligned rectangle, `xmin <= xmax` and `ymin <= ymax`.
///
/// Units are whatever the dataset uses (normalized or pixels). Every way in,
/// [`BBox::new`] or deserialization through [`Corners`], checks the corner
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Corners")]
pub struct BBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BBox {
    /// Create a box, rejecting inverted or non-finite corners
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self, ValidationError> {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
        .validate()
    }

    fn validate(self) -> Result<Self, ValidationError> {
        let reason = if ![self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|v| v.is_finite())
        {
            Some("coordinates must be finite")
        } else if self.xmin > self.xmax {
            Some("xmin > xmax")
        } else if self.ymin > self.ymax {
            Some("ymin > ymax")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ValidationError::MalformedBox {
                xmin: self.xmin,
                ymin: self.ymin,
                xmax: self.xmax,
                ymax: self.ymax,
                reason,
            }),
            None => Ok(self),
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Area shared with another box, 0 when they do not overlap
    pub fn intersection_area(&self, other: &BBox) -> f64 {
        let x1 = self.xmin.max(other.xmin);
        let y1 = self.ymin.max(other.ymin);
        let x2 = self.xmax.min(other.xmax);
        let y2 = self.ymax.min(other.ymax);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        (x2 - x1) * (y2 - y1)
    }

    /// Calculate intersection over union (IoU) with another box
    ///
    /// Returns 0 for disjoint boxes. A zero-area box has no intersection with
    /// anything, itself included, so its IoU with itself is 0 rather than 1.
    pub fn iou(&self, other: &BBox) -> f64 {
        let intersection = self.intersection_area(other);
        if intersection == 0.0 {
            return 0.0;
        }

        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }

        intersection / union
    }

    /// Minimum bounding rectangle of both boxes
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            xmin: self.xmin.min(other.xmin),
            ymin: self.ymin.min(other.ymin),
            xmax: self.xmax.max(other.xmax),
            ymax: self.ymax.max(other.ymax),
        }
    }

    /// True when `other` lies entirely inside this box (edges included)
    pub fn contains(&self, other: &BBox) -> bool {
        self.xmin <= other.xmin
            && self.ymin <= other.ymin
            && self.xmax >= other.xmax
            && self.ymax >= other.ymax
    }

    /// Signed horizontal distance from this box's right edge to `other`'s left edge.
    /// Negative when the boxes overlap along x.
    pub fn horizontal_gap(&self, other: &BBox) -> f64 {
        other.xmin - self.xmax
    }
}

impl TryFrom<Corners> for BBox {
    type Error = ValidationError;

    fn try_from(corners: Corners) -> Result<Self, Self::Error> {
        BBox::new(corners.xmin, corners.ymin, corners.xmax, corners.ymax)
    }
}

impl From<BBox> for Corners {
    fn from(bbox: BBox) -> Self {
        Corners {
            xmin: bbox.xmin,
            ymin: bbox.ymin,
            xmax: bbox.xmax,
            ymax: bbox.ymax,
        }
    }
}
