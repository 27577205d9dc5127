use thiserror::Error;

/// Rejections raised at the parse-and-validate boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("malformed box ({xmin}, {ymin}, {xmax}, {ymax}): {reason}")]
    MalformedBox {
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
        reason: &'static str,
    },

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("category '{0}' is not allowed in merger input")]
    SynthesizedCategoryInInput(String),

    #[error("region in '{location}' has {count} tags, expected exactly one")]
    TagCount { location: String, count: usize },

    #[error("unsupported region type '{0}', only 'Box' is handled")]
    UnsupportedRegionType(String),

    #[error("prediction in '{0}' has no score")]
    MissingScore(String),

    #[error("confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("image location '{0}' appears more than once")]
    DuplicateImage(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
