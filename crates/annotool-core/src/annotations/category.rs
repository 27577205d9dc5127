use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label vocabulary of the vehicle annotation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Car,
    Other,
    SingleAxle,
    /// Only ever produced by the axle merger.
    GroupedAxles,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Car,
        Category::Other,
        Category::SingleAxle,
        Category::GroupedAxles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Car => "car",
            Category::Other => "other",
            Category::SingleAxle => "single_axle",
            Category::GroupedAxles => "grouped_axles",
        }
    }

    /// Whether the label may appear in a source annotation file
    pub fn is_input(&self) -> bool {
        !matches!(self, Category::GroupedAxles)
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
