pub mod bbox;

pub use bbox::{BBox, Corners};
