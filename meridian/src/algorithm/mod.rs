//! Robust computational geometry algorithms.

mod intersector;
mod precision;

pub use intersector::{edge_distance, LineIntersector, SegmentIntersection};
pub use precision::PrecisionModel;
