mod point;

pub use point::{Point2, Vector2};
