//! Types and functions on geometries in cartesian coordinates.

mod envelope;
mod impls;
mod orient;
mod robust;
mod traits;

pub use envelope::Envelope;
pub use impls::{Point2, Vector2};
pub use orient::Orientation;
pub use traits::*;
