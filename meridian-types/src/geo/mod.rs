//! Geographic coordinates (latitude and longitude) (see [`GeoPoint`]), reference ellipsoids and map projections
//! between geographic and planar coordinates (see [`CoordinateProjection`] and [`Crs`]).

mod crs;
mod ellipsoid;
pub mod impls;
mod traits;

pub use crs::{Crs, ProjectionType};
pub use ellipsoid::Ellipsoid;
pub use traits::point::{GeoPoint, NewGeoPoint};
pub use traits::projection::{CoordinateProjection, Projection};
