//! Trait based geometric primitives used by the `meridian` crate.
//!
//! The crate provides:
//!
//! * cartesian points, vectors and axis-aligned [`Envelope`](cartesian::Envelope)s with robust orientation
//!   predicates (see [`cartesian`] module);
//! * [`Contour`](contour::Contour) and [`MultiContour`](multi_contour::MultiContour) traits describing linear
//!   geometries, with simple implementations in [`impls`] module and implementations for `geo-types` geometries
//!   (behind the `geo-types` feature);
//! * geographic points, reference ellipsoids and map projections (see [`geo`] module).
//!
//! Any type can be used with the rest of the library by implementing the corresponding traits. For example, to use
//! your own point type as a vertex of a line, implement [`CartesianPoint2d`](cartesian::CartesianPoint2d) for it.


pub mod cartesian;
pub mod contour;
pub mod error;
pub mod geo;
pub mod impls;
pub mod multi_contour;
pub mod segment;

#[cfg(feature = "geo-types")]
mod geo_types;

pub use error::ProjectionError;
pub use segment::Segment;
