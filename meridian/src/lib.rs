//! Meridian is the computational geometry core of a GIS data processing toolkit. It provides:
//!
//! * [`spatial indices`](index) that find items by their bounding [`Envelope`]s: an R-tree, a region
//!   quadtree and a quadtree keyed by object ids;
//! * a [`robust segment intersector`](algorithm::LineIntersector) that classifies how two segments intersect
//!   and computes the intersection points with an optional precision model;
//! * [`linear referencing`](linref): addressing points of linear geometries by
//!   [`LinearLocation`](linref::LinearLocation)s, extracting sub-lines, finding the location of a point on a
//!   line and snapping lines to each other.
//!
//! Geometric primitives and map projections live in the [`meridian_types`] crate, which is re-exported from
//! this one.
//!
//! # Example
//!
//! ```
//! use std::ops::ControlFlow;
//! use meridian::index::{RTree, SpatialIndex};
//! use meridian::Envelope;
//!
//! let mut tree = RTree::default();
//! tree.insert(Envelope::new(0.0, 0.0, 1.0, 1.0), "a").unwrap();
//! tree.insert(Envelope::new(5.0, 5.0, 6.0, 6.0), "b").unwrap();
//!
//! let mut found = vec![];
//! let _ = tree.query(&Envelope::new(0.5, 0.5, 2.0, 2.0), |item| {
//!     found.push(*item);
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(found, vec!["a"]);
//! ```

pub mod algorithm;
pub mod error;
pub mod index;
pub mod linref;

pub use error::MeridianError;
pub use meridian_types;
pub use meridian_types::cartesian::{Envelope, Point2};
