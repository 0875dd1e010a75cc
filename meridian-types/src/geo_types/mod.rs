//! Implementations of the crate traits for [`geo_types`] geometries.

mod linestring;
mod multi_linestring;
mod point;
