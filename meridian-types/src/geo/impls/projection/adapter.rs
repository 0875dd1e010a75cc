use std::marker::PhantomData;

use crate::cartesian::NewCartesianPoint2d;
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::{CoordinateProjection, Projection};

/// Uses a [`CoordinateProjection`] as a point [`Projection`] between any geographic point type `In` and any
/// cartesian point type `Out`.
///
/// ```
/// use meridian_types::cartesian::{CartesianPoint2d, Point2};
/// use meridian_types::geo::impls::projection::{PointProjection, WebMercator};
/// use meridian_types::geo::impls::GeoPoint2d;
/// use meridian_types::geo::Projection;
///
/// let projection = PointProjection::<_, GeoPoint2d, Point2>::new(WebMercator::default());
/// let projected = projection.project(&GeoPoint2d::new(0.0, 0.0)).unwrap();
/// assert_eq!(projected.x(), 0.0);
/// ```
pub struct PointProjection<C, In, Out> {
    inner: C,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<C, In, Out> PointProjection<C, In, Out> {
    /// Wraps the coordinate projection.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }

    /// The wrapped coordinate projection.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C, In, Out> Projection for PointProjection<C, In, Out>
where
    C: CoordinateProjection,
    In: NewGeoPoint<f64>,
    Out: NewCartesianPoint2d<f64>,
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let (x, y) = self.inner.forward(input.lon(), input.lat()).ok()?;
        Some(Out::new(x, y))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let (lon, lat) = self.inner.inverse(input.x(), input.y()).ok()?;
        Some(In::lonlat(lon, lat))
    }
}
