//! Finds the crossings between a few roads given in geographic coordinates and reports where the crossings
//! are along each road.
//!
//! Run with `RUST_LOG=debug` to see the spatial index and intersector logs.

use std::error::Error;
use std::ops::ControlFlow;

use meridian::algorithm::{LineIntersector, PrecisionModel, SegmentIntersection};
use meridian::index::{RTree, RTreeParams, SpatialIndex};
use meridian::linref::{LengthLocationMap, LinearGeometry, LocationIndexedLine};
use meridian::meridian_types::geo::Crs;
use meridian::{Envelope, Point2};

const ROADS: &[(&str, &[(f64, f64)])] = &[
    ("ring", &[(9.10, 45.45), (9.20, 45.44), (9.25, 45.48), (9.15, 45.52), (9.10, 45.45)]),
    ("north-south", &[(9.17, 45.40), (9.18, 45.47), (9.19, 45.55)]),
    ("east-west", &[(9.05, 45.49), (9.30, 45.47)]),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let projection = Crs::utm(32, true)?.get_projection()?;
    let mut roads = vec![];
    for (name, coords) in ROADS {
        let points = coords
            .iter()
            .map(|&(lon, lat)| projection.forward(lon, lat).map(|(x, y)| Point2::new(x, y)))
            .collect::<Result<Vec<_>, _>>()?;
        roads.push((*name, LocationIndexedLine::new(LinearGeometry::line(points))));
    }

    let mut index = RTree::new(RTreeParams::default().with_max_entries(4))?;
    for (road_index, (_, line)) in roads.iter().enumerate() {
        for (segment_index, pair) in line.geometry().parts()[0].windows(2).enumerate() {
            index.insert(Envelope::from_segment(&pair[0], &pair[1]), (road_index, segment_index))?;
        }
    }

    let intersector = LineIntersector::new().with_precision_model(PrecisionModel::fixed(100.0));
    for (road_index, (name, line)) in roads.iter().enumerate() {
        let lengths = LengthLocationMap::new(line.geometry());

        for pair in line.geometry().parts()[0].windows(2) {
            let segment_envelope = Envelope::from_segment(&pair[0], &pair[1]);
            let _ = index.query(&segment_envelope, |&(other, other_segment)| {
                if other <= road_index {
                    return ControlFlow::Continue(());
                }

                let (other_name, other_line) = &roads[other];
                let other_points = &other_line.geometry().parts()[0];
                let result = intersector.compute_segments(
                    &pair[0],
                    &pair[1],
                    &other_points[other_segment],
                    &other_points[other_segment + 1],
                );

                if let SegmentIntersection::Point { point, .. } = result {
                    let location = line.index_of(&point);
                    log::info!(
                        "{name} crosses {other_name} at {:.2}, {:.2}, {:.0} m along it",
                        point.coords()[0],
                        point.coords()[1],
                        lengths.length_of(&location),
                    );
                }

                ControlFlow::Continue(())
            });
        }
    }

    Ok(())
}
