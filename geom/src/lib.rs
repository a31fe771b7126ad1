//! Geometry primitives for HD map building: WGS84 coordinates, the local ENU frame they project
//! into, and the lines, polylines, and rings used to measure lanes against other map objects.

mod angle;
mod bounds;
mod distance;
mod gps;
mod line;
mod polyline;
mod projection;
mod pt;
mod ring;

pub use crate::angle::Angle;
pub use crate::bounds::GPSBounds;
pub use crate::distance::Distance;
pub use crate::gps::{gps_length, LonLat};
pub use crate::line::Line;
pub use crate::polyline::PolyLine;
pub use crate::projection::{parse_origin, Projection};
pub use crate::pt::Pt2D;
pub use crate::ring::Ring;

/// Some ENU operations need an epsilon to decide that two points are the same.
pub const EPSILON_DIST: Distance = Distance::const_meters(0.0001);
