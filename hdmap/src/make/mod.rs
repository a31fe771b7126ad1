//! Turning an `EditorMap` into Apollo's three map artifacts.

mod base_map;
mod downsample;
mod routing_map;
mod sim_map;

pub use self::base_map::{build_base_map, BaseMapBuild, BuildOptions, LaneProblem};
pub use self::downsample::{downsample_by_angle, downsample_by_distance, downsample_points};
pub use self::routing_map::{build_routing_map, RoutingConfig};
pub use self::sim_map::build_sim_map;
