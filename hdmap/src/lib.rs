//! Builds Apollo HD maps out of the elements an editor draws. Lanes, junctions, signals and the
//! rest arrive as WGS84 GeoJSON; they're projected into a local ENU frame, measured against
//! each other, and written out as `base_map`, a downsampled `sim_map`, and a `routing_map`
//! topology graph. A `base_map` can also be read back into editor elements.

#[macro_use]
mod macros;

mod apollo;
pub mod elements;
pub mod export;
pub mod features;
mod import;
pub mod lane_geometry;
pub mod make;
pub mod overlap;
pub mod proto;
pub mod tool_meta;
mod topo;
mod types;
mod validate;

pub use crate::apollo::{
    to_pt2ds, ApolloMap, ClearArea, Crosswalk, Curve, CurveSegment, Header, Junction, Lane,
    LaneBoundary, LaneBoundaryType, LaneSampleAssociation, Overlap, OverlapInfo, OverlapObject,
    ParkingSpace, PointENU, Road, RoadSection, Signal, SpeedBump, StopSign, VENDOR,
};
pub use crate::elements::{
    ClearAreaFeature, CrosswalkFeature, EditorDocument, EditorMap, JunctionFeature, LaneFeature,
    MapElement, ParkingSpaceFeature, ProjectConfig, RoadDefinition, SignalFeature,
    SpeedBumpFeature, StopSignFeature,
};
pub use crate::export::{export_maps, CancelFlag, ExportBundle, ExportOptions};
pub use crate::import::{parse_base_map, ParsedMap};
pub use crate::make::{
    build_base_map, build_routing_map, build_sim_map, BaseMapBuild, BuildOptions, LaneProblem,
    RoutingConfig,
};
pub use crate::proto::{MapCodec, ProtobufCodec};
pub use crate::tool_meta::{
    decode_tool_meta, encode_tool_meta, sample_bezier, BezierHandles, DecodedToolMeta, ToolMeta,
};
pub use crate::topo::{CurveRange, EdgeDirection, TopoEdge, TopoGraph, TopoNode};
pub use crate::types::{
    BoundaryType, LaneDirection, LaneTurn, LaneType, RoadType, SignalType, StopSignType,
};
pub use crate::validate::{validate_map, Issue, Severity, ValidationReport, ValidationStats};
