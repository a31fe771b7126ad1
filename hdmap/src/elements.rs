//! The editor's view of a map: elements with stable ids and WGS84 GeoJSON geometry, plus the
//! project settings that pin them to an ENU frame. Cross-references between elements are weak,
//! by id.

use anyhow::Result;
use geojson::Feature;
use serde::{Deserialize, Serialize};

use geom::{LonLat, Projection};

use crate::features::{line_feature, point_feature, polygon_feature};
use crate::{
    BoundaryType, LaneDirection, LaneTurn, LaneType, RoadType, SignalType, StopSignType,
};

pub const DEFAULT_LANE_WIDTH: f64 = 3.75;
/// 50km/h
pub const DEFAULT_SPEED_LIMIT: f64 = 13.89;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub name: String,
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub version: String,
    pub date: String,
}

impl ProjectConfig {
    pub fn new<S: Into<String>>(name: S, origin_lat: f64, origin_lon: f64) -> ProjectConfig {
        ProjectConfig {
            name: name.into(),
            origin_lat,
            origin_lon,
            version: "1.0.0".to_string(),
            date: String::new(),
        }
    }

    /// The ENU frame every build of this project uses.
    pub fn projection(&self) -> Result<Projection> {
        Projection::new(self.origin_lat, self.origin_lon)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneFeature {
    pub id: String,
    pub center_line: Feature,
    /// Meters
    #[serde(default = "default_width")]
    pub width: f64,
    /// Meters per second
    #[serde(default = "default_speed_limit")]
    pub speed_limit: f64,
    pub lane_type: LaneType,
    pub turn: LaneTurn,
    pub direction: LaneDirection,
    pub left_boundary_type: BoundaryType,
    pub right_boundary_type: BoundaryType,
    #[serde(default)]
    pub predecessor_ids: Vec<String>,
    #[serde(default)]
    pub successor_ids: Vec<String>,
    #[serde(default)]
    pub left_neighbor_ids: Vec<String>,
    #[serde(default)]
    pub right_neighbor_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_id: Option<String>,
}

impl LaneFeature {
    /// A freshly drawn lane: a 3.75m city driving lane at 50km/h with dotted white lines on
    /// both sides.
    pub fn new<S: Into<String>>(id: S, center_line: &[LonLat]) -> LaneFeature {
        LaneFeature {
            id: id.into(),
            center_line: line_feature(center_line, None),
            width: DEFAULT_LANE_WIDTH,
            speed_limit: DEFAULT_SPEED_LIMIT,
            lane_type: LaneType::CityDriving,
            turn: LaneTurn::NoTurn,
            direction: LaneDirection::Forward,
            left_boundary_type: BoundaryType::DottedWhite,
            right_boundary_type: BoundaryType::DottedWhite,
            predecessor_ids: Vec::new(),
            successor_ids: Vec::new(),
            left_neighbor_ids: Vec::new(),
            right_neighbor_ids: Vec::new(),
            junction_id: None,
            road_id: None,
        }
    }
}

fn default_width() -> f64 {
    DEFAULT_LANE_WIDTH
}

fn default_speed_limit() -> f64 {
    DEFAULT_SPEED_LIMIT
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JunctionFeature {
    pub id: String,
    pub polygon: Feature,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalFeature {
    pub id: String,
    /// Where the signal head is
    pub position: Feature,
    pub stop_line: Feature,
    pub signal_type: SignalType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSignFeature {
    pub id: String,
    pub stop_line: Feature,
    pub stop_sign_type: StopSignType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrosswalkFeature {
    pub id: String,
    pub polygon: Feature,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClearAreaFeature {
    pub id: String,
    pub polygon: Feature,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedBumpFeature {
    pub id: String,
    pub line: Feature,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpaceFeature {
    pub id: String,
    pub polygon: Feature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub road_type: RoadType,
}

/// Any one element, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapElement {
    Lane(LaneFeature),
    Junction(JunctionFeature),
    Signal(SignalFeature),
    StopSign(StopSignFeature),
    Crosswalk(CrosswalkFeature),
    ClearArea(ClearAreaFeature),
    SpeedBump(SpeedBumpFeature),
    ParkingSpace(ParkingSpaceFeature),
}

impl MapElement {
    pub fn id(&self) -> &str {
        match self {
            MapElement::Lane(x) => &x.id,
            MapElement::Junction(x) => &x.id,
            MapElement::Signal(x) => &x.id,
            MapElement::StopSign(x) => &x.id,
            MapElement::Crosswalk(x) => &x.id,
            MapElement::ClearArea(x) => &x.id,
            MapElement::SpeedBump(x) => &x.id,
            MapElement::ParkingSpace(x) => &x.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MapElement::Lane(_) => "lane",
            MapElement::Junction(_) => "junction",
            MapElement::Signal(_) => "signal",
            MapElement::StopSign(_) => "stop_sign",
            MapElement::Crosswalk(_) => "crosswalk",
            MapElement::ClearArea(_) => "clear_area",
            MapElement::SpeedBump(_) => "speed_bump",
            MapElement::ParkingSpace(_) => "parking_space",
        }
    }
}

/// A snapshot of every element in a project, grouped by kind. Builds never mutate it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorMap {
    #[serde(default)]
    pub lanes: Vec<LaneFeature>,
    #[serde(default)]
    pub junctions: Vec<JunctionFeature>,
    #[serde(default)]
    pub signals: Vec<SignalFeature>,
    #[serde(default)]
    pub stop_signs: Vec<StopSignFeature>,
    #[serde(default)]
    pub crosswalks: Vec<CrosswalkFeature>,
    #[serde(default)]
    pub clear_areas: Vec<ClearAreaFeature>,
    #[serde(default)]
    pub speed_bumps: Vec<SpeedBumpFeature>,
    #[serde(default)]
    pub parking_spaces: Vec<ParkingSpaceFeature>,
    #[serde(default)]
    pub roads: Vec<RoadDefinition>,
}

impl EditorMap {
    pub fn new() -> EditorMap {
        EditorMap::default()
    }

    pub fn insert(&mut self, element: MapElement) {
        match element {
            MapElement::Lane(x) => self.lanes.push(x),
            MapElement::Junction(x) => self.junctions.push(x),
            MapElement::Signal(x) => self.signals.push(x),
            MapElement::StopSign(x) => self.stop_signs.push(x),
            MapElement::Crosswalk(x) => self.crosswalks.push(x),
            MapElement::ClearArea(x) => self.clear_areas.push(x),
            MapElement::SpeedBump(x) => self.speed_bumps.push(x),
            MapElement::ParkingSpace(x) => self.parking_spaces.push(x),
        }
    }

    /// Every element, in kind order: lanes, junctions, signals, stop signs, crosswalks, clear
    /// areas, speed bumps, parking spaces.
    pub fn elements(&self) -> Vec<MapElement> {
        let mut result = Vec::new();
        result.extend(self.lanes.iter().cloned().map(MapElement::Lane));
        result.extend(self.junctions.iter().cloned().map(MapElement::Junction));
        result.extend(self.signals.iter().cloned().map(MapElement::Signal));
        result.extend(self.stop_signs.iter().cloned().map(MapElement::StopSign));
        result.extend(self.crosswalks.iter().cloned().map(MapElement::Crosswalk));
        result.extend(self.clear_areas.iter().cloned().map(MapElement::ClearArea));
        result.extend(self.speed_bumps.iter().cloned().map(MapElement::SpeedBump));
        result.extend(
            self.parking_spaces
                .iter()
                .cloned()
                .map(MapElement::ParkingSpace),
        );
        result
    }

    /// (id, kind) of every element, in the same order as `elements`.
    pub fn ids(&self) -> Vec<(&str, &'static str)> {
        let mut result: Vec<(&str, &'static str)> = Vec::new();
        result.extend(self.lanes.iter().map(|x| (x.id.as_str(), "lane")));
        result.extend(self.junctions.iter().map(|x| (x.id.as_str(), "junction")));
        result.extend(self.signals.iter().map(|x| (x.id.as_str(), "signal")));
        result.extend(self.stop_signs.iter().map(|x| (x.id.as_str(), "stop_sign")));
        result.extend(self.crosswalks.iter().map(|x| (x.id.as_str(), "crosswalk")));
        result.extend(self.clear_areas.iter().map(|x| (x.id.as_str(), "clear_area")));
        result.extend(self.speed_bumps.iter().map(|x| (x.id.as_str(), "speed_bump")));
        result.extend(
            self.parking_spaces
                .iter()
                .map(|x| (x.id.as_str(), "parking_space")),
        );
        result
    }

    pub fn lane(&self, id: &str) -> Option<&LaneFeature> {
        self.lanes.iter().find(|l| l.id == id)
    }

    pub fn num_elements(&self) -> usize {
        self.lanes.len()
            + self.junctions.len()
            + self.signals.len()
            + self.stop_signs.len()
            + self.crosswalks.len()
            + self.clear_areas.len()
            + self.speed_bumps.len()
            + self.parking_spaces.len()
    }

    pub fn describe(&self) -> String {
        format!(
            "{} lanes, {} junctions, {} signals, {} stop signs, {} crosswalks, {} clear areas, {} speed bumps, {} parking spaces, {} roads",
            self.lanes.len(),
            self.junctions.len(),
            self.signals.len(),
            self.stop_signs.len(),
            self.crosswalks.len(),
            self.clear_areas.len(),
            self.speed_bumps.len(),
            self.parking_spaces.len(),
            self.roads.len()
        )
    }
}

/// What the editor saves and loads: the project plus all of its elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorDocument {
    pub project: ProjectConfig,
    pub map: EditorMap,
}

impl SignalFeature {
    pub fn new<S: Into<String>>(id: S, position: LonLat, stop_line: &[LonLat]) -> SignalFeature {
        SignalFeature {
            id: id.into(),
            position: point_feature(position),
            stop_line: line_feature(stop_line, None),
            signal_type: SignalType::Mix3Vertical,
        }
    }
}

impl StopSignFeature {
    pub fn new<S: Into<String>>(id: S, stop_line: &[LonLat]) -> StopSignFeature {
        StopSignFeature {
            id: id.into(),
            stop_line: line_feature(stop_line, None),
            stop_sign_type: StopSignType::OneWay,
        }
    }
}

impl JunctionFeature {
    pub fn new<S: Into<String>>(id: S, ring: &[LonLat]) -> JunctionFeature {
        JunctionFeature {
            id: id.into(),
            polygon: polygon_feature(ring, None),
        }
    }
}

impl CrosswalkFeature {
    pub fn new<S: Into<String>>(id: S, ring: &[LonLat]) -> CrosswalkFeature {
        CrosswalkFeature {
            id: id.into(),
            polygon: polygon_feature(ring, None),
        }
    }
}

impl ClearAreaFeature {
    pub fn new<S: Into<String>>(id: S, ring: &[LonLat]) -> ClearAreaFeature {
        ClearAreaFeature {
            id: id.into(),
            polygon: polygon_feature(ring, None),
        }
    }
}

impl SpeedBumpFeature {
    pub fn new<S: Into<String>>(id: S, line: &[LonLat]) -> SpeedBumpFeature {
        SpeedBumpFeature {
            id: id.into(),
            line: line_feature(line, None),
        }
    }
}

impl ParkingSpaceFeature {
    pub fn new<S: Into<String>>(id: S, ring: &[LonLat]) -> ParkingSpaceFeature {
        ParkingSpaceFeature {
            id: id.into(),
            polygon: polygon_feature(ring, None),
            heading: None,
        }
    }
}
