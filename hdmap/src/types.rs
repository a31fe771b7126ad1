//! Apollo's enumerations. The discriminants are the wire values of `map.proto`, so these derive
//! `prost::Enumeration` and are used directly by the codec. In JSON they're spelled the way the
//! proto names them.

use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    prost::Enumeration,
)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaneType {
    None = 1,
    CityDriving = 2,
    Biking = 3,
    Sidewalk = 4,
    Parking = 5,
    Shoulder = 6,
    Shared = 7,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    prost::Enumeration,
)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaneTurn {
    NoTurn = 1,
    LeftTurn = 2,
    RightTurn = 3,
    UTurn = 4,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    prost::Enumeration,
)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaneDirection {
    Forward = 1,
    Backward = 2,
    Bidirection = 3,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    prost::Enumeration,
)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundaryType {
    Unknown = 0,
    DottedYellow = 1,
    DottedWhite = 2,
    SolidYellow = 3,
    SolidWhite = 4,
    DoubleYellow = 5,
    Curb = 6,
}

impl BoundaryType {
    /// Lane changes are only legal across dotted lines.
    pub fn allows_lane_change(self) -> bool {
        matches!(self, BoundaryType::DottedYellow | BoundaryType::DottedWhite)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    prost::Enumeration,
)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoadType {
    Unknown = 0,
    Highway = 1,
    CityRoad = 2,
    Park = 3,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    prost::Enumeration,
)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Unknown = 1,
    #[serde(rename = "MIX_2_HORIZONTAL")]
    Mix2Horizontal = 2,
    #[serde(rename = "MIX_2_VERTICAL")]
    Mix2Vertical = 3,
    #[serde(rename = "MIX_3_HORIZONTAL")]
    Mix3Horizontal = 4,
    #[serde(rename = "MIX_3_VERTICAL")]
    Mix3Vertical = 5,
    Single = 6,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    prost::Enumeration,
)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopSignType {
    Unknown = 0,
    OneWay = 1,
    TwoWay = 2,
    ThreeWay = 3,
    FourWay = 4,
    AllWay = 5,
}
