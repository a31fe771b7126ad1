use std::fmt;

use serde::{Deserialize, Serialize};

/// An angle, stored in radians, measured counter-clockwise from east (the ENU x axis).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn new_rads(rads: f64) -> Angle {
        Angle(rads)
    }

    pub fn degrees(degs: f64) -> Angle {
        Angle(degs.to_radians())
    }

    /// Converts a compass bearing (degrees clockwise from north) to the math convention.
    /// The result is not normalized.
    pub fn from_bearing(bearing_degrees: f64) -> Angle {
        Angle::degrees(90.0 - bearing_degrees)
    }

    pub fn rotate_degs(self, degrees: f64) -> Angle {
        Angle(self.0 + degrees.to_radians())
    }

    /// The raw value, as constructed.
    pub fn radians(self) -> f64 {
        self.0
    }

    /// [0, 2pi)
    pub fn normalized_radians(self) -> f64 {
        self.0.rem_euclid(2.0 * std::f64::consts::PI)
    }

    /// [0, 360)
    pub fn normalized_degrees(self) -> f64 {
        self.normalized_radians().to_degrees()
    }

    pub fn shortest_rotation_towards(self, other: Angle) -> Angle {
        // https://math.stackexchange.com/questions/110080/shortest-way-to-achieve-target-angle
        Angle::degrees(
            ((self.normalized_degrees() - other.normalized_degrees() + 540.0) % 360.0) - 180.0,
        )
    }

    /// True if the two angles are within some degrees of each other.
    pub fn approx_eq(self, other: Angle, within_degrees: f64) -> bool {
        self.shortest_rotation_towards(other).0.abs().to_degrees() < within_degrees
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.normalized_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearings() {
        assert!((Angle::from_bearing(0.0).radians() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(Angle::from_bearing(90.0).radians().abs() < 1e-12);
        assert!(Angle::from_bearing(180.0).approx_eq(Angle::degrees(270.0), 1e-6));
        assert!(Angle::degrees(359.5).approx_eq(Angle::degrees(0.2), 1.0));
    }
}
