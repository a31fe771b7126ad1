use serde::{Deserialize, Serialize};

use crate::LonLat;

/// The extent of some WGS84 points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GPSBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GPSBounds {
    pub fn new() -> GPSBounds {
        GPSBounds {
            min_lon: f64::MAX,
            min_lat: f64::MAX,
            max_lon: f64::MIN,
            max_lat: f64::MIN,
        }
    }

    pub fn from(pts: &[LonLat]) -> GPSBounds {
        let mut b = GPSBounds::new();
        for pt in pts {
            b.update(*pt);
        }
        b
    }

    pub fn update(&mut self, pt: LonLat) {
        self.min_lon = self.min_lon.min(pt.longitude);
        self.max_lon = self.max_lon.max(pt.longitude);
        self.min_lat = self.min_lat.min(pt.latitude);
        self.max_lat = self.max_lat.max(pt.latitude);
    }

    /// True if no points have been added.
    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon
    }

    pub fn contains(&self, pt: LonLat) -> bool {
        pt.longitude >= self.min_lon
            && pt.longitude <= self.max_lon
            && pt.latitude >= self.min_lat
            && pt.latitude <= self.max_lat
    }
}

impl Default for GPSBounds {
    fn default() -> Self {
        GPSBounds::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_extent() {
        let mut b = GPSBounds::new();
        assert!(b.is_empty());
        b.update(LonLat::new(-122.0, 37.4));
        b.update(LonLat::new(-122.1, 37.5));
        assert!(!b.is_empty());
        assert_eq!(b.min_lon, -122.1);
        assert_eq!(b.max_lat, 37.5);
        assert!(b.contains(LonLat::new(-122.05, 37.45)));
        assert!(!b.contains(LonLat::new(-121.9, 37.45)));
    }
}
