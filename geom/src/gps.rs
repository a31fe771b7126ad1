use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Distance;

const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS84 coordinate. Longitude is x, latitude is y.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    /// Haversine distance on a spherical earth.
    pub fn gps_dist(self, other: LonLat) -> Distance {
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(EARTH_RADIUS_M * c)
    }

    /// Initial compass bearing towards `other`, in degrees in (-180, 180], clockwise from north.
    pub fn bearing_to(self, other: LonLat) -> f64 {
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let y = (lon2 - lon1).sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon2 - lon1).cos();
        y.atan2(x).to_degrees()
    }

    /// Linear interpolation between two points. Only meaningful over short distances.
    pub fn lerp(self, other: LonLat, pct: f64) -> LonLat {
        LonLat::new(
            self.longitude + pct * (other.longitude - self.longitude),
            self.latitude + pct * (other.latitude - self.latitude),
        )
    }

    pub fn center(pts: &[LonLat]) -> LonLat {
        let mut lon = 0.0;
        let mut lat = 0.0;
        for pt in pts {
            lon += pt.longitude;
            lat += pt.latitude;
        }
        let len = pts.len() as f64;
        LonLat {
            longitude: lon / len,
            latitude: lat / len,
        }
    }

    pub fn is_finite(self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    /// GeoJSON position order.
    pub fn to_geojson_position(self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// Sum of Haversine lengths along a WGS84 line.
pub fn gps_length(pts: &[LonLat]) -> Distance {
    pts.windows(2).map(|pair| pair[0].gps_dist(pair[1])).sum()
}
