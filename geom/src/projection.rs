//! A Transverse Mercator projection on the WGS84 ellipsoid, centered at a project origin. This
//! defines the local ENU frame that every HD map coordinate is expressed in.
//!
//! The series expansions are Krüger's, carried to 6th order in the third flattening (Karney
//! 2011, "Transverse Mercator with an accuracy of a few nanometers"). That's far below the
//! millimeter tolerance needed to round-trip hand-drawn geometry.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{LonLat, Pt2D};

const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const SCALE_FACTOR: f64 = 1.0;
const NEWTON_ITERATIONS: usize = 10;

/// Converts between WGS84 and the ENU frame of one origin. Construct one per build and pass it
/// to everything that needs ENU coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Projection {
    origin_lat: f64,
    origin_lon: f64,
    /// Northing of the origin, subtracted so the origin maps to (0, 0)
    false_northing: f64,
    ecc: f64,
    rectifying_radius: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl Projection {
    pub fn new(origin_lat: f64, origin_lon: f64) -> Result<Projection> {
        if !origin_lat.is_finite() || !origin_lon.is_finite() {
            bail!("Projection origin ({}, {}) isn't finite", origin_lat, origin_lon);
        }
        if origin_lat.abs() >= 90.0 {
            bail!("Projection origin latitude {} is out of range", origin_lat);
        }
        if origin_lon.abs() > 180.0 {
            bail!("Projection origin longitude {} is out of range", origin_lon);
        }

        let n = FLATTENING / (2.0 - FLATTENING);
        let (n2, n3) = (n * n, n * n * n);
        let (n4, n5, n6) = (n3 * n, n3 * n2, n3 * n3);

        let rectifying_radius =
            SEMI_MAJOR_AXIS / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);
        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];
        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        let mut proj = Projection {
            origin_lat,
            origin_lon,
            false_northing: 0.0,
            ecc: (FLATTENING * (2.0 - FLATTENING)).sqrt(),
            rectifying_radius,
            alpha,
            beta,
        };
        proj.false_northing = proj.forward(origin_lat.to_radians(), 0.0).1;
        Ok(proj)
    }

    /// Reads the origin back out of a proj string; see `parse_origin`.
    pub fn from_proj_string(proj: &str) -> Option<Projection> {
        let (lat, lon) = parse_origin(proj)?;
        Projection::new(lat, lon).ok()
    }

    pub fn origin(&self) -> LonLat {
        LonLat::new(self.origin_lon, self.origin_lat)
    }

    /// The proj string embedded in map headers.
    pub fn proj_string(&self) -> String {
        format!(
            "+proj=tmerc +lat_0={} +lon_0={} +k=1 +ellps=WGS84 +no_defs",
            self.origin_lat, self.origin_lon
        )
    }

    pub fn to_enu(&self, gps: LonLat) -> Pt2D {
        let (x, y) = self.forward(
            gps.latitude.to_radians(),
            (gps.longitude - self.origin_lon).to_radians(),
        );
        Pt2D::new(x, y - self.false_northing)
    }

    pub fn to_lon_lat(&self, pt: Pt2D) -> LonLat {
        let scale = SCALE_FACTOR * self.rectifying_radius;
        let xi = (pt.y() + self.false_northing) / scale;
        let eta = pt.x() / scale;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let lambda = eta_p.sinh().atan2(xi_p.cos());
        let tau_p = xi_p.sin() / (eta_p.sinh().powi(2) + xi_p.cos().powi(2)).sqrt();

        let e = self.ecc;
        let one_minus_e2 = 1.0 - e * e;
        let mut tau = tau_p;
        for _ in 0..NEWTON_ITERATIONS {
            let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
            let tau_i = tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt();
            let delta = (tau_p - tau_i) / (1.0 + tau_i * tau_i).sqrt()
                * (1.0 + one_minus_e2 * tau * tau)
                / (one_minus_e2 * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < 1e-14 {
                break;
            }
        }

        LonLat::new(
            self.origin_lon + lambda.to_degrees(),
            tau.atan().to_degrees(),
        )
    }

    pub fn to_enu_pts(&self, pts: &[LonLat]) -> Vec<Pt2D> {
        pts.iter().map(|pt| self.to_enu(*pt)).collect()
    }

    pub fn to_lon_lat_pts(&self, pts: &[Pt2D]) -> Vec<LonLat> {
        pts.iter().map(|pt| self.to_lon_lat(*pt)).collect()
    }

    /// Latitude and longitude relative to the central meridian, both in radians. Returns
    /// (easting, northing) without the false northing applied.
    fn forward(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let e = self.ecc;
        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - e * (e * sin_phi).atanh()).sinh();
        let xi_p = t.atan2(lambda.cos());
        let eta_p = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let scale = SCALE_FACTOR * self.rectifying_radius;
        (scale * eta, scale * xi)
    }
}

/// Extracts `(lat_0, lon_0)` from a proj string like
/// `+proj=tmerc +lat_0=37.4 +lon_0=-122.0 +k=1 +ellps=WGS84 +no_defs`. Both must be present.
pub fn parse_origin(proj: &str) -> Option<(f64, f64)> {
    let param = |key: &str| -> Option<f64> {
        proj.split_whitespace()
            .find_map(|token| token.strip_prefix(key))
            .and_then(|value| value.parse::<f64>().ok())
    };
    Some((param("+lat_0=")?, param("+lon_0=")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn shoreline() -> Projection {
        Projection::new(37.4153, -122.0119).unwrap()
    }

    #[test]
    fn origin_is_zero() {
        let proj = shoreline();
        let pt = proj.to_enu(LonLat::new(-122.0119, 37.4153));
        assert!(pt.x().abs() < 1e-9 && pt.y().abs() < 1e-9, "{}", pt);
    }

    #[test]
    fn axes_point_east_and_north() {
        let proj = shoreline();
        // About 111km per degree of latitude here
        let north = proj.to_enu(LonLat::new(-122.0119, 37.4153 + 0.001));
        assert!(north.x().abs() < 1e-6);
        assert!((north.y() - 110.99).abs() < 0.1, "{}", north);

        let east = proj.to_enu(LonLat::new(-122.0119 + 0.001, 37.4153));
        assert!(east.x() > 88.3 && east.x() < 88.8, "{}", east);
        // Meridian convergence bends the parallel slightly north
        assert!(east.y().abs() < 0.01);
    }

    #[test]
    fn round_trip_is_sub_millimeter() {
        let proj = shoreline();
        let mut rng = XorShiftRng::seed_from_u64(42);
        for _ in 0..1000 {
            let gps = LonLat::new(
                -122.0119 + rng.gen_range(-0.2..0.2),
                37.4153 + rng.gen_range(-0.2..0.2),
            );
            let back = proj.to_lon_lat(proj.to_enu(gps));
            assert!(gps.gps_dist(back).inner_meters() < 1e-6, "{} vs {}", gps, back);
        }
    }

    #[test]
    fn proj_string_round_trip() {
        let proj = shoreline();
        assert_eq!(
            proj.proj_string(),
            "+proj=tmerc +lat_0=37.4153 +lon_0=-122.0119 +k=1 +ellps=WGS84 +no_defs"
        );
        assert_eq!(parse_origin(&proj.proj_string()), Some((37.4153, -122.0119)));
        assert!(Projection::from_proj_string("+proj=utm +zone=10").is_none());
        assert_eq!(
            Projection::new(0.0, 0.0).unwrap().proj_string(),
            "+proj=tmerc +lat_0=0 +lon_0=0 +k=1 +ellps=WGS84 +no_defs"
        );
    }

    #[test]
    fn bad_origins() {
        assert!(Projection::new(f64::NAN, 0.0).is_err());
        assert!(Projection::new(90.0, 0.0).is_err());
        assert!(Projection::new(10.0, 181.0).is_err());
    }
}
