use std::{cmp, fmt, ops};

use serde::{Deserialize, Serialize};

/// Meters in the ENU frame, or along the ground for WGS84 measurements. Negative values are
/// allowed; offsets to the right of a line are negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Distance(f64);

// Always finite, so the total order is sound.
impl Eq for Distance {}

#[allow(clippy::derive_ord_xor_partial_ord)]
impl Ord for Distance {
    fn cmp(&self, other: &Distance) -> cmp::Ordering {
        self.partial_cmp(other).unwrap_or(cmp::Ordering::Equal)
    }
}

impl Distance {
    pub const ZERO: Distance = Distance::const_meters(0.0);

    /// NaN and infinities become zero.
    pub fn meters(value: f64) -> Distance {
        if value.is_finite() {
            Distance(value)
        } else {
            Distance::ZERO
        }
    }

    pub const fn const_meters(value: f64) -> Distance {
        Distance(value)
    }

    pub fn inner_meters(self) -> f64 {
        self.0
    }

    pub fn abs(self) -> Distance {
        Distance(self.0.abs())
    }

    pub fn min(self, other: Distance) -> Distance {
        cmp::min(self, other)
    }

    pub fn max(self, other: Distance) -> Distance {
        cmp::max(self, other)
    }

    /// Pins an s-coordinate into `[lo, hi]`.
    pub fn clamp_to(self, lo: Distance, hi: Distance) -> Distance {
        self.max(lo).min(hi)
    }

    /// self / other, or 0 when other is zero.
    pub fn safe_percent(self, other: Distance) -> f64 {
        if other == Distance::ZERO {
            0.0
        } else {
            self.0 / other.0
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

macro_rules! distance_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl ops::$trait for Distance {
            type Output = Distance;

            fn $method(self, other: Distance) -> Distance {
                Distance::meters(self.0 $op other.0)
            }
        }
    };
}

distance_op!(Add, add, +);
distance_op!(Sub, sub, -);

impl ops::AddAssign for Distance {
    fn add_assign(&mut self, other: Distance) {
        *self = *self + other;
    }
}

impl ops::SubAssign for Distance {
    fn sub_assign(&mut self, other: Distance) {
        *self = *self - other;
    }
}

impl ops::Neg for Distance {
    type Output = Distance;

    fn neg(self) -> Distance {
        Distance(-self.0)
    }
}

impl ops::Mul<f64> for Distance {
    type Output = Distance;

    fn mul(self, scalar: f64) -> Distance {
        Distance::meters(self.0 * scalar)
    }
}

impl ops::Mul<Distance> for f64 {
    type Output = Distance;

    fn mul(self, other: Distance) -> Distance {
        other * self
    }
}

impl ops::Div<f64> for Distance {
    type Output = Distance;

    fn div(self, scalar: f64) -> Distance {
        Distance::meters(self.0 / scalar)
    }
}

impl ops::Div for Distance {
    type Output = f64;

    fn div(self, other: Distance) -> f64 {
        self.0 / other.0
    }
}

impl std::iter::Sum for Distance {
    fn sum<I: Iterator<Item = Distance>>(iter: I) -> Distance {
        iter.fold(Distance::ZERO, |a, b| a + b)
    }
}
