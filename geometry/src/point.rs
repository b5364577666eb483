use common::{fmt_float, DEFAULT_F64_MARGIN};
use float_cmp::ApproxEq;
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Sub},
};

pub const ORIGIN: Point = Point(0., 0.);

const DISPLAY_PRECISION: u32 = 2;

// Point compares approximately, so two points within DEFAULT_F64_MARGIN are equal
#[derive(Clone, Copy, Debug)]
pub struct Point(pub f64, pub f64);

impl Point {
    // from_polar builds the point at distance r from the origin in direction angle
    pub fn from_polar(r: f64, angle: f64) -> Point {
        Point(r * angle.cos(), r * angle.sin())
    }

    pub fn arg(&self) -> f64 {
        self.1.atan2(self.0)
    }

    pub fn mul(&self, scale: f64) -> Point {
        Point(self.0 * scale, self.1 * scale)
    }

    pub fn norm(&self) -> f64 {
        self.0.hypot(self.1)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self - other).norm()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        (self + other).mul(0.5)
    }

    // compare is a total order on points: by x, then by y
    pub fn compare(&self, other: &Point) -> Ordering {
        let by_x = self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal);
        by_x.then(self.1.partial_cmp(&other.1).unwrap_or(Ordering::Equal))
    }
}

impl Add for &Point {
    type Output = Point;
    fn add(self, other: &Point) -> Point {
        Point(self.0 + other.0, self.1 + other.1)
    }
}

impl Sub for &Point {
    type Output = Point;
    fn sub(self, other: &Point) -> Point {
        Point(self.0 - other.0, self.1 - other.1)
    }
}

impl ApproxEq for Point {
    type Margin = float_cmp::F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        0_f64.approx_eq(self.distance(&other), margin)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Point) -> bool {
        self.0.approx_eq(other.0, DEFAULT_F64_MARGIN) && self.1.approx_eq(other.1, DEFAULT_F64_MARGIN)
    }
}

impl Eq for Point {}

// Hash buckets coordinates by the equality margin
impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in [self.0, self.1].iter() {
            ((value / DEFAULT_F64_MARGIN.0).round() as i64).hash(state);
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", fmt_float(self.0, DISPLAY_PRECISION), fmt_float(self.1, DISPLAY_PRECISION))
    }
}
