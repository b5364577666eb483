use crate::point::Point;
use std::hash::{Hash, Hasher};

// Unit offsets toward each quadrant, scaled by a radius to find quadrant centers
pub const NE: Point = Point(0.5, 0.5);
pub const NW: Point = Point(-0.5, 0.5);
pub const SE: Point = Point(0.5, -0.5);
pub const SW: Point = Point(-0.5, -0.5);

// Bounds is an axis-aligned square
#[derive(Clone, Debug)]
pub struct Bounds {
    pub center: Point,
    // radius runs from the center to the middle of a side
    pub radius: f64,
}

#[derive(Debug)]
pub struct SplitBounds {
    pub ne: Bounds,
    pub nw: Bounds,
    pub se: Bounds,
    pub sw: Bounds,
}

// Spatial is anything that can be stored in a quad tree
pub trait Spatial {
    type Hashed;
    fn distance(&self, point: &Point) -> f64;
    fn intersects(&self, bounds: &Bounds) -> bool;
    // bounded_by is true when self lies entirely inside bounds
    fn bounded_by(&self, bounds: &Bounds) -> bool;
    fn key(&self) -> Self::Hashed;
}

impl Bounds {
    fn min(&self) -> Point {
        Point(self.center.0 - self.radius, self.center.1 - self.radius)
    }

    fn max(&self) -> Point {
        Point(self.center.0 + self.radius, self.center.1 + self.radius)
    }

    pub fn mul(&self, scale: f64) -> Bounds {
        Bounds { center: self.center, radius: self.radius * scale }
    }

    pub fn shift(&self, offset: &Point) -> Bounds {
        Bounds { center: &self.center + offset, radius: self.radius }
    }

    // distance_vector is the per-axis gap from the bounds to point, zero inside
    pub fn distance_vector(&self, point: &Point) -> Point {
        let gap = |value: f64, center: f64| ((value - center).abs() - self.radius).max(0.);
        Point(gap(point.0, self.center.0), gap(point.1, self.center.1))
    }

    pub fn split(&self) -> SplitBounds {
        let quadrant = |direction: Point| Bounds {
            center: &self.center + &direction.mul(self.radius),
            radius: self.radius / 2.,
        };
        SplitBounds { ne: quadrant(NE), nw: quadrant(NW), se: quadrant(SE), sw: quadrant(SW) }
    }

    // contains_bounds is true when other lies entirely within self
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        let (min, max, other_min, other_max) = (self.min(), self.max(), other.min(), other.max());
        other_min.0 >= min.0 && other_max.0 <= max.0 && other_min.1 >= min.1 && other_max.1 <= max.1
    }
}

// Bounds hash and compare by center alone
impl Hash for Bounds {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.center.hash(state);
    }
}

impl PartialEq for Bounds {
    fn eq(&self, other: &Bounds) -> bool {
        self.center == other.center
    }
}

impl Eq for Bounds {}

impl Spatial for Bounds {
    type Hashed = Point;

    fn distance(&self, point: &Point) -> f64 {
        self.distance_vector(point).norm()
    }

    // boxes that only touch do not intersect
    fn intersects(&self, bounds: &Bounds) -> bool {
        let (min, max, other_min, other_max) = (self.min(), self.max(), bounds.min(), bounds.max());
        min.0 < other_max.0 && max.0 > other_min.0 && min.1 < other_max.1 && max.1 > other_min.1
    }

    fn bounded_by(&self, bounds: &Bounds) -> bool {
        bounds.contains_bounds(self)
    }

    fn key(&self) -> Point {
        self.center
    }
}
