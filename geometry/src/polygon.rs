use crate::{
    bounds::Bounds,
    edge::Edge,
    point::Point,
};
use geo::{Area, BooleanOps, Coord, LineString, Polygon as GeoPolygon};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<BBox> {
        points.into_iter().fold(None, |bbox, point| {
            let point_bbox = BBox { min_x: point.0, min_y: point.1, max_x: point.0, max_y: point.1 };
            Some(match bbox {
                None => point_bbox,
                Some(bbox) => bbox.merge(&point_bbox),
            })
        })
    }

    pub fn merge(&self, other: &BBox) -> BBox {
        BBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point((self.min_x + self.max_x) / 2., (self.min_y + self.max_y) / 2.)
    }

    // intersects treats touching boxes as intersecting
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x &&
        self.min_y <= other.max_y && self.max_y >= other.min_y
    }

    pub fn intersects_bounds(&self, bounds: &Bounds) -> bool {
        self.min_x <= bounds.center.0 + bounds.radius && self.max_x >= bounds.center.0 - bounds.radius &&
        self.min_y <= bounds.center.1 + bounds.radius && self.max_y >= bounds.center.1 - bounds.radius
    }

    // expand grows every side by margin
    pub fn expand(&self, margin: f64) -> BBox {
        BBox {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    // to_bounds returns the smallest square Bounds covering self
    pub fn to_bounds(&self) -> Bounds {
        Bounds {
            center: self.center(),
            radius: self.width().max(self.height()) / 2.,
        }
    }
}

// Polygon is an ordered vertex loop. Loops produced by Shape::construct_polygon_* wind counterclockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Polygon {
        Polygon { points }
    }
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Polygon {
        Polygon { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // signed_area is positive for counterclockwise loops
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn centroid(&self) -> Point {
        let n = self.points.len();
        if n == 0 {
            return Point(0., 0.)
        }
        let area = self.signed_area();
        if area.abs() < f64::EPSILON {
            let sum = self.points.iter().fold(Point(0., 0.), |sum, point| &sum + point);
            return sum.mul(1. / n as f64)
        }
        let mut x = 0.;
        let mut y = 0.;
        for i in 0..n {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            let cross = a.0 * b.1 - b.0 * a.1;
            x += (a.0 + b.0) * cross;
            y += (a.1 + b.1) * cross;
        }
        Point(x / (6. * area), y / (6. * area))
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(self.points.iter())
    }

    // edges[i] runs from points[i] to points[i + 1]
    pub fn edges(&self) -> Vec<Edge> {
        let n = self.points.len();
        (0..n).map(|i| Edge(self.points[i], self.points[(i + 1) % n])).collect()
    }

    // outside_edges[i] is edges[i] as seen by a neighbor across it
    pub fn outside_edges(&self) -> Vec<Edge> {
        self.edges().into_iter().map(|edge| edge.reversed()).collect()
    }

    // segments splits the polygon into one triangle per edge, each sharing the centroid
    pub fn segments(&self) -> Vec<Polygon> {
        let centroid = self.centroid();
        self.edges()
            .into_iter()
            .map(|edge| Polygon::new(vec![edge.0, edge.1, centroid]))
            .collect()
    }

    pub fn to_geo(&self) -> GeoPolygon<f64> {
        GeoPolygon::new(
            LineString::from(self.points.iter().map(|point| Coord { x: point.0, y: point.1 }).collect::<Vec<_>>()),
            vec![],
        )
    }

    // overlap_area is the area of the intersection of self and other
    pub fn overlap_area(&self, other: &Polygon) -> f64 {
        if let (Some(a), Some(b)) = (self.bbox(), other.bbox()) {
            if !a.intersects(&b) {
                return 0.
            }
        }
        self.to_geo().intersection(&other.to_geo()).unsigned_area()
    }
}

pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            a.0 * b.1 - b.0 * a.1
        })
        .sum::<f64>() / 2.
}

// match_points finds the cyclic offset of other that best lines up with points.
// Returns the offset and the largest per-vertex distance under it.
pub fn match_points(points: &[Point], other: &[Point]) -> Option<(usize, f64)> {
    let n = points.len();
    if n == 0 || n != other.len() {
        return None
    }
    (0..n)
        .map(|offset| {
            let dist = (0..n)
                .map(|i| points[i].distance(&other[(i + offset) % n]))
                .fold(0_f64, f64::max);
            (offset, dist)
        })
        .fold(None, |best: Option<(usize, f64)>, candidate| match best {
            Some(best) if best.1 <= candidate.1 => Some(best),
            _ => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::approx_eq;

    fn unit_square() -> Polygon {
        Polygon::new(vec![Point(0., 0.), Point(1., 0.), Point(1., 1.), Point(0., 1.)])
    }

    #[test]
    fn test_polygon_area() {
        approx_eq!(f64, 1., unit_square().signed_area());
        let mut reversed = unit_square();
        reversed.points.reverse();
        approx_eq!(f64, -1., reversed.signed_area());
        approx_eq!(f64, 1., reversed.area());
    }

    #[test]
    fn test_polygon_centroid() {
        assert_eq!(Point(0.5, 0.5), unit_square().centroid());
        let triangle = Polygon::new(vec![Point(0., 0.), Point(3., 0.), Point(0., 3.)]);
        assert_eq!(Point(1., 1.), triangle.centroid());
    }

    #[test]
    fn test_polygon_bbox() {
        let bbox = Polygon::new(vec![Point(-1., 2.), Point(3., 0.), Point(0., 5.)]).bbox().unwrap();
        assert_eq!(BBox { min_x: -1., min_y: 0., max_x: 3., max_y: 5. }, bbox);
        assert_eq!(Point(1., 2.5), bbox.center());
        let bounds = bbox.to_bounds();
        approx_eq!(f64, 2.5, bounds.radius);
    }

    #[test]
    fn test_polygon_edges() {
        let edges = unit_square().edges();
        assert_eq!(4, edges.len());
        assert_eq!(Edge(Point(0., 1.), Point(0., 0.)), edges[3]);
        assert_eq!(Edge(Point(1., 0.), Point(0., 0.)), unit_square().outside_edges()[0]);
    }

    #[test]
    fn test_polygon_segments() {
        let segments = unit_square().segments();
        assert_eq!(4, segments.len());
        approx_eq!(f64, 0.25, segments[0].area());
        assert_eq!(Point(0.5, 0.5), segments[2].points[2]);
    }

    #[test]
    fn test_polygon_overlap_area() {
        let square = unit_square();
        approx_eq!(f64, 1., square.overlap_area(&unit_square()));

        let shifted = Polygon::new(square.points.iter().map(|point| &Point(0.5, 0.) + point).collect());
        approx_eq!(f64, 0.5, square.overlap_area(&shifted));

        let neighbor = Polygon::new(square.points.iter().map(|point| &Point(1., 0.) + point).collect());
        assert!(square.overlap_area(&neighbor) < 1e-9);

        let far = Polygon::new(square.points.iter().map(|point| &Point(5., 5.) + point).collect());
        approx_eq!(f64, 0., square.overlap_area(&far));
    }

    #[test]
    fn test_match_points() {
        let square = unit_square();
        let rotated = vec![Point(1., 1.), Point(0., 1.), Point(0., 0.), Point(1., 0.)];
        let (offset, dist) = match_points(&square.points, &rotated).unwrap();
        assert_eq!(2, offset);
        approx_eq!(f64, 0., dist);
        assert!(match_points(&square.points, &rotated[..3]).is_none());
    }
}
