use common::{map_to_index, rotate_array, DEG2RAD, EPSILON};
use geometry::{Edge, Point, Polygon};
use itertools::Itertools;
use result::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// Angles above this value are read as degrees.
const MAX_RADIANS: f64 = 5.;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPattern {
    pub num_colors: usize,
    // every variant is the same coloring seen under one of the shape's rotational symmetries
    pub segment_colors: Vec<Vec<usize>>,
}

impl ColorPattern {
    // from_variants validates a hand-written pattern for a shape with n segments
    pub fn from_variants(n: usize, segment_colors: Vec<Vec<usize>>) -> Result<ColorPattern> {
        let first = segment_colors.first()
            .ok_or_else(|| Error::InvalidColorPattern(String::from("pattern has no variants")))?;
        let num_colors = first.iter().max().map_or(0, |max| max + 1);
        for variant in segment_colors.iter() {
            if variant.len() != n {
                return Err(Error::InvalidColorPattern(format!("expected {} segments, found {}", n, variant.len())))
            }
            if variant.iter().unique().count() != num_colors || variant.iter().any(|color| *color >= num_colors) {
                return Err(Error::InvalidColorPattern(format!("variant {:?} does not use colors 0..{}", variant, num_colors)))
            }
        }
        Ok(ColorPattern { num_colors, segment_colors })
    }
}

#[derive(Clone, Debug)]
pub struct Shape {
    pub name: String,
    // interior angles in radians
    pub corner_angles: Vec<f64>,
    // sides[i] runs from corner i to corner i + 1
    pub sides: Vec<f64>,
    pub corner_types: Vec<usize>,
    pub rotational_symmetries: Vec<usize>,
    pub unique_rotations: Vec<usize>,
    pub color_patterns: Vec<ColorPattern>,
}

impl Shape {
    // new builds a shape from interior angles (radians, or degrees when > 5) and optional side lengths.
    // At most one side may be None; it is computed so that the polygon closes.
    pub fn new(
        name: &str,
        angles: &[f64],
        sides: Option<&[Option<f64>]>,
        color_patterns: Option<Vec<Vec<Vec<usize>>>>,
    ) -> Result<Shape> {
        let corner_angles: Vec<f64> = angles.iter().map(|a| if *a > MAX_RADIANS { a * DEG2RAD } else { *a }).collect();
        check_angles(&corner_angles)?;
        let sides = compute_polygon_sides(&corner_angles, sides)?;

        let rotational_symmetries = compute_rotational_symmetries(&corner_angles, &sides);
        let n = corner_angles.len();
        let corner_types = (0..n)
            .map(|i| rotational_symmetries.iter().map(|r| (i + r) % n).min().unwrap_or(i))
            .collect();
        let unique_rotations = match rotational_symmetries.get(1) {
            Some(r) => (0..*r).collect(),
            None => (0..n).collect(),
        };

        let mut shape = Shape {
            name: String::from(name),
            corner_angles,
            sides,
            corner_types,
            rotational_symmetries,
            unique_rotations,
            color_patterns: vec![],
        };

        shape.color_patterns = match color_patterns {
            Some(patterns) => patterns
                .into_iter()
                .map(|variants| ColorPattern::from_variants(n, variants))
                .collect::<Result<Vec<ColorPattern>>>()?,
            None => shape.compute_color_patterns(),
        };

        Ok(shape)
    }

    pub fn num_sides(&self) -> usize {
        self.corner_angles.len()
    }

    // compute_color_patterns enumerates colorings that split the segments into equal runs of linked segments
    fn compute_color_patterns(&self) -> Vec<ColorPattern> {
        let n = self.num_sides();
        let mut color_patterns: Vec<ColorPattern> = vec![];
        for linked in 1..=n {
            if n % linked != 0 {
                continue
            }
            for r in self.unique_rotations.iter().copied() {
                // rotations only matter when some but not all segments are linked
                if (linked == 1 || linked == n) && r != 0 {
                    continue
                }

                let mut segment_colors = vec![0; n];
                for i in 0..n {
                    segment_colors[(i + n - r) % n] = i / linked;
                }

                let variants: Vec<Vec<usize>> = self.rotational_symmetries
                    .iter()
                    .map(|rot| map_to_index(&rotate_array(&segment_colors, *rot)))
                    .unique()
                    .collect();

                // asymmetric shapes revisit the same coloring under a different rotation
                let duplicate = color_patterns.iter().any(|pattern| {
                    pattern.segment_colors.iter().any(|existing| variants.contains(existing))
                });
                if duplicate {
                    continue
                }

                color_patterns.push(ColorPattern { num_colors: n / linked, segment_colors: variants });
            }
        }
        color_patterns
    }

    // equal_angles is true if other has the same angle sequence up to rotation
    pub fn equal_angles(&self, other: &Shape) -> bool {
        let a = &self.corner_angles;
        let b = &other.corner_angles;
        if a.len() != b.len() {
            return false
        }
        let n = a.len();
        (0..n).any(|r| (0..n).all(|i| (a[i] - b[(i + r) % n]).abs() < EPSILON))
    }

    pub fn construct_polygon_xyr(&self, x: f64, y: f64, length: f64) -> Polygon {
        self.construct_polygon_ab(Point(x, y), Point(x + length, y), 0)
    }

    pub fn construct_polygon_edge(&self, edge: &Edge, edge_index: usize) -> Polygon {
        self.construct_polygon_ab(edge.0, edge.1, edge_index)
    }

    // construct_polygon_ab places side edge_index of the shape from a to b and walks the remaining corners
    pub fn construct_polygon_ab(&self, a: Point, b: Point, edge_index: usize) -> Polygon {
        let n = self.num_sides();
        let edge_index = edge_index % n;
        let scale = a.distance(&b) / self.sides[edge_index];
        let mut angle = (&b - &a).arg();
        let mut points = vec![a; n];
        points[(edge_index + 1) % n] = b;
        let mut current = b;
        for i in 2..n {
            let prev = (i + edge_index - 1) % n;
            angle += PI - self.corner_angles[prev];
            current = &current + &Point::from_polar(scale * self.sides[prev], angle);
            points[(i + edge_index) % n] = current;
        }
        Polygon::new(points)
    }
}

// check_angles only accepts angle sequences of a simple polygon: at least three positive
// angles summing to (n - 2) * 180 degrees. Concave shapes pass, self-intersecting ones do not.
fn check_angles(angles: &[f64]) -> Result<()> {
    let n = angles.len();
    if n < 3 {
        return Err(Error::InvalidShape(String::from("need at least three angles")))
    }
    if angles.iter().any(|a| *a <= 0.) {
        return Err(Error::InvalidShape(String::from("all angles should be positive")))
    }
    let sum: f64 = angles.iter().sum();
    if (sum - (n - 2) as f64 * PI).abs() > EPSILON {
        return Err(Error::InvalidShape(String::from("angles should sum to (n - 2) * 180 degrees")))
    }
    Ok(())
}

// compute_polygon_sides walks every given side, then closes the loop with the single missing one.
// Without sides, all sides are expected to have length 1.
pub fn compute_polygon_sides(angles: &[f64], sides: Option<&[Option<f64>]>) -> Result<Vec<f64>> {
    let n = angles.len();
    if let Some(sides) = sides {
        if sides.len() != n {
            return Err(Error::InvalidShape(String::from("number of sides must match the number of angles")))
        }
        if sides.iter().filter(|side| side.is_none()).count() > 1 {
            return Err(Error::InvalidShape(String::from("at most one side may be null")))
        }
    }
    let side_at = |i: usize| -> Option<f64> {
        match sides {
            Some(sides) => sides[i],
            None => Some(1.),
        }
    };

    let start = sides
        .and_then(|sides| sides.iter().position(|side| side.is_none()))
        .map_or(0, |i| (i + 1) % n);

    let mut computed = vec![0.; n];
    let mut end = Point(0., 0.);
    let mut angle = 0.;
    for i in 0..n - 1 {
        let idx = (start + i) % n;
        let side = match side_at(idx) {
            Some(side) if side > 0. => side,
            _ => return Err(Error::InvalidShape(format!("side {} must be positive", idx))),
        };
        angle += PI - angles[idx];
        end = &end + &Point::from_polar(side, angle);
        computed[idx] = side;
    }

    let last = (start + n - 1) % n;
    let side = end.norm();
    if let Some(expected) = side_at(last) {
        if (expected - side).abs() > EPSILON {
            return Err(Error::InvalidShape(format!("computed side {} does not match expected side {}", side, expected)))
        }
    }
    computed[last] = side;
    Ok(computed)
}

fn compute_rotational_symmetries(angles: &[f64], sides: &[f64]) -> Vec<usize> {
    let n = angles.len();
    (0..n)
        .filter(|r| {
            (0..n).all(|i| {
                (angles[i] - angles[(i + r) % n]).abs() < EPSILON
                    && (sides[i] - sides[(i + r) % n]).abs() < EPSILON
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::approx_eq;

    fn shape(angles: &[f64]) -> Shape {
        Shape::new("", angles, None, None).unwrap()
    }

    fn round_points(polygon: &Polygon) -> Vec<(f64, f64)> {
        polygon.points.iter().map(|p| ((p.0 * 100.).round() / 100., (p.1 * 100.).round() / 100.)).collect()
    }

    #[test]
    fn test_shape_new() {
        let shape = Shape::new("test", &[60., 60., 60.], None, None).unwrap();
        assert_eq!("test", shape.name);
        for angle in shape.corner_angles.iter() {
            approx_eq!(f64, 60. * DEG2RAD, *angle);
        }
    }

    #[test]
    fn test_shape_checks_inputs() {
        assert!(Shape::new("", &[45., 45., 45.], None, None).is_err());
        assert!(Shape::new("", &[90., 90.], None, None).is_err());
        assert!(Shape::new("", &[-10., 100., 90.], None, None).is_err());
        assert!(Shape::new("", &[43., 34., 43., 35.], None, None).is_err());
        assert!(Shape::new("", &[45., 45., 90.], None, None).is_err());
        assert!(Shape::new("", &[90., 90., 90., 90.], Some(&[None, None, Some(1.), Some(1.)]), None).is_err());
        assert!(Shape::new("", &[90., 90., 90., 90.], Some(&[Some(1.), Some(0.), Some(1.), Some(1.)]), None).is_err());
        assert!(Shape::new("", &[90., 90., 90., 90.], Some(&[Some(1.), Some(1.), Some(1.)]), None).is_err());
    }

    #[test]
    fn test_shape_angle_sum() {
        assert!(Shape::new("", &[60., 60., 60.], None, None).is_ok());
        assert!(Shape::new("", &[90., 45., 135., 90.], Some(&[Some(2.), Some(2_f64.sqrt()), Some(1.), None]), None).is_ok());
        for angles in [vec![60., 60., 61.], vec![90., 90., 90., 91.], vec![120.; 5]].iter() {
            assert!(matches!(Shape::new("", angles, None, None), Err(Error::InvalidShape(_))));
        }
    }

    #[test]
    fn test_shape_converts_degrees() {
        let degrees = [36., 144., 36., 144.];
        let radians: Vec<f64> = degrees.iter().map(|a| a * DEG2RAD).collect();
        for (a, b) in shape(&degrees).corner_angles.iter().zip(shape(&radians).corner_angles.iter()) {
            approx_eq!(f64, *a, *b);
        }
    }

    #[test]
    fn test_shape_sides() {
        let rectangle = Shape::new("", &[90., 90., 90., 90.], Some(&[Some(2.), Some(1.), Some(2.), None]), None).unwrap();
        approx_eq!(f64, 1., rectangle.sides[3]);
        assert_eq!(vec![0, 2], rectangle.rotational_symmetries);
        assert_eq!(vec![0, 1, 0, 1], rectangle.corner_types);

        let sqrt3 = 3_f64.sqrt();
        let cairo = Shape::new(
            "",
            &[120., 120., 90., 120., 90.],
            Some(&[Some(sqrt3 - 1.), Some(1.), Some(1.), Some(1.), Some(1.)]),
            None,
        ).unwrap();
        assert_eq!(vec![0], cairo.rotational_symmetries);
        assert_eq!(vec![0, 1, 2, 3, 4], cairo.corner_types);
        assert_eq!(vec![0, 1, 2, 3, 4], cairo.unique_rotations);
    }

    #[test]
    fn test_shape_corner_types() {
        assert_eq!(vec![0, 0, 0], shape(&[60., 60., 60.]).corner_types);
        assert_eq!(vec![0, 1, 0, 1], shape(&[72., 108., 72., 108.]).corner_types);
    }

    #[test]
    fn test_shape_rotational_symmetries() {
        assert_eq!(vec![0, 1, 2], shape(&[60., 60., 60.]).rotational_symmetries);
        assert_eq!(vec![0], shape(&[60., 60., 60.]).unique_rotations);
        assert_eq!(vec![0, 1, 2, 3], shape(&[90., 90., 90., 90.]).rotational_symmetries);
        assert_eq!(vec![0, 2], shape(&[72., 108., 72., 108.]).rotational_symmetries);
        assert_eq!(vec![0, 2], shape(&[60., 120., 60., 120.]).rotational_symmetries);
        assert_eq!(vec![0, 1], shape(&[72., 108., 72., 108.]).unique_rotations);
        assert_eq!(vec![0, 1, 2, 3, 4, 5], shape(&[120.; 6]).rotational_symmetries);
    }

    #[test]
    fn test_shape_equal_angles() {
        let s1 = shape(&[36., 144., 36., 144.]);
        assert!(!s1.equal_angles(&shape(&[60., 60., 60.])));
        assert!(s1.equal_angles(&shape(&[36., 144., 36., 144.])));
        assert!(s1.equal_angles(&shape(&[144., 36., 144., 36.])));
        assert!(!s1.equal_angles(&shape(&[90., 90., 90., 90.])));
    }

    #[test]
    fn test_shape_constructs_polygons() {
        let triangle = shape(&[60., 60., 60.]);
        let edge = Edge(Point(0., 0.), Point(1., 0.));
        let expected = vec![(0., 0.), (1., 0.), (0.5, 0.87)];

        assert_eq!(expected, round_points(&triangle.construct_polygon_ab(edge.0, edge.1, 0)));
        assert_eq!(expected, round_points(&triangle.construct_polygon_edge(&edge, 0)));
        assert_eq!(expected, round_points(&triangle.construct_polygon_xyr(0., 0., 1.)));

        let expected_rotated = vec![expected[2], expected[0], expected[1]];
        assert_eq!(expected_rotated, round_points(&triangle.construct_polygon_ab(edge.0, edge.1, 1)));
    }

    #[test]
    fn test_shape_maps_angles_to_vertices() {
        let house = shape(&[90., 90., 150., 60., 150.]);
        let expected = vec![(0., 0.), (1., 0.), (1., 1.), (0.5, 1.87), (0., 1.)];
        let polygon = house.construct_polygon_ab(Point(0., 0.), Point(1., 0.), 0);
        assert_eq!(expected, round_points(&polygon));
        let polygon = house.construct_polygon_ab(Point(1., 0.), Point(1., 1.), 1);
        assert_eq!(expected, round_points(&polygon));
    }

    #[test]
    fn test_shape_polygon_closes_from_any_edge() {
        let sqrt3 = 3_f64.sqrt();
        let kite = Shape::new(
            "",
            &[120., 90., 60., 90.],
            Some(&[Some(1. / sqrt3), Some(1.), Some(1.), Some(1. / sqrt3)]),
            None,
        ).unwrap();
        for edge_index in 0..4 {
            let polygon = kite.construct_polygon_ab(Point(2., 1.), Point(3., 1.5), edge_index);
            let scale = Point(2., 1.).distance(&Point(3., 1.5)) / kite.sides[edge_index];
            let last = (edge_index + 3) % 4;
            let closing = polygon.points[last].distance(&polygon.points[(last + 1) % 4]);
            approx_eq!(f64, kite.sides[last] * scale, closing);
            assert!(polygon.signed_area() > 0.);
        }
    }

    #[test]
    fn test_shape_color_patterns() {
        let square = shape(&[90., 90., 90., 90.]);
        assert_eq!(vec![
            ColorPattern { num_colors: 4, segment_colors: vec![vec![0, 1, 2, 3]] },
            ColorPattern { num_colors: 2, segment_colors: vec![vec![0, 0, 1, 1], vec![0, 1, 1, 0]] },
            ColorPattern { num_colors: 1, segment_colors: vec![vec![0, 0, 0, 0]] },
        ], square.color_patterns);

        let triangle = shape(&[60., 60., 60.]);
        assert_eq!(vec![
            ColorPattern { num_colors: 3, segment_colors: vec![vec![0, 1, 2]] },
            ColorPattern { num_colors: 1, segment_colors: vec![vec![0, 0, 0]] },
        ], triangle.color_patterns);

        let rhombus = shape(&[72., 108., 72., 108.]);
        assert_eq!(vec![
            ColorPattern { num_colors: 4, segment_colors: vec![vec![0, 1, 2, 3]] },
            ColorPattern { num_colors: 2, segment_colors: vec![vec![0, 0, 1, 1]] },
            ColorPattern { num_colors: 2, segment_colors: vec![vec![0, 1, 1, 0]] },
            ColorPattern { num_colors: 1, segment_colors: vec![vec![0, 0, 0, 0]] },
        ], rhombus.color_patterns);

        let hexagon = shape(&[120.; 6]);
        assert_eq!(vec![
            ColorPattern { num_colors: 6, segment_colors: vec![vec![0, 1, 2, 3, 4, 5]] },
            ColorPattern { num_colors: 3, segment_colors: vec![vec![0, 0, 1, 1, 2, 2], vec![0, 1, 1, 2, 2, 0]] },
            ColorPattern {
                num_colors: 2,
                segment_colors: vec![vec![0, 0, 0, 1, 1, 1], vec![0, 0, 1, 1, 1, 0], vec![0, 1, 1, 1, 0, 0]],
            },
            ColorPattern { num_colors: 1, segment_colors: vec![vec![0, 0, 0, 0, 0, 0]] },
        ], hexagon.color_patterns);
    }

    #[test]
    fn test_shape_explicit_color_patterns() {
        let triangle = Shape::new(
            "",
            &[60., 60., 60.],
            None,
            Some(vec![vec![vec![0, 1, 2]], vec![vec![0, 1, 1]], vec![vec![0, 0, 0]]]),
        ).unwrap();
        assert_eq!(3, triangle.color_patterns.len());
        assert_eq!(2, triangle.color_patterns[1].num_colors);

        assert!(Shape::new("", &[60., 60., 60.], None, Some(vec![vec![vec![0, 1]]])).is_err());
        assert!(Shape::new("", &[60., 60., 60.], None, Some(vec![vec![vec![0, 2, 2]]])).is_err());
        assert!(Shape::new("", &[60., 60., 60.], None, Some(vec![vec![]])).is_err());
        assert!(Shape::new("", &[60., 60., 60.], None, Some(vec![vec![vec![0, 1, 1], vec![0, 0, 0]]])).is_err());
    }
}
