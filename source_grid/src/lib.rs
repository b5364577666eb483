mod penrose3;
mod snub_square;

pub use self::penrose3::{Line, Penrose3SourceGrid};
pub use self::snub_square::SnubSquareSourceGrid;

use rand::RngCore;
use result::{Error, Result};
use serde::{Deserialize, Serialize};
use shape::Shape;
use indexmap::IndexMap;
use std::{fmt::Debug, hash::Hash, rc::Rc};

// SourcePointId addresses a point inside the grid that created it
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SourcePointId(pub usize);

#[derive(Clone, Debug)]
pub struct SourcePoint {
    pub key: String,
    pub shape: Rc<Shape>,
    pub num_sides: usize,
}

impl SourcePoint {
    pub fn new(key: String, shape: Rc<Shape>) -> SourcePoint {
        let num_sides = shape.num_sides();
        SourcePoint { key, shape, num_sides }
    }
}

// SourceSide is the point across a side, and the side of that point leading back
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SourceSide {
    pub point: SourcePointId,
    pub side: usize,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceGridKind {
    Penrose3,
    SnubSquare,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SavedSourceGrid {
    Penrose3 { sigma: Vec<f64> },
    SnubSquare,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SavedSourcePoint {
    Penrose3 { a: Line, b: Line },
    SnubSquare { x: i64, y: i64, z: u8 },
}

// ShapeTemplate describes one shape a source grid lays down
struct ShapeTemplate {
    name: &'static str,
    angles: &'static [f64],
    frequency: f64,
    color_patterns: Option<fn() -> Vec<Vec<Vec<usize>>>>,
}

impl SourceGridKind {
    fn templates(&self) -> Vec<ShapeTemplate> {
        match self {
            SourceGridKind::Penrose3 => vec![
                ShapeTemplate { name: "rhombus-wide", angles: &[72., 108., 72., 108.], frequency: 5., color_patterns: None },
                ShapeTemplate { name: "rhombus-narrow", angles: &[36., 144., 36., 144.], frequency: 3., color_patterns: None },
            ],
            SourceGridKind::SnubSquare => vec![
                ShapeTemplate {
                    name: "square",
                    angles: &[90., 90., 90., 90.],
                    frequency: 1.,
                    color_patterns: Some(|| vec![
                        vec![vec![0, 1, 2, 3]],
                        vec![vec![0, 0, 1, 1], vec![0, 1, 1, 0]],
                        vec![vec![0, 0, 0, 0]],
                    ]),
                },
                ShapeTemplate {
                    name: "triangle",
                    angles: &[60., 60., 60.],
                    frequency: 2.,
                    color_patterns: Some(|| vec![
                        vec![vec![0, 1, 2]],
                        vec![vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]],
                        vec![vec![0, 0, 0]],
                    ]),
                },
            ],
        }
    }

    // shapes builds fresh shapes for this grid, in the order the grid refers to them
    pub fn shapes(&self) -> Result<Vec<Rc<Shape>>> {
        self.templates()
            .into_iter()
            .map(|template| {
                Shape::new(template.name, template.angles, None, template.color_patterns.map(|patterns| patterns()))
                    .map(Rc::new)
            })
            .collect()
    }

    pub fn shape_frequencies(&self) -> Vec<f64> {
        self.templates().iter().map(|template| template.frequency).collect()
    }

    // create instantiates a grid over shapes previously returned by SourceGridKind::shapes
    pub fn create(&self, shapes: Vec<Rc<Shape>>, rng: &mut dyn RngCore) -> Result<Box<dyn SourceGrid>> {
        let shapes = self.check_shapes(shapes)?;
        Ok(match self {
            SourceGridKind::Penrose3 => Box::new(Penrose3SourceGrid::new(shapes, rng)?),
            SourceGridKind::SnubSquare => Box::new(SnubSquareSourceGrid::new(shapes)),
        })
    }

    pub fn restore(&self, saved: &SavedSourceGrid, shapes: Vec<Rc<Shape>>) -> Result<Box<dyn SourceGrid>> {
        let shapes = self.check_shapes(shapes)?;
        Ok(match (self, saved) {
            (SourceGridKind::Penrose3, SavedSourceGrid::Penrose3 { sigma }) =>
                Box::new(Penrose3SourceGrid::with_sigma(shapes, sigma.clone())?),
            (SourceGridKind::SnubSquare, SavedSourceGrid::SnubSquare) =>
                Box::new(SnubSquareSourceGrid::new(shapes)),
            _ => return Err(Error::InvalidSourcePoint(format!("saved grid {:?} does not belong to {:?}", saved, self))),
        })
    }

    fn check_shapes(&self, shapes: Vec<Rc<Shape>>) -> Result<Vec<Rc<Shape>>> {
        let templates = self.templates();
        if shapes.len() != templates.len() {
            return Err(Error::InvalidShape(format!("{:?} grid needs {} shapes, found {}", self, templates.len(), shapes.len())))
        }
        for (shape, template) in shapes.iter().zip(templates.iter()) {
            if shape.num_sides() != template.angles.len() {
                return Err(Error::InvalidShape(format!("{} does not fit the {:?} grid", shape.name, self)))
            }
        }
        Ok(shapes)
    }
}

pub trait SourceGrid: Debug {
    fn kind(&self) -> SourceGridKind;
    fn shapes(&self) -> &[Rc<Shape>];
    fn origin(&mut self) -> SourcePointId;
    fn point(&self, id: SourcePointId) -> Option<&SourcePoint>;
    // neighbor is an involution: the neighbor's neighbor across the returned side is id again
    fn neighbor(&mut self, id: SourcePointId, side: usize) -> Result<SourceSide>;
    fn save(&self) -> SavedSourceGrid;
    fn save_point(&self, id: SourcePointId) -> Option<SavedSourcePoint>;
    fn restore_point(&mut self, saved: &SavedSourcePoint) -> Result<SourcePointId>;

    fn shape_frequencies(&self) -> Vec<f64> {
        self.kind().shape_frequencies()
    }
}

// PointCache memoises points by their grid coordinates. A point's id is its insertion index.
#[derive(Debug)]
pub(crate) struct PointCache<C: Eq + Hash> {
    points: IndexMap<C, SourcePoint>,
}

impl<C: Eq + Hash> PointCache<C> {
    pub(crate) fn new() -> PointCache<C> {
        PointCache { points: IndexMap::new() }
    }

    pub(crate) fn get_or_insert_with(&mut self, coords: C, create: impl FnOnce(&C) -> SourcePoint) -> SourcePointId {
        if let Some(index) = self.points.get_index_of(&coords) {
            return SourcePointId(index)
        }
        let point = create(&coords);
        let (index, _) = self.points.insert_full(coords, point);
        SourcePointId(index)
    }

    pub(crate) fn point(&self, id: SourcePointId) -> Option<&SourcePoint> {
        self.points.get_index(id.0).map(|(_, point)| point)
    }

    pub(crate) fn coords(&self, id: SourcePointId) -> Result<&C> {
        self.points
            .get_index(id.0)
            .map(|(coords, _)| coords)
            .ok_or_else(|| Error::InvalidSourcePoint(format!("unknown point {}", id.0)))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
pub(crate) mod testhelper {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    // walk_grid visits num_points points breadth first from the origin, checking that
    // every neighbor link leads back. Returns the number of points seen per shape.
    pub(crate) fn walk_grid(grid: &mut dyn SourceGrid, num_points: usize) -> Vec<usize> {
        let origin = grid.origin();
        assert_eq!(4, grid.point(origin).unwrap().num_sides);

        let shapes = grid.shapes().to_vec();
        let mut shape_counts = vec![0; shapes.len()];
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(origin);
        queue.push_back(origin);

        let mut placed = 0;
        while placed < num_points {
            let id = match queue.pop_front() {
                Some(id) => id,
                None => break,
            };
            let point = grid.point(id).unwrap().clone();
            let shape_index = shapes.iter().position(|shape| Rc::ptr_eq(shape, &point.shape)).unwrap();
            shape_counts[shape_index] += 1;
            placed += 1;
            for side in 0..point.num_sides {
                let neighbor = grid.neighbor(id, side).unwrap();
                let reverse = grid.neighbor(neighbor.point, neighbor.side).unwrap();
                assert_eq!(id, reverse.point);
                assert_eq!(side, reverse.side);
                if seen.insert(neighbor.point) {
                    queue.push_back(neighbor.point);
                }
            }
        }
        shape_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_kind_shapes() {
        let shapes = SourceGridKind::SnubSquare.shapes().unwrap();
        assert_eq!(vec!["square", "triangle"], shapes.iter().map(|shape| shape.name.as_str()).collect::<Vec<_>>());
        assert_eq!(3, shapes[1].color_patterns.len());
        assert_eq!(vec![1., 2.], SourceGridKind::SnubSquare.shape_frequencies());

        let shapes = SourceGridKind::Penrose3.shapes().unwrap();
        assert_eq!(vec![0, 2], shapes[0].rotational_symmetries);
        assert_eq!(vec![5., 3.], SourceGridKind::Penrose3.shape_frequencies());
    }

    #[test]
    fn test_kind_create_checks_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let penrose_shapes = SourceGridKind::Penrose3.shapes().unwrap();
        assert!(SourceGridKind::SnubSquare.create(penrose_shapes.clone(), &mut rng).is_err());
        assert!(SourceGridKind::Penrose3.create(penrose_shapes[..1].to_vec(), &mut rng).is_err());
        let grid = SourceGridKind::Penrose3.create(penrose_shapes.clone(), &mut rng).unwrap();
        assert_eq!(SourceGridKind::Penrose3, grid.kind());
        assert!(Rc::ptr_eq(&penrose_shapes[0], &grid.shapes()[0]));
    }

    #[test]
    fn test_kind_restore() {
        let mut rng = StdRng::seed_from_u64(7);
        let shapes = SourceGridKind::Penrose3.shapes().unwrap();
        let grid = SourceGridKind::Penrose3.create(shapes.clone(), &mut rng).unwrap();
        let saved = grid.save();

        let json = serde_json::to_string(&saved).unwrap();
        let parsed: SavedSourceGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(saved, parsed);

        let restored = SourceGridKind::Penrose3.restore(&parsed, shapes.clone()).unwrap();
        assert_eq!(saved, restored.save());
        assert!(SourceGridKind::SnubSquare.restore(&parsed, SourceGridKind::SnubSquare.shapes().unwrap()).is_err());
    }

    #[test]
    fn test_point_cache() {
        let shape = Rc::new(Shape::new("square", &[90., 90., 90., 90.], None, None).unwrap());
        let mut cache = PointCache::new();
        let a = cache.get_or_insert_with((0, 0), |_| SourcePoint::new(String::from("0 0"), shape.clone()));
        let b = cache.get_or_insert_with((1, 0), |_| SourcePoint::new(String::from("1 0"), shape.clone()));
        let c = cache.get_or_insert_with((0, 0), |_| panic!("point should be cached"));
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(2, cache.len());
        assert_eq!(&(1, 0), cache.coords(b).unwrap());
        assert_eq!(4, cache.point(a).unwrap().num_sides);
        assert!(cache.coords(SourcePointId(9)).is_err());
    }
}
