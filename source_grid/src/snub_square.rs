use crate::{PointCache, SavedSourceGrid, SavedSourcePoint, SourceGrid, SourceGridKind, SourcePoint, SourcePointId, SourceSide};
use result::{Error, Result};
use shape::Shape;
use std::rc::Rc;

const SQUARE: usize = 0;
const TRIANGLE: usize = 1;

// Coords are (x, y, z). Squares sit where x and y share parity and always have z = 0,
// the remaining cells hold a pair of triangles told apart by z.
type Coords = (i64, i64, u8);

#[derive(Debug)]
pub struct SnubSquareSourceGrid {
    shapes: Vec<Rc<Shape>>,
    cache: PointCache<Coords>,
}

fn modulo(value: i64) -> i64 {
    ((value % 2) + 2) % 2
}

fn is_square(x: i64, y: i64) -> bool {
    modulo(x) == modulo(y)
}

// links returns, for each side of the point at (x, y, z), the neighboring coords and
// the side of the neighbor that faces back.
fn links((x, y, z): Coords) -> Vec<(Coords, usize)> {
    match (modulo(x), modulo(y), z) {
        (0, 0, 0) => vec![((x - 1, y, 1), 1), ((x, y - 1, 0), 2), ((x + 1, y, 0), 0), ((x, y + 1, 1), 1)],
        (1, 1, 0) => vec![((x - 1, y, 1), 2), ((x, y - 1, 1), 2), ((x + 1, y, 0), 0), ((x, y + 1, 0), 1)],
        (1, 0, 0) => vec![((x - 1, y, 0), 2), ((x, y - 1, 0), 3), ((x, y, 1), 0)],
        (1, 0, 1) => vec![((x, y, 0), 2), ((x + 1, y, 0), 0), ((x, y + 1, 0), 1)],
        (0, 1, 0) => vec![((x - 1, y, 0), 2), ((x, y, 1), 0), ((x, y + 1, 0), 1)],
        (0, 1, 1) => vec![((x, y, 0), 1), ((x, y - 1, 0), 3), ((x + 1, y, 0), 0)],
        _ => vec![],
    }
}

fn check_coords((x, y, z): Coords) -> Result<Coords> {
    if z > 1 || (z == 1 && is_square(x, y)) {
        return Err(Error::InvalidSourcePoint(format!("{} {} {}", x, y, z)))
    }
    Ok((x, y, z))
}

impl SnubSquareSourceGrid {
    pub fn new(shapes: Vec<Rc<Shape>>) -> SnubSquareSourceGrid {
        SnubSquareSourceGrid { shapes, cache: PointCache::new() }
    }

    fn get_point(&mut self, coords: Coords) -> SourcePointId {
        let shapes = &self.shapes;
        self.cache.get_or_insert_with(coords, |(x, y, z)| {
            let shape = if is_square(*x, *y) { SQUARE } else { TRIANGLE };
            SourcePoint::new(format!("{} {} {}", x, y, z), shapes[shape].clone())
        })
    }
}

impl SourceGrid for SnubSquareSourceGrid {
    fn kind(&self) -> SourceGridKind {
        SourceGridKind::SnubSquare
    }

    fn shapes(&self) -> &[Rc<Shape>] {
        &self.shapes
    }

    fn origin(&mut self) -> SourcePointId {
        self.get_point((0, 0, 0))
    }

    fn point(&self, id: SourcePointId) -> Option<&SourcePoint> {
        self.cache.point(id)
    }

    fn neighbor(&mut self, id: SourcePointId, side: usize) -> Result<SourceSide> {
        let coords = *self.cache.coords(id)?;
        let (neighbor, neighbor_side) = links(coords)
            .get(side)
            .copied()
            .ok_or_else(|| Error::InvalidSourcePoint(format!("point {:?} has no side {}", coords, side)))?;
        Ok(SourceSide { point: self.get_point(neighbor), side: neighbor_side })
    }

    fn save(&self) -> SavedSourceGrid {
        SavedSourceGrid::SnubSquare
    }

    fn save_point(&self, id: SourcePointId) -> Option<SavedSourcePoint> {
        let (x, y, z) = *self.cache.coords(id).ok()?;
        Some(SavedSourcePoint::SnubSquare { x, y, z })
    }

    fn restore_point(&mut self, saved: &SavedSourcePoint) -> Result<SourcePointId> {
        match saved {
            SavedSourcePoint::SnubSquare { x, y, z } => {
                let coords = check_coords((*x, *y, *z))?;
                Ok(self.get_point(coords))
            },
            _ => Err(Error::InvalidSourcePoint(format!("{:?}", saved))),
        }
    }
}
