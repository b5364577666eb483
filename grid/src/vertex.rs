use crate::tile::TileId;
use atlas::VertexCorner;
use common::{rad, EPSILON};
use geometry::{Edge, Point, Polygon};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use shape::Shape;
use std::{f64::consts::TAU, rc::Rc};

// VertexKey is a point rounded to the grid's key precision
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct VertexKey(pub i64, pub i64);

impl VertexKey {
    pub fn new(point: &Point, precision: u32) -> VertexKey {
        let scale = 10_f64.powi(precision as i32);
        VertexKey((point.0 * scale).round() as i64, (point.1 * scale).round() as i64)
    }
}

// GridCorner is the corner of one tile at a vertex
#[derive(Clone, Debug)]
pub struct GridCorner {
    pub tile: TileId,
    pub vertex_index: usize,
    // edge_angle is the direction of the tile edge leaving the vertex, in [0, 2π)
    pub edge_angle: f64,
    pub corner_angle: f64,
    pub shape: Rc<Shape>,
    pub corner_type: usize,
}

impl GridCorner {
    pub fn new(tile: TileId, shape: &Rc<Shape>, polygon: &Polygon, vertex_index: usize) -> GridCorner {
        let n = polygon.len();
        let edge = Edge(polygon.points[vertex_index], polygon.points[(vertex_index + 1) % n]);
        let mut edge_angle = rad(edge.angle());
        if TAU - edge_angle < EPSILON {
            edge_angle = 0.;
        }
        GridCorner {
            tile,
            vertex_index,
            edge_angle,
            corner_angle: shape.corner_angles[vertex_index],
            shape: Rc::clone(shape),
            corner_type: shape.corner_types[vertex_index],
        }
    }
}

impl VertexCorner for GridCorner {
    fn shape(&self) -> &Rc<Shape> {
        &self.shape
    }

    fn corner_type(&self) -> usize {
        self.corner_type
    }

    fn edge_angle(&self) -> f64 {
        self.edge_angle
    }
}

// SortedCorners keeps the corners around a vertex ordered by edge angle
#[derive(Clone, Debug, Default)]
pub struct SortedCorners {
    corners: Vec<GridCorner>,
}

impl SortedCorners {
    pub fn new() -> SortedCorners {
        SortedCorners { corners: vec![] }
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    pub fn as_slice(&self) -> &[GridCorner] {
        &self.corners
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCorner> {
        self.corners.iter()
    }

    pub fn add(&mut self, corner: GridCorner) {
        let index = self.corners
            .iter()
            .position(|existing| corner.edge_angle <= existing.edge_angle)
            .unwrap_or(self.corners.len());
        self.corners.insert(index, corner);
    }

    // remove drops the corner of tile, returning false if tile had no corner here
    pub fn remove(&mut self, tile: TileId) -> bool {
        match self.corners.iter().position(|corner| corner.tile == tile) {
            Some(index) => {
                self.corners.remove(index);
                true
            },
            None => false,
        }
    }

    // find_next_corner returns the corner following tile's corner, if there is another corner
    pub fn find_next_corner(&self, tile: TileId) -> Option<&GridCorner> {
        let n = self.corners.len();
        if n < 2 {
            return None
        }
        let index = self.corners.iter().position(|corner| corner.tile == tile)?;
        self.corners.get((index + 1) % n)
    }

    pub fn tiles(&self) -> Vec<TileId> {
        self.corners.iter().map(|corner| corner.tile).collect()
    }

    // is_complete is true when the corners fill the full circle
    pub fn is_complete(&self) -> bool {
        let sum: f64 = self.corners.iter().map(|corner| corner.corner_angle).sum();
        (sum - TAU).abs() < EPSILON
    }
}

#[derive(Clone, Debug)]
pub struct GridVertex {
    pub point: Point,
    pub corners: SortedCorners,
    pub placeholders: IndexSet<TileId>,
}

impl GridVertex {
    pub fn new(point: Point) -> GridVertex {
        GridVertex { point, corners: SortedCorners::new(), placeholders: IndexSet::new() }
    }

    pub fn tiles(&self) -> Vec<TileId> {
        self.corners.tiles()
    }

    // is_empty is true when neither tiles nor placeholders touch this vertex
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty() && self.placeholders.is_empty()
    }
}
