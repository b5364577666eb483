use crate::{edge::EdgeKey, vertex::VertexKey};
use geometry::{BBox, Polygon};
use serde::{Deserialize, Serialize};
use shape::Shape;
use source_grid::SourcePointId;
use std::{ops::Deref, rc::Rc};

// TileId addresses a tile or placeholder in its grid. Ids are never reused.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TileId(pub usize);

// SegmentRef is one segment of one tile
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SegmentRef {
    pub tile: TileId,
    pub segment: usize,
}

// Segment is the colorable part of a tile next to one of its edges
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub polygon: Polygon,
    pub color: Option<String>,
}

impl Segment {
    pub fn new(polygon: Polygon) -> Segment {
        Segment { polygon, color: None }
    }
}

#[derive(Clone, Debug)]
pub struct TileData {
    pub id: TileId,
    pub shape: Rc<Shape>,
    pub polygon: Polygon,
    // segments[i] borders edge i; placeholders have none
    pub segments: Vec<Segment>,
    pub source_point: Option<SourcePointId>,
    pub vertices: Vec<VertexKey>,
    // edges[i] runs from vertices[i] to vertices[i + 1]
    pub edges: Vec<EdgeKey>,
}

impl TileData {
    pub fn num_sides(&self) -> usize {
        self.polygon.len()
    }

    pub fn bbox(&self) -> Option<BBox> {
        self.polygon.bbox()
    }

    pub fn color(&self, segment: usize) -> Option<&str> {
        self.segments.get(segment).and_then(|segment| segment.color.as_deref())
    }

    // colors lists the segment colors, if every segment has one
    pub fn colors(&self) -> Option<Vec<&str>> {
        self.segments.iter().map(|segment| segment.color.as_deref()).collect()
    }

    // edge_index finds the edge of this tile with the given key
    pub fn edge_index(&self, key: &EdgeKey) -> Option<usize> {
        self.edges.iter().position(|edge| edge == key)
    }
}

#[derive(Clone, Debug)]
pub enum Tile {
    Real(TileData),
    Placeholder(TileData),
}

impl Tile {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Tile::Placeholder(_))
    }

    pub fn data(&self) -> &TileData {
        match self {
            Tile::Real(data) | Tile::Placeholder(data) => data,
        }
    }
}

impl Deref for Tile {
    type Target = TileData;
    fn deref(&self) -> &TileData {
        self.data()
    }
}
