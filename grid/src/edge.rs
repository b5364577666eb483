use crate::{tile::TileId, vertex::VertexKey};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

// EdgeKey identifies an undirected edge by its endpoints in ascending order
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EdgeKey(pub VertexKey, pub VertexKey);

impl EdgeKey {
    pub fn new(a: VertexKey, b: VertexKey) -> EdgeKey {
        if b < a { EdgeKey(b, a) } else { EdgeKey(a, b) }
    }
}

// EdgeSide is a tile using an edge, with the index of that edge in the tile
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EdgeSide {
    pub tile: TileId,
    pub edge_index: usize,
}

// GridEdge connects vertices a and b, with a < b.
// tile_a runs along the edge from a to b, tile_b from b to a.
#[derive(Clone, Debug)]
pub struct GridEdge {
    pub a: VertexKey,
    pub b: VertexKey,
    pub tile_a: Option<EdgeSide>,
    pub tile_b: Option<EdgeSide>,
    pub placeholders: IndexSet<TileId>,
}

impl GridEdge {
    pub fn new(a: VertexKey, b: VertexKey) -> GridEdge {
        let EdgeKey(a, b) = EdgeKey::new(a, b);
        GridEdge { a, b, tile_a: None, tile_b: None, placeholders: IndexSet::new() }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey(self.a, self.b)
    }

    // side is the tile running along this edge starting at from
    pub fn side(&self, from: &VertexKey) -> Option<EdgeSide> {
        if *from == self.a { self.tile_a } else { self.tile_b }
    }

    pub fn side_mut(&mut self, from: &VertexKey) -> &mut Option<EdgeSide> {
        if *from == self.a { &mut self.tile_a } else { &mut self.tile_b }
    }

    // clear detaches tile from both sides
    pub fn clear(&mut self, tile: TileId) {
        if self.tile_a.map_or(false, |side| side.tile == tile) {
            self.tile_a = None;
        }
        if self.tile_b.map_or(false, |side| side.tile == tile) {
            self.tile_b = None;
        }
    }

    // other_side is the side of this edge not taken by tile
    pub fn other_side(&self, tile: TileId) -> Option<EdgeSide> {
        self.sides().find(|side| side.tile != tile)
    }

    pub fn sides(&self) -> impl Iterator<Item = EdgeSide> {
        self.tile_a.into_iter().chain(self.tile_b.into_iter())
    }

    // is_frontier is true when exactly one tile uses this edge
    pub fn is_frontier(&self) -> bool {
        self.tile_a.is_some() != self.tile_b.is_some()
    }

    // is_empty is true when neither tiles nor placeholders use this edge
    pub fn is_empty(&self) -> bool {
        self.tile_a.is_none() && self.tile_b.is_none() && self.placeholders.is_empty()
    }
}
