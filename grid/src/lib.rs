mod collision;
mod config;
mod edge;
mod event;
mod rules;
mod tile;
mod tile_set;
mod vertex;

pub use self::collision::*;
pub use self::config::*;
pub use self::edge::*;
pub use self::event::*;
pub use self::rules::*;
pub use self::tile::*;
pub use self::tile_set::TileSet;
pub use self::vertex::*;

use crate::tile_set::{merge_bbox, weighted_sum};
use atlas::Atlas;
use geometry::{match_points, signed_area, BBox, Point, Polygon};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use rand::RngCore;
use result::{Error, Result};
use rings::Rings;
use shape::Shape;
use source_grid::{SourceGrid, SourcePointId};
use std::{mem, rc::Rc};

// CANDIDATE stands in for a tile that is being fitted but has not been placed
const CANDIDATE: TileId = TileId(usize::MAX);

// Possibility is a tile that fits against a frontier edge
#[derive(Clone, Debug)]
pub struct Possibility {
    pub shape: Rc<Shape>,
    pub polygon: Polygon,
    pub source_point: Option<SourcePointId>,
}

// TileMatch is a tile found at a queried location.
// Vertex i of the tile lies on point (i + offset) % n of the query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileMatch {
    pub tile: TileId,
    pub offset: usize,
    pub distance: f64,
}

// Ring is one closed boundary of the placed tiles. Outer boundaries run
// counter-clockwise, holes clockwise with a negative area.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pub points: Vec<Point>,
    pub area: f64,
}

impl Ring {
    pub fn is_hole(&self) -> bool {
        self.area < 0.
    }
}

#[derive(Debug)]
pub struct Grid {
    pub atlas: Atlas,
    pub config: GridConfig,
    rules: Box<dyn RuleSet>,
    source_grid: Option<Box<dyn SourceGrid>>,
    vertices: IndexMap<VertexKey, GridVertex>,
    edges: IndexMap<EdgeKey, GridEdge>,
    tiles: IndexMap<TileId, Tile>,
    next_tile_id: usize,
    real_tiles: TileSet,
    placeholders: TileSet,
    frontier: IndexSet<EdgeKey>,
    rings: Rings<VertexKey>,
    collisions: CollisionService,
    events: Vec<GridEvent>,
}

impl Grid {
    pub fn new(atlas: Atlas, config: GridConfig, rng: &mut dyn RngCore) -> Result<Grid> {
        let source_grid = match atlas.source_grid {
            Some(kind) => Some(kind.create(atlas.shapes.clone(), rng)?),
            None => None,
        };
        Ok(Grid {
            rules: config.rules.create(),
            collisions: CollisionService::new(config.tree.clone(), config.overlap_eps),
            atlas,
            config,
            source_grid,
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            tiles: IndexMap::new(),
            next_tile_id: 0,
            real_tiles: TileSet::new(),
            placeholders: TileSet::new(),
            frontier: IndexSet::new(),
            rings: Rings::new(),
            events: vec![],
        })
    }

    pub fn rules(&self) -> &dyn RuleSet {
        &*self.rules
    }

    pub fn source_grid(&self) -> Option<&dyn SourceGrid> {
        self.source_grid.as_deref()
    }

    pub fn num_tiles(&self) -> usize {
        self.real_tiles.len()
    }

    pub fn num_placeholders(&self) -> usize {
        self.placeholders.len()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    // tiles lists the real tiles in the order they were added
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.real_tiles.ids().filter_map(move |id| self.tiles.get(id))
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Tile> {
        self.placeholders.ids().filter_map(move |id| self.tiles.get(id))
    }

    pub fn vertex(&self, key: &VertexKey) -> Option<&GridVertex> {
        self.vertices.get(key)
    }

    pub fn vertices(&self) -> &IndexMap<VertexKey, GridVertex> {
        &self.vertices
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&GridEdge> {
        self.edges.get(key)
    }

    pub fn edges(&self) -> &IndexMap<EdgeKey, GridEdge> {
        &self.edges
    }

    // frontier holds the edges used by exactly one real tile
    pub fn frontier(&self) -> &IndexSet<EdgeKey> {
        &self.frontier
    }

    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        mem::take(&mut self.events)
    }

    fn vertex_keys(&self, polygon: &Polygon) -> Vec<VertexKey> {
        polygon.points.iter().map(|point| VertexKey::new(point, self.config.key_precision)).collect()
    }

    // edges_free is true if no real tile already runs along any edge of vertices in the same direction
    fn edges_free(&self, vertices: &[VertexKey]) -> bool {
        let n = vertices.len();
        (0..n).all(|i| {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            self.edges.get(&EdgeKey::new(a, b)).map_or(true, |edge| edge.side(&a).is_none())
        })
    }

    fn check_sides(shape: &Shape, polygon: &Polygon) -> Result<()> {
        if polygon.len() != shape.num_sides() {
            return Err(Error::InvalidShape(format!(
                "{} has {} sides, polygon has {} points",
                shape.name,
                shape.num_sides(),
                polygon.len(),
            )))
        }
        Ok(())
    }

    fn next_id(&mut self) -> TileId {
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        id
    }

    fn update_frontier(&mut self, key: EdgeKey) {
        match self.edges.get(&key) {
            Some(edge) if edge.is_frontier() => {
                self.frontier.insert(key);
            },
            _ => {
                self.frontier.shift_remove(&key);
            },
        }
    }

    // add_tile places a real tile. segments default to one uncolored segment per edge.
    pub fn add_tile(
        &mut self,
        shape: &Rc<Shape>,
        polygon: Polygon,
        segments: Option<Vec<Segment>>,
        source_point: Option<SourcePointId>,
    ) -> Result<TileId> {
        Grid::check_sides(shape, &polygon)?;
        let vertices = self.vertex_keys(&polygon);
        if !self.edges_free(&vertices) {
            console::warning!("cannot add {} at {:?}: edge in use", shape.name, vertices);
            return Err(Error::EdgeInUse)
        }
        let segments = match segments {
            Some(segments) if segments.len() == polygon.len() => segments,
            Some(segments) => return Err(Error::InvalidColorPattern(format!(
                "{} segments for {} edges",
                segments.len(),
                polygon.len(),
            ))),
            None => polygon.segments().into_iter().map(Segment::new).collect(),
        };
        if let Err(err) = self.rings.add_ring(&vertices) {
            console::warning!("cannot add {} at {:?}: {}", shape.name, vertices, err);
            return Err(err)
        }

        let superseded: Vec<TileId> = self.collisions
            .query_overlap(&polygon, |tile| self.placeholders.contains(&tile))
            .into_iter()
            .filter(|overlap| self.collisions.is_identical(overlap))
            .map(|overlap| overlap.tile)
            .collect();
        for placeholder in superseded {
            self.remove_placeholder(placeholder);
        }

        let id = self.next_id();
        self.collisions.insert(id, &polygon);
        for (i, key) in vertices.iter().enumerate() {
            let point = polygon.points[i];
            self.vertices
                .entry(*key)
                .or_insert_with(|| GridVertex::new(point))
                .corners
                .add(GridCorner::new(id, shape, &polygon, i));
        }
        let n = vertices.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            let edge = self.edges.entry(EdgeKey::new(a, b)).or_insert_with(|| GridEdge::new(a, b));
            *edge.side_mut(&a) = Some(EdgeSide { tile: id, edge_index: i });
            let key = edge.key();
            self.update_frontier(key);
            edges.push(key);
        }

        self.real_tiles.add(id, &polygon);
        let centroid = polygon.centroid();
        self.tiles.insert(id, Tile::Real(TileData {
            id,
            shape: Rc::clone(shape),
            polygon,
            segments,
            source_point,
            vertices,
            edges,
        }));
        self.events.push(GridEvent::AddTile(id));
        console::debug!("added tile {} ({}) at {}", id.0, shape.name, centroid);
        Ok(id)
    }

    // add_placeholder marks a spot where a tile could go. Placeholders never touch the frontier or the rings.
    pub fn add_placeholder(
        &mut self,
        shape: &Rc<Shape>,
        polygon: Polygon,
        source_point: Option<SourcePointId>,
    ) -> Result<TileId> {
        Grid::check_sides(shape, &polygon)?;
        let vertices = self.vertex_keys(&polygon);
        let id = self.next_id();
        self.collisions.insert(id, &polygon);
        for (i, key) in vertices.iter().enumerate() {
            let point = polygon.points[i];
            self.vertices.entry(*key).or_insert_with(|| GridVertex::new(point)).placeholders.insert(id);
        }
        let n = vertices.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            let edge = self.edges.entry(EdgeKey::new(a, b)).or_insert_with(|| GridEdge::new(a, b));
            edge.placeholders.insert(id);
            edges.push(edge.key());
        }

        self.placeholders.add(id, &polygon);
        self.tiles.insert(id, Tile::Placeholder(TileData {
            id,
            shape: Rc::clone(shape),
            polygon,
            segments: vec![],
            source_point,
            vertices,
            edges,
        }));
        self.events.push(GridEvent::AddPlaceholder(id));
        Ok(id)
    }

    // remove_tile takes a real tile off the grid. Unknown ids and placeholders are left alone.
    pub fn remove_tile(&mut self, id: TileId) -> Result<()> {
        match self.tiles.get(&id) {
            Some(Tile::Real(data)) => {
                if let Err(err) = self.rings.remove_ring(&data.vertices) {
                    console::warning!("cannot remove tile {}: {}", id.0, err);
                    return Err(err)
                }
            },
            _ => return Ok(()),
        }
        let data = match self.tiles.shift_remove(&id) {
            Some(tile) => tile,
            None => return Ok(()),
        };

        for key in data.vertices.iter() {
            let empty = match self.vertices.get_mut(key) {
                Some(vertex) => {
                    vertex.corners.remove(id);
                    vertex.is_empty()
                },
                None => false,
            };
            if empty {
                self.vertices.shift_remove(key);
            }
        }
        for key in data.edges.iter() {
            let empty = match self.edges.get_mut(key) {
                Some(edge) => {
                    edge.clear(id);
                    edge.is_empty()
                },
                None => continue,
            };
            if empty {
                self.edges.shift_remove(key);
            }
            self.update_frontier(*key);
        }

        self.collisions.remove(&id);
        self.real_tiles.remove(&id);
        self.events.push(GridEvent::RemoveTile(id));
        console::debug!("removed tile {} ({})", id.0, data.shape.name);
        Ok(())
    }

    // remove_placeholder returns false if id is not a placeholder
    pub fn remove_placeholder(&mut self, id: TileId) -> bool {
        if !self.placeholders.contains(&id) {
            return false
        }
        let data = match self.tiles.shift_remove(&id) {
            Some(tile) => tile,
            None => return false,
        };
        for key in data.vertices.iter() {
            let empty = match self.vertices.get_mut(key) {
                Some(vertex) => {
                    vertex.placeholders.shift_remove(&id);
                    vertex.is_empty()
                },
                None => false,
            };
            if empty {
                self.vertices.shift_remove(key);
            }
        }
        for key in data.edges.iter() {
            let empty = match self.edges.get_mut(key) {
                Some(edge) => {
                    edge.placeholders.shift_remove(&id);
                    edge.is_empty()
                },
                None => false,
            };
            if empty {
                self.edges.shift_remove(key);
            }
        }
        self.collisions.remove(&id);
        self.placeholders.remove(&id);
        self.events.push(GridEvent::RemovePlaceholder(id));
        true
    }

    // check_fit is true if a tile of shape could be placed at polygon: its edges are free,
    // every vertex it touches still matches a pattern of the atlas, and it overlaps nothing.
    pub fn check_fit(&self, shape: &Rc<Shape>, polygon: &Polygon, include_placeholders: bool) -> bool {
        if polygon.len() != shape.num_sides() {
            return false
        }
        let vertices = self.vertex_keys(polygon);
        if !self.edges_free(&vertices) {
            return false
        }
        for (i, key) in vertices.iter().enumerate() {
            let mut corners = self.vertices.get(key).map(|vertex| vertex.corners.clone()).unwrap_or_default();
            corners.add(GridCorner::new(CANDIDATE, shape, polygon, i));
            if !self.atlas.check_match(corners.as_slice()) {
                return false
            }
        }
        !self.overlaps(Some(shape), polygon, include_placeholders)
    }

    // check_collision is true if polygon overlaps a real tile, or a placeholder when asked
    pub fn check_collision(&self, polygon: &Polygon, include_placeholders: bool) -> bool {
        self.overlaps(None, polygon, include_placeholders)
    }

    // overlaps ignores a placeholder of the same shape sitting exactly on polygon
    fn overlaps(&self, shape: Option<&Rc<Shape>>, polygon: &Polygon, include_placeholders: bool) -> bool {
        self.collisions
            .query_overlap(polygon, |tile| include_placeholders || self.real_tiles.contains(&tile))
            .iter()
            .any(|overlap| match (shape, self.tiles.get(&overlap.tile)) {
                (Some(shape), Some(Tile::Placeholder(data))) =>
                    !(Rc::ptr_eq(shape, &data.shape) && self.collisions.is_identical(overlap)),
                _ => true,
            })
    }

    // compute_possibilities lists the tiles that fit against a frontier edge. Tiles that came
    // from the source grid only admit their source neighbor.
    pub fn compute_possibilities(&mut self, key: &EdgeKey) -> Vec<Possibility> {
        let (from, to, side) = match self.edges.get(key) {
            Some(edge) => match (edge.tile_a, edge.tile_b) {
                (Some(side), None) => (edge.b, edge.a, side),
                (None, Some(side)) => (edge.a, edge.b, side),
                _ => return vec![],
            },
            None => return vec![],
        };
        let (from, to) = match (self.vertices.get(&from), self.vertices.get(&to)) {
            (Some(from), Some(to)) => (from.point, to.point),
            _ => return vec![],
        };
        let source_point = self.tiles.get(&side.tile).and_then(|tile| tile.source_point);

        match (source_point, self.source_grid.as_mut()) {
            (Some(point), Some(source_grid)) => {
                let neighbor = match source_grid.neighbor(point, side.edge_index) {
                    Ok(neighbor) => neighbor,
                    Err(err) => {
                        console::warning!("no source neighbor for tile {} side {}: {}", side.tile.0, side.edge_index, err);
                        return vec![]
                    },
                };
                let shape = match source_grid.point(neighbor.point) {
                    Some(point) => Rc::clone(&point.shape),
                    None => return vec![],
                };
                let polygon = shape.construct_polygon_ab(from, to, neighbor.side);
                if self.check_fit(&shape, &polygon, false) {
                    vec![Possibility { shape, polygon, source_point: Some(neighbor.point) }]
                } else {
                    vec![]
                }
            },
            _ => self.atlas.shapes
                .iter()
                .flat_map(|shape| shape.unique_rotations.iter().map(move |rotation| (shape, *rotation)))
                .filter_map(|(shape, rotation)| {
                    let polygon = shape.construct_polygon_ab(from, to, rotation);
                    if self.check_fit(shape, &polygon, false) {
                        Some(Possibility { shape: Rc::clone(shape), polygon, source_point: None })
                    } else {
                        None
                    }
                })
                .collect(),
        }
    }

    // generate_placeholders brings the placeholders in line with the possibilities of the
    // current frontier, keeping the ones that still fit.
    pub fn generate_placeholders(&mut self) -> Result<()> {
        let frontier: Vec<EdgeKey> = self.frontier.iter().copied().collect();
        let mut keep: IndexSet<TileId> = IndexSet::new();
        let mut added = 0;
        for key in frontier.iter() {
            for possibility in self.compute_possibilities(key) {
                let existing = self.collisions
                    .query_overlap(&possibility.polygon, |tile| self.placeholders.contains(&tile))
                    .into_iter()
                    .find(|overlap| {
                        self.collisions.is_identical(overlap)
                            && self.tiles.get(&overlap.tile).map_or(false, |tile| Rc::ptr_eq(&tile.shape, &possibility.shape))
                    })
                    .map(|overlap| overlap.tile);
                match existing {
                    Some(tile) => {
                        keep.insert(tile);
                    },
                    None => {
                        let tile = self.add_placeholder(&possibility.shape, possibility.polygon, possibility.source_point)?;
                        keep.insert(tile);
                        added += 1;
                    },
                }
            }
        }
        let stale: Vec<TileId> = self.placeholders.ids().filter(|id| !keep.contains(*id)).copied().collect();
        for tile in stale.iter() {
            self.remove_placeholder(*tile);
        }
        console::debug!("placeholders: {} added, {} kept, {} removed", added, keep.len() - added, stale.len());
        Ok(())
    }

    // add_initial_tile seeds an empty grid at the origin
    pub fn add_initial_tile(&mut self) -> Result<TileId> {
        let (shape, source_point) = match self.source_grid.as_mut() {
            Some(source_grid) => {
                let origin = source_grid.origin();
                let point = source_grid
                    .point(origin)
                    .ok_or_else(|| Error::InvalidSourcePoint(format!("missing origin {}", origin.0)))?;
                (Rc::clone(&point.shape), Some(origin))
            },
            None => {
                let shape = self.atlas.shapes.first().cloned().ok_or_else(|| Error::EmptyAtlas(self.atlas.name.clone()))?;
                (shape, None)
            },
        };
        let polygon = shape.construct_polygon_xyr(0., 0., 1.);
        self.add_tile(&shape, polygon, None, source_point)
    }

    // find_matching_tile finds the closest tile whose vertices all lie within max_dist of points,
    // or whose centroid does when match_centroid_only is set.
    pub fn find_matching_tile(
        &self,
        points: &[Point],
        max_dist: f64,
        include_placeholders: bool,
        shape: Option<&Rc<Shape>>,
        match_centroid_only: bool,
    ) -> Option<TileMatch> {
        let bbox = BBox::from_points(points.iter())?;
        let centroid = Polygon::new(points.to_vec()).centroid();
        self.collisions
            .candidates(&bbox, max_dist)
            .into_iter()
            .filter_map(|id| self.tiles.get(&id))
            .filter(|tile| include_placeholders || !tile.is_placeholder())
            .filter(|tile| shape.map_or(true, |shape| Rc::ptr_eq(shape, &tile.shape)))
            .filter_map(|tile| {
                let matched = match_points(&tile.polygon.points, points);
                if match_centroid_only {
                    let distance = tile.polygon.centroid().distance(&centroid);
                    Some(TileMatch { tile: tile.id, offset: matched.map_or(0, |(offset, _)| offset), distance })
                } else {
                    matched.map(|(offset, distance)| TileMatch { tile: tile.id, offset, distance })
                }
            })
            .filter(|matched| matched.distance <= max_dist)
            .fold(None, |best: Option<TileMatch>, matched| match best {
                Some(best) if best.distance <= matched.distance => Some(best),
                _ => Some(matched),
            })
    }

    // neighbors lists the real tiles sharing an edge with tile
    pub fn neighbors(&self, tile: TileId) -> Vec<TileId> {
        let data = match self.tiles.get(&tile) {
            Some(data) => data,
            None => return vec![],
        };
        data.edges
            .iter()
            .filter_map(|key| self.edges.get(key))
            .flat_map(|edge| edge.sides())
            .map(|side| side.tile)
            .filter(|neighbor| *neighbor != tile)
            .unique()
            .collect()
    }

    // segment_neighbors lists the segments of other real tiles across the edge of segment
    pub fn segment_neighbors(&self, tile: TileId, segment: usize) -> Vec<SegmentRef> {
        self.tiles
            .get(&tile)
            .and_then(|data| data.edges.get(segment))
            .and_then(|key| self.edges.get(key))
            .map(|edge| {
                edge.sides()
                    .filter(|side| side.tile != tile)
                    .map(|side| SegmentRef { tile: side.tile, segment: side.edge_index })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn color_constraints(&self, tile: TileId, segment: usize) -> ColorConstraints {
        self.rules.color_constraints(self.segment_neighbors(tile, segment))
    }

    fn neighbor_colors(&self, data: &TileData) -> Vec<Vec<&str>> {
        data.edges
            .iter()
            .map(|key| match self.edges.get(key) {
                Some(edge) => edge
                    .sides()
                    .filter(|side| side.tile != data.id)
                    .filter_map(|side| self.tiles.get(&side.tile).and_then(|tile| tile.color(side.edge_index)))
                    .collect(),
                None => vec![],
            })
            .collect()
    }

    // check_colors is true if colors, in tile's own orientation, satisfy the rules against its neighbors
    pub fn check_colors(&self, tile: TileId, colors: &[String]) -> bool {
        match self.tiles.get(&tile) {
            Some(data) => self.rules.check_colors(&self.neighbor_colors(data), colors, 0),
            None => false,
        }
    }

    // check_colors_with_rotation lists the rotational symmetries of tile under which colors satisfy the rules
    pub fn check_colors_with_rotation(&self, tile: TileId, colors: &[String]) -> Vec<usize> {
        let data = match self.tiles.get(&tile) {
            Some(data) => data,
            None => return vec![],
        };
        let neighbor_colors = self.neighbor_colors(data);
        data.shape
            .rotational_symmetries
            .iter()
            .copied()
            .filter(|offset| self.rules.check_colors(&neighbor_colors, colors, *offset))
            .collect()
    }

    pub fn set_tile_colors(&mut self, tile: TileId, colors: &[String]) -> Result<()> {
        let data = match self.tiles.get_mut(&tile) {
            Some(Tile::Real(data)) => data,
            Some(Tile::Placeholder(_)) => {
                console::warning!("cannot color placeholder {}", tile.0);
                return Err(Error::PlaceholderColors)
            },
            None => return Err(Error::UnknownTile),
        };
        if colors.len() != data.segments.len() {
            return Err(Error::InvalidColorPattern(format!(
                "{} colors for {} segments",
                colors.len(),
                data.segments.len(),
            )))
        }
        for (segment, color) in data.segments.iter_mut().zip(colors.iter()) {
            segment.color = Some(color.clone());
        }
        self.events.push(GridEvent::UpdateTileColors(tile));
        Ok(())
    }

    pub fn rings(&self) -> Vec<Ring> {
        self.rings
            .rings()
            .iter()
            .map(|ring| {
                let points: Vec<Point> = ring.iter().filter_map(|key| self.vertices.get(key).map(|vertex| vertex.point)).collect();
                let area = signed_area(&points);
                Ring { points, area }
            })
            .collect()
    }

    // area, bbox and centroid cover tiles and placeholders together
    pub fn area(&self) -> f64 {
        self.real_tiles.area() + self.placeholders.area()
    }

    pub fn bbox(&self) -> Option<BBox> {
        merge_bbox(self.real_tiles.bbox(), self.placeholders.bbox())
    }

    pub fn bbox_without_placeholders(&self) -> Option<BBox> {
        self.real_tiles.bbox()
    }

    pub fn centroid(&self) -> Option<Point> {
        match (self.real_tiles.centroid(), self.placeholders.centroid()) {
            (Some(real), Some(placeholder)) => Some(weighted_sum(
                &real,
                &placeholder,
                self.real_tiles.area(),
                self.placeholders.area(),
                self.area(),
            )),
            (real, placeholder) => real.or(placeholder),
        }
    }
}
