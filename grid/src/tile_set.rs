use crate::tile::TileId;
use geometry::{BBox, Point, Polygon};
use indexmap::IndexMap;

#[derive(Clone, Debug)]
struct TileStats {
    area: f64,
    centroid: Point,
    bbox: Option<BBox>,
}

// TileSet is a set of tiles that keeps their combined area, bounding box and centroid
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    tiles: IndexMap<TileId, TileStats>,
    area: f64,
    bbox: Option<BBox>,
    centroid: Option<Point>,
}

impl TileSet {
    pub fn new() -> TileSet {
        TileSet::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, tile: &TileId) -> bool {
        self.tiles.contains_key(tile)
    }

    pub fn ids(&self) -> impl Iterator<Item = &TileId> {
        self.tiles.keys()
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn bbox(&self) -> Option<BBox> {
        self.bbox
    }

    pub fn centroid(&self) -> Option<Point> {
        self.centroid
    }

    // add returns false if tile was already in the set
    pub fn add(&mut self, tile: TileId, polygon: &Polygon) -> bool {
        if self.tiles.contains_key(&tile) {
            return false
        }
        let stats = TileStats { area: polygon.area(), centroid: polygon.centroid(), bbox: polygon.bbox() };
        let old_area = self.area;
        self.area += stats.area;
        self.bbox = merge_bbox(self.bbox, stats.bbox);
        self.centroid = Some(match self.centroid {
            Some(centroid) if !self.tiles.is_empty() =>
                weighted_sum(&centroid, &stats.centroid, old_area, stats.area, self.area),
            _ => stats.centroid,
        });
        self.tiles.insert(tile, stats);
        true
    }

    // remove returns false if tile was not in the set
    pub fn remove(&mut self, tile: &TileId) -> bool {
        let stats = match self.tiles.shift_remove(tile) {
            Some(stats) => stats,
            None => return false,
        };
        if self.tiles.is_empty() {
            self.area = 0.;
            self.bbox = None;
            self.centroid = None;
            return true
        }
        let old_area = self.area;
        self.area -= stats.area;
        self.centroid = self.centroid
            .map(|centroid| weighted_sum(&centroid, &stats.centroid, old_area, -stats.area, self.area));
        self.bbox = self.tiles.values().fold(None, |bbox, stats| merge_bbox(bbox, stats.bbox));
        true
    }
}

pub(crate) fn merge_bbox(a: Option<BBox>, b: Option<BBox>) -> Option<BBox> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(&b)),
        (a, b) => a.or(b),
    }
}

// weighted_sum combines two centroids weighted by area into total
pub(crate) fn weighted_sum(a: &Point, b: &Point, weight_a: f64, weight_b: f64, total: f64) -> Point {
    if total.abs() < f64::EPSILON {
        return a.midpoint(b)
    }
    Point((a.0 * weight_a + b.0 * weight_b) / total, (a.1 * weight_a + b.1 * weight_b) / total)
}
