use crate::tile::TileId;
use common::EPSILON;
use geometry::{BBox, Bounds, Point, Polygon, Spatial};
use pmr_quad_tree::{Config as TreeConfig, Tree};

#[derive(Debug)]
pub struct CollisionItem {
    pub tile: TileId,
    pub polygon: Polygon,
    pub bbox: BBox,
    pub area: f64,
}

impl Spatial for CollisionItem {
    type Hashed = TileId;

    fn distance(&self, point: &Point) -> f64 {
        self.bbox.to_bounds().distance(point)
    }

    fn intersects(&self, bounds: &Bounds) -> bool {
        self.bbox.intersects_bounds(bounds)
    }

    fn bounded_by(&self, bounds: &Bounds) -> bool {
        bounds.contains_bounds(&self.bbox.to_bounds())
    }

    fn key(&self) -> TileId {
        self.tile
    }
}

// Overlap reports how much a stored tile overlaps a queried polygon
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlap {
    pub tile: TileId,
    // ratio is the overlap as a fraction of the smaller of the two areas
    pub ratio: f64,
    // coverage is the overlap as a fraction of the larger of the two areas
    pub coverage: f64,
}

// CollisionService finds the tiles overlapping a polygon. A quad tree over bounding boxes
// picks the candidates, exact polygon intersection measures the overlap.
#[derive(Debug)]
pub struct CollisionService {
    tree: Tree<TileId, CollisionItem>,
    overlap_eps: f64,
}

impl CollisionService {
    pub fn new(config: TreeConfig, overlap_eps: f64) -> CollisionService {
        CollisionService { tree: Tree::new(config), overlap_eps }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn has(&self, tile: &TileId) -> bool {
        self.tree.has(tile)
    }

    pub fn insert(&mut self, tile: TileId, polygon: &Polygon) {
        let bbox = match polygon.bbox() {
            Some(bbox) => bbox,
            None => return,
        };
        self.tree.insert(CollisionItem { tile, polygon: polygon.clone(), bbox, area: polygon.area() });
    }

    pub fn remove(&mut self, tile: &TileId) -> bool {
        self.tree.remove(tile).is_some()
    }

    // candidates lists the tiles whose bounding boxes reach within margin of bbox
    pub fn candidates(&self, bbox: &BBox, margin: f64) -> Vec<TileId> {
        self.tree
            .query(&bbox.expand(margin.max(EPSILON)).to_bounds())
            .into_iter()
            .filter(|item| item.bbox.intersects(&bbox.expand(margin)))
            .map(|item| item.tile)
            .collect()
    }

    // query_overlap measures the overlap of polygon with every accepted tile it touches.
    // Tiles that only share edges or corners are left out.
    pub fn query_overlap(&self, polygon: &Polygon, accept: impl Fn(TileId) -> bool) -> Vec<Overlap> {
        let bbox = match polygon.bbox() {
            Some(bbox) => bbox,
            None => return vec![],
        };
        let area = polygon.area();
        self.tree
            .query(&bbox.expand(EPSILON).to_bounds())
            .into_iter()
            .filter(|item| accept(item.tile) && item.bbox.intersects(&bbox))
            .filter_map(|item| {
                let overlap = item.polygon.overlap_area(polygon);
                let smaller = item.area.min(area);
                let larger = item.area.max(area);
                if smaller <= 0. || overlap / smaller <= self.overlap_eps {
                    return None
                }
                Some(Overlap { tile: item.tile, ratio: overlap / smaller, coverage: overlap / larger })
            })
            .collect()
    }

    // collides is true if polygon overlaps any accepted tile by more than the tolerance
    pub fn collides(&self, polygon: &Polygon, accept: impl Fn(TileId) -> bool) -> bool {
        !self.query_overlap(polygon, accept).is_empty()
    }

    // is_identical is true when an overlap covers both polygons entirely
    pub fn is_identical(&self, overlap: &Overlap) -> bool {
        overlap.coverage >= 1. - self.overlap_eps
    }
}
