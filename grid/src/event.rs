use crate::tile::TileId;

// GridEvent records a change to the grid, in the order it happened
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GridEvent {
    AddTile(TileId),
    RemoveTile(TileId),
    AddPlaceholder(TileId),
    RemovePlaceholder(TileId),
    UpdateTileColors(TileId),
}

impl GridEvent {
    pub fn tile(&self) -> TileId {
        match self {
            GridEvent::AddTile(tile)
            | GridEvent::RemoveTile(tile)
            | GridEvent::AddPlaceholder(tile)
            | GridEvent::RemovePlaceholder(tile)
            | GridEvent::UpdateTileColors(tile) => *tile,
        }
    }
}
