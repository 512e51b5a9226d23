//! Tile URL construction for the two image delivery modes

pub mod export;
pub mod tiled;

pub use export::ExportSource;
pub use tiled::TiledSource;

use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}
