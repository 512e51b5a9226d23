use crate::core::geo::LatLngBounds;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the host viewer's map container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Snapshot of the current view of the map: visible bounds, zoom, and
/// screen dimensions.
///
/// The host viewer owns view state and hands a fresh snapshot to the layer
/// whenever one is needed. The layer never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The geographic area currently on screen
    pub bounds: LatLngBounds,
    /// The current integer zoom level
    pub zoom: u8,
    /// The size of the viewport in pixels
    pub size: ScreenSize,
}

impl Viewport {
    /// Creates a new viewport snapshot
    pub fn new(bounds: LatLngBounds, zoom: u8, size: ScreenSize) -> Self {
        Self { bounds, zoom, size }
    }
}
