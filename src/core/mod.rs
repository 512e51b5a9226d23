//! Geographic primitives shared across the crate

pub mod geo;
pub mod viewport;

pub use geo::{LatLng, LatLngBounds, TileCoord, MAX_LATITUDE};
pub use viewport::{ScreenSize, Viewport};
