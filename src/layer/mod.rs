//! The layer itself: configuration, host events, and lifecycle.

pub mod arcgis;
pub mod config;
pub mod events;

pub use arcgis::{ArcGisServerLayer, MapSurface};
pub use config::{ImageDelivery, LayerConfig, DEFAULT_TILE_SIZE};
pub use events::{EventKind, Subscriptions, ViewerEvent};
