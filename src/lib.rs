//! # arclayer
//!
//! ArcGIS Server layer support for Rust map viewers.
//!
//! This library covers the service-specific half of putting an ArcGIS Server
//! map service on screen: building per-tile image URLs for both delivery
//! modes (pre-rendered tile caches and on-demand `export` rendering),
//! resolving viewport-dependent attribution from a dynamic contributor feed,
//! and shaping `identify` point queries into popup content. Rendering, tile
//! transport and caching stay with the host viewer, which plugs in through
//! the [`TileSource`] and [`MapSurface`] traits.

pub mod attribution;
pub mod core;
pub mod identify;
pub mod layer;
pub mod service;
pub mod source;

// Re-export public API
pub use crate::core::{
    geo::{LatLng, LatLngBounds, TileCoord},
    viewport::{ScreenSize, Viewport},
};

pub use crate::layer::{
    ArcGisServerLayer, EventKind, ImageDelivery, LayerConfig, MapSurface, ViewerEvent,
};

pub use crate::source::{ExportSource, TileSource, TiledSource};

pub use crate::attribution::{Contributor, CoverageArea};

pub use crate::identify::{IdentifyParams, IdentifyRequest, IdentifyResponse, PopupContent};

pub use crate::service::{HttpTransport, ServiceClient, ServiceMetadata, Transport};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, LayerError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Service error: {0}")]
    Service(String),
}

/// Error type alias for convenience
pub type Error = LayerError;
