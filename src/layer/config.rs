use serde::{Deserialize, Serialize};

use crate::{LayerError, Result};

/// Default edge length of requested tiles, in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// How the service delivers map images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDelivery {
    /// The service publishes a pre-rendered tile cache.
    Tiled,
    /// Tiles are rendered on demand through the `export` operation.
    Export,
}

/// Configuration for [`ArcGisServerLayer`](crate::layer::ArcGisServerLayer).
///
/// The service URL and the delivery mode are required up front; everything
/// else has a default. Configuration is checked once when the layer is
/// built, so a bad URL fails immediately instead of surfacing later as
/// broken tile requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Service root URL, e.g.
    /// `https://server/arcgis/rest/services/Name/MapServer`.
    pub url: String,
    pub delivery: ImageDelivery,
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Sublayer ids to restrict rendering and identify queries to.
    #[serde(default)]
    pub visible_layers: Option<Vec<u32>>,
    /// URL of a dynamic attribution feed to resolve credits from.
    #[serde(default)]
    pub attribution_feed: Option<String>,
    /// Whether clicks should produce identify popups.
    #[serde(default = "default_popup")]
    pub popup: bool,
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

fn default_popup() -> bool {
    true
}

impl LayerConfig {
    /// Creates a configuration with defaults for all optional settings.
    pub fn new(url: impl Into<String>, delivery: ImageDelivery) -> Self {
        Self {
            url: url.into(),
            delivery,
            tile_size: DEFAULT_TILE_SIZE,
            visible_layers: None,
            attribution_feed: None,
            popup: true,
        }
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_visible_layers(mut self, ids: Vec<u32>) -> Self {
        self.visible_layers = Some(ids);
        self
    }

    pub fn with_attribution_feed(mut self, feed_url: impl Into<String>) -> Self {
        self.attribution_feed = Some(feed_url.into());
        self
    }

    pub fn without_popup(mut self) -> Self {
        self.popup = false;
        self
    }

    /// Normalizes the service URL and rejects configurations that could only
    /// fail later.
    pub(crate) fn validated(mut self) -> Result<Self> {
        while self.url.ends_with('/') {
            self.url.pop();
        }
        if self.url.is_empty() {
            return Err(LayerError::Config("a service url is required".to_string()));
        }
        if !is_http_url(&self.url) {
            return Err(LayerError::Config(format!(
                "service url must be http(s): {}",
                self.url
            )));
        }
        if self.tile_size == 0 {
            return Err(LayerError::Config("tile size must be non-zero".to_string()));
        }
        if let Some(feed_url) = &self.attribution_feed {
            if !is_http_url(feed_url) {
                return Err(LayerError::Config(format!(
                    "attribution feed url must be http(s): {}",
                    feed_url
                )));
            }
        }
        Ok(self)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = "https://gis.example.com/arcgis/rest/services/Parks/MapServer";

    #[test]
    fn test_defaults() {
        let config = LayerConfig::new(SERVICE, ImageDelivery::Tiled);

        assert_eq!(config.tile_size, DEFAULT_TILE_SIZE);
        assert!(config.popup);
        assert!(config.visible_layers.is_none());
        assert!(config.attribution_feed.is_none());
    }

    #[test]
    fn test_builder_settings() {
        let config = LayerConfig::new(SERVICE, ImageDelivery::Export)
            .with_tile_size(512)
            .with_visible_layers(vec![0, 2])
            .with_attribution_feed("https://static.arcgis.com/attribution/World_Street_Map")
            .without_popup();

        assert_eq!(config.tile_size, 512);
        assert_eq!(config.visible_layers, Some(vec![0, 2]));
        assert!(!config.popup);
    }

    #[test]
    fn test_validation_trims_trailing_slashes() {
        let config = LayerConfig::new(format!("{}//", SERVICE), ImageDelivery::Tiled)
            .validated()
            .unwrap();
        assert_eq!(config.url, SERVICE);
    }

    #[test]
    fn test_validation_rejects_bad_configs() {
        assert!(LayerConfig::new("", ImageDelivery::Tiled).validated().is_err());
        assert!(LayerConfig::new("ftp://gis.example.com/Parks", ImageDelivery::Tiled)
            .validated()
            .is_err());
        assert!(LayerConfig::new(SERVICE, ImageDelivery::Tiled)
            .with_tile_size(0)
            .validated()
            .is_err());
        assert!(LayerConfig::new(SERVICE, ImageDelivery::Tiled)
            .with_attribution_feed("attribution.json")
            .validated()
            .is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config: LayerConfig = serde_json::from_str(
            r#"{
                "url": "https://gis.example.com/arcgis/rest/services/Parks/MapServer",
                "delivery": "export",
                "visible_layers": [1, 3]
            }"#,
        )
        .unwrap();

        assert_eq!(config.delivery, ImageDelivery::Export);
        assert_eq!(config.tile_size, DEFAULT_TILE_SIZE);
        assert!(config.popup);
        assert_eq!(config.visible_layers, Some(vec![1, 3]));
    }
}
