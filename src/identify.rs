//! Identify point queries and the popup content built from their results.

use serde::{Deserialize, Serialize};

use crate::core::geo::{LatLng, LatLngBounds};
use crate::core::viewport::{ScreenSize, Viewport};
use crate::Result;

/// Hit tolerance around the query point, in screen pixels.
const TOLERANCE_PX: u32 = 3;
/// Screen resolution the service assumes for display-to-map math.
const SCREEN_DPI: u32 = 96;
/// Title shown on every identify popup.
pub const POPUP_TITLE: &str = "Information";

/// Esri JSON spatial reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

/// WGS84 geographic coordinates, the reference all queries are sent in.
pub const WGS84: SpatialReference = SpatialReference { wkid: 4326 };

/// Esri JSON point geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EsriPoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "spatialReference")]
    pub spatial_reference: SpatialReference,
}

impl From<LatLng> for EsriPoint {
    fn from(position: LatLng) -> Self {
        Self {
            x: position.lng,
            y: position.lat,
            spatial_reference: WGS84,
        }
    }
}

/// Esri JSON envelope geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EsriExtent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    #[serde(rename = "spatialReference")]
    pub spatial_reference: SpatialReference,
}

impl From<&LatLngBounds> for EsriExtent {
    fn from(bounds: &LatLngBounds) -> Self {
        Self {
            xmin: bounds.west(),
            ymin: bounds.south(),
            xmax: bounds.east(),
            ymax: bounds.north(),
            spatial_reference: WGS84,
        }
    }
}

/// Parameters for an `identify` query at a clicked point.
///
/// Captures the click position together with the viewport state the service
/// needs to translate the pixel tolerance into map units.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyParams {
    geometry: EsriPoint,
    map_extent: EsriExtent,
    display: ScreenSize,
    layers: Option<String>,
}

impl IdentifyParams {
    /// Builds parameters for a click at `position` in the given view.
    pub fn new(position: LatLng, viewport: &Viewport) -> Self {
        Self {
            geometry: EsriPoint::from(position),
            map_extent: EsriExtent::from(&viewport.bounds),
            display: viewport.size,
            layers: None,
        }
    }

    /// Restricts the query to the given sublayer ids.
    pub fn with_layers(mut self, ids: &[u32]) -> Self {
        if !ids.is_empty() {
            let joined = ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            self.layers = Some(format!("visible:{}", joined));
        }
        self
    }

    /// Flattens into query pairs ready for the request URL.
    pub fn to_query(&self) -> Result<Vec<(&'static str, String)>> {
        let mut query = vec![
            ("f", "json".to_string()),
            ("geometry", serde_json::to_string(&self.geometry)?),
            ("geometryType", "esriGeometryPoint".to_string()),
            (
                "imageDisplay",
                format!(
                    "{},{},{}",
                    self.display.width, self.display.height, SCREEN_DPI
                ),
            ),
            ("mapExtent", serde_json::to_string(&self.map_extent)?),
            ("returnGeometry", "false".to_string()),
            ("sr", WGS84.wkid.to_string()),
            ("tolerance", TOLERANCE_PX.to_string()),
        ];
        if let Some(layers) = &self.layers {
            query.push(("layers", layers.clone()));
        }
        Ok(query)
    }
}

/// A fully shaped identify request the host executes when it chooses.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyRequest {
    /// The service `identify` endpoint.
    pub url: String,
    pub params: IdentifyParams,
    /// The clicked position, where any popup should anchor.
    pub position: LatLng,
}

/// One result row from an identify response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentifyResult {
    #[serde(default)]
    pub value: String,
}

/// Body of an identify response. Unknown fields are ignored and a missing
/// `results` key reads as empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentifyResponse {
    #[serde(default)]
    pub results: Vec<IdentifyResult>,
}

/// Popup content derived from identify results.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    /// One row per identify result, in response order.
    pub rows: Vec<String>,
    /// Geographic anchor for the popup.
    pub position: LatLng,
}

impl PopupContent {
    /// Builds popup content, or `None` when the query hit nothing.
    pub fn from_results(position: LatLng, response: &IdentifyResponse) -> Option<Self> {
        if response.results.is_empty() {
            return None;
        }
        Some(Self {
            title: POPUP_TITLE.to_string(),
            rows: response.results.iter().map(|r| r.value.clone()).collect(),
            position,
        })
    }
}
