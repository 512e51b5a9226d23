//! End-to-end exercise of the layer lifecycle against a scripted host
//! viewer and canned service responses.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use arclayer::{
    ArcGisServerLayer, ImageDelivery, LatLng, LatLngBounds, LayerConfig, LayerError, MapSurface,
    ScreenSize, ServiceClient, TileCoord, Transport, ViewerEvent, Viewport,
};

const SERVICE: &str = "https://tiles.arcgis.com/tiles/AbC123/arcgis/rest/services/Parks/MapServer";
const FEED: &str = "https://static.arcgis.com/attribution/Parks";

/// Transport that replays canned bodies keyed by request URL.
struct ScriptedTransport {
    responses: HashMap<String, Value>,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    fn respond(mut self, url: &str, body: Value) -> Self {
        self.responses.insert(url.to_string(), body);
        self
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &str, _query: &[(&str, String)]) -> arclayer::Result<Value> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| LayerError::Service(format!("unexpected request to {}", url)))
    }
}

/// Minimal host viewer: a viewport and an attribution line.
struct Host {
    viewport: Viewport,
    attribution_line: Vec<String>,
}

impl Host {
    fn over_portland() -> Self {
        Self {
            viewport: Viewport::new(
                LatLngBounds::from_coords(45.2, -123.0, 45.8, -122.2),
                12,
                ScreenSize::new(1024, 768),
            ),
            attribution_line: Vec::new(),
        }
    }

    fn pan_to(&mut self, south: f64, west: f64, north: f64, east: f64) {
        self.viewport = Viewport::new(
            LatLngBounds::from_coords(south, west, north, east),
            self.viewport.zoom,
            self.viewport.size,
        );
    }
}

impl MapSurface for Host {
    fn viewport(&self) -> Viewport {
        self.viewport.clone()
    }

    fn add_attribution(&mut self, text: &str) {
        self.attribution_line.push(text.to_string());
    }

    fn remove_attribution(&mut self, text: &str) {
        self.attribution_line.retain(|t| t != text);
    }
}

fn scripted_service() -> ScriptedTransport {
    ScriptedTransport::new()
        .respond(
            SERVICE,
            json!({
                "currentVersion": 10.81,
                "mapName": "Parks and Trails",
                "copyrightText": "City of Portland",
                "capabilities": "Map,Query"
            }),
        )
        .respond(
            FEED,
            json!({
                "contributors": [
                    {
                        "attribution": "Esri",
                        "coverageAreas": [
                            {"zoomMin": 0, "zoomMax": 19, "bbox": [-90, -180, 90, 180]}
                        ]
                    },
                    {
                        "attribution": "Oregon Metro",
                        "coverageAreas": [
                            {"zoomMin": 8, "zoomMax": 19, "bbox": [44.8, -123.5, 46.0, -121.5]}
                        ]
                    }
                ]
            }),
        )
        .respond(
            &format!("{}/identify", SERVICE),
            json!({
                "results": [
                    {"layerId": 0, "layerName": "Parks", "value": "Forest Park"}
                ]
            }),
        )
}

#[tokio::test]
async fn layer_lifecycle_from_add_to_remove() {
    let mut layer = ArcGisServerLayer::new(
        LayerConfig::new(SERVICE, ImageDelivery::Tiled).with_attribution_feed(FEED),
    )
    .unwrap();
    let client = ServiceClient::with_transport(scripted_service());
    let mut host = Host::over_portland();

    layer.load_remote(&client).await;
    assert_eq!(
        layer.metadata().and_then(|m| m.map_name.as_deref()),
        Some("Parks and Trails")
    );

    layer.on_add();
    assert!(layer.is_attached());

    // First settle: both contributors cover the Portland viewport.
    layer.handle_event(&ViewerEvent::TilesLoaded, &mut host);
    assert_eq!(host.attribution_line, vec!["Esri, Oregon Metro"]);

    // A click becomes an identify request the host runs through the client.
    let request = layer
        .handle_event(
            &ViewerEvent::Click {
                position: LatLng::new(45.53, -122.72),
            },
            &mut host,
        )
        .expect("click should produce an identify request");
    assert_eq!(request.url, format!("{}/identify", SERVICE));

    let popup = client.identify_popup(&request).await.expect("hit expected");
    assert_eq!(popup.title, "Information");
    assert_eq!(popup.rows, vec!["Forest Park"]);
    assert_eq!(popup.position, LatLng::new(45.53, -122.72));

    // Pan to the other side of the world: only the global credit remains.
    host.pan_to(-10.0, 10.0, 10.0, 30.0);
    layer.handle_event(&ViewerEvent::MoveEnd, &mut host);
    assert_eq!(host.attribution_line, vec!["Esri"]);

    // Removal clears the credit and the subscriptions; repeated removal is
    // harmless and later events fall on deaf ears.
    layer.on_remove(&mut host);
    assert!(host.attribution_line.is_empty());
    assert!(!layer.is_attached());
    layer.on_remove(&mut host);

    layer.handle_event(&ViewerEvent::ZoomEnd, &mut host);
    assert!(host.attribution_line.is_empty());
}

#[tokio::test]
async fn feed_failure_leaves_layer_working() {
    let mut layer = ArcGisServerLayer::new(
        LayerConfig::new(SERVICE, ImageDelivery::Tiled).with_attribution_feed(FEED),
    )
    .unwrap();
    // Only metadata is scripted; the feed request fails.
    let transport = ScriptedTransport::new().respond(SERVICE, json!({"mapName": "Parks"}));
    let client = ServiceClient::with_transport(transport);
    let mut host = Host::over_portland();

    layer.load_remote(&client).await;
    layer.on_add();
    layer.handle_event(&ViewerEvent::TilesLoaded, &mut host);

    assert!(host.attribution_line.is_empty());
    assert_eq!(
        layer.metadata().and_then(|m| m.map_name.as_deref()),
        Some("Parks")
    );
    assert!(layer.tile_source().url(TileCoord::new(0, 0, 1)).contains("/tile/1/0/0"));
}

#[tokio::test]
async fn identify_failure_means_no_popup() {
    let mut layer =
        ArcGisServerLayer::new(LayerConfig::new(SERVICE, ImageDelivery::Tiled)).unwrap();
    // No identify response scripted, so the request errors out.
    let client = ServiceClient::with_transport(ScriptedTransport::new());
    let mut host = Host::over_portland();

    layer.on_add();
    let request = layer
        .handle_event(
            &ViewerEvent::Click {
                position: LatLng::new(45.5, -122.5),
            },
            &mut host,
        )
        .unwrap();

    assert!(client.identify_popup(&request).await.is_none());
}

#[tokio::test]
async fn export_layer_round_trip() {
    let mut layer = ArcGisServerLayer::new(
        LayerConfig::new(SERVICE, ImageDelivery::Export).with_visible_layers(vec![0, 2]),
    )
    .unwrap();
    let client = ServiceClient::with_transport(scripted_service());
    let mut host = Host::over_portland();

    layer.load_remote(&client).await;
    layer.on_add();

    // Tile URLs go through export with the sublayer restriction.
    let url = layer.tile_source().url(TileCoord::new(1, 1, 2));
    assert!(url.starts_with(&format!("{}/export?", SERVICE)));
    assert!(url.ends_with("&layers=show:0,2"));

    // The restriction also reaches identify queries.
    let request = layer
        .handle_event(
            &ViewerEvent::Click {
                position: LatLng::new(45.53, -122.72),
            },
            &mut host,
        )
        .unwrap();
    let query = request.params.to_query().unwrap();
    assert!(query.contains(&("layers", "visible:0,2".to_string())));
}

#[test]
fn hosted_tile_urls_rotate_across_aliases() {
    let layer = ArcGisServerLayer::new(LayerConfig::new(SERVICE, ImageDelivery::Tiled)).unwrap();

    let first = layer.tile_source().url(TileCoord::new(0, 0, 3));
    let second = layer.tile_source().url(TileCoord::new(1, 0, 3));

    assert!(first.starts_with("https://tiles1.arcgis.com/"));
    assert!(second.starts_with("https://tiles2.arcgis.com/"));
    assert!(first.ends_with("/tile/3/0/0"));
}
