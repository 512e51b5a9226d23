use crate::attribution::{resolve, Contributor};
use crate::core::geo::LatLng;
use crate::core::viewport::Viewport;
use crate::identify::{IdentifyParams, IdentifyRequest};
use crate::layer::config::{ImageDelivery, LayerConfig};
use crate::layer::events::{EventKind, Subscriptions, ViewerEvent};
use crate::service::{ServiceClient, ServiceMetadata, Transport};
use crate::source::{ExportSource, TileSource, TiledSource};
use crate::Result;

/// Host-side surface the layer talks back to.
///
/// A host viewer implements this to expose its attribution line and current
/// view. It is the only part of the host the layer ever touches.
pub trait MapSurface {
    /// Current view snapshot.
    fn viewport(&self) -> Viewport;
    /// Appends a credit to the attribution line.
    fn add_attribution(&mut self, text: &str);
    /// Removes a credit previously added by this layer.
    fn remove_attribution(&mut self, text: &str);
}

/// A map layer backed by an ArcGIS Server map service.
///
/// The layer owns the service-specific behavior: the tile source for the
/// configured delivery mode, keeping the host's attribution line in step
/// with the viewport, and turning clicks into identify requests. It is
/// composed into a host viewer rather than extending one; the host drives
/// it through [`on_add`](Self::on_add), [`handle_event`](Self::handle_event)
/// and [`on_remove`](Self::on_remove).
pub struct ArcGisServerLayer {
    config: LayerConfig,
    source: Box<dyn TileSource>,
    contributors: Option<Vec<Contributor>>,
    metadata: Option<ServiceMetadata>,
    current_attribution: Option<String>,
    subscriptions: Subscriptions,
}

impl ArcGisServerLayer {
    /// Validates `config` and builds the layer for its delivery mode.
    pub fn new(config: LayerConfig) -> Result<Self> {
        let config = config.validated()?;
        let source: Box<dyn TileSource> = match config.delivery {
            ImageDelivery::Tiled => Box::new(TiledSource::new(&config.url)),
            ImageDelivery::Export => Box::new(ExportSource::new(
                &config.url,
                config.tile_size,
                config.visible_layers.as_deref(),
            )),
        };
        Ok(Self {
            config,
            source,
            contributors: None,
            metadata: None,
            current_attribution: None,
            subscriptions: Subscriptions::none(),
        })
    }

    /// The tile source for the configured delivery mode. The host feeds its
    /// tile pipeline from this.
    pub fn tile_source(&self) -> &dyn TileSource {
        self.source.as_ref()
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Service metadata fetched by [`load_remote`](Self::load_remote), if any.
    pub fn metadata(&self) -> Option<&ServiceMetadata> {
        self.metadata.as_ref()
    }

    /// The credit line currently shown for this layer, if any.
    pub fn attribution(&self) -> Option<&str> {
        self.current_attribution.as_deref()
    }

    /// The event subscriptions currently held.
    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Supplies attribution contributors directly, replacing any previous
    /// set. Takes effect at the next view-settling event.
    pub fn set_contributors(&mut self, contributors: Vec<Contributor>) {
        self.contributors = Some(contributors);
    }

    /// Supplies service metadata directly, for hosts that fetch it
    /// themselves.
    pub fn set_metadata(&mut self, metadata: ServiceMetadata) {
        self.metadata = Some(metadata);
    }

    /// Fetches the configured attribution feed and the service metadata.
    ///
    /// Both fetches are best effort: failures are logged and the layer keeps
    /// working without the data.
    pub async fn load_remote<T: Transport>(&mut self, client: &ServiceClient<T>) {
        if let Some(feed_url) = self.config.attribution_feed.clone() {
            match client.contributors(&feed_url).await {
                Ok(contributors) => self.contributors = Some(contributors),
                Err(e) => log::warn!("Failed to fetch attribution feed {}: {}", feed_url, e),
            }
        }
        match client.metadata(&self.config.url).await {
            Ok(metadata) => self.metadata = Some(metadata),
            Err(e) => log::warn!("Failed to fetch service metadata: {}", e),
        }
    }

    /// Attaches the layer to a host viewer by establishing its subscription
    /// set in one piece.
    ///
    /// View-settling events are always subscribed; clicks only when popups
    /// are enabled.
    pub fn on_add(&mut self) {
        self.subscriptions = Subscriptions::none();
        for kind in [
            EventKind::ViewReset,
            EventKind::ZoomEnd,
            EventKind::MoveEnd,
            EventKind::TilesLoaded,
        ] {
            self.subscriptions.subscribe(kind);
        }
        if self.config.popup {
            self.subscriptions.subscribe(EventKind::Click);
        }
    }

    /// Detaches from the host: removes this layer's credit from the
    /// attribution line and clears the subscription set. Safe to call on an
    /// already detached layer.
    pub fn on_remove(&mut self, surface: &mut dyn MapSurface) {
        self.clear_attribution(surface);
        self.subscriptions.clear();
    }

    /// Feeds one host event through the layer.
    ///
    /// Events outside the subscription set are ignored. View-settling events
    /// re-resolve attribution against the current viewport. A click yields
    /// the identify request for the host to execute.
    pub fn handle_event(
        &mut self,
        event: &ViewerEvent,
        surface: &mut dyn MapSurface,
    ) -> Option<IdentifyRequest> {
        let kind = event.kind();
        if !self.subscriptions.contains(kind) {
            return None;
        }
        match event {
            ViewerEvent::Click { position } => {
                Some(self.identify_request(*position, &surface.viewport()))
            }
            _ if kind.affects_attribution() => {
                self.refresh_attribution(surface);
                None
            }
            _ => None,
        }
    }

    /// Builds the identify request for a click at `position`, carrying the
    /// configured sublayer restriction.
    pub fn identify_request(&self, position: LatLng, viewport: &Viewport) -> IdentifyRequest {
        let mut params = IdentifyParams::new(position, viewport);
        if let Some(ids) = &self.config.visible_layers {
            params = params.with_layers(ids);
        }
        IdentifyRequest {
            url: format!("{}/identify", self.config.url),
            params,
            position,
        }
    }

    fn refresh_attribution(&mut self, surface: &mut dyn MapSurface) {
        let Some(contributors) = &self.contributors else {
            return;
        };
        let resolved = resolve(contributors, &surface.viewport());
        let next = if resolved.is_empty() {
            None
        } else {
            Some(resolved.join(", "))
        };
        if next == self.current_attribution {
            return;
        }
        self.clear_attribution(surface);
        if let Some(text) = next {
            surface.add_attribution(&text);
            self.current_attribution = Some(text);
        }
    }

    fn clear_attribution(&mut self, surface: &mut dyn MapSurface) {
        if let Some(old) = self.current_attribution.take() {
            surface.remove_attribution(&old);
        }
    }
}
