use crate::core::geo::TileCoord;
use crate::source::TileSource;

/// Tile source that renders tiles on demand through the service's `export`
/// operation.
///
/// Each tile address is projected to its geographic bounds and encoded as an
/// `export` query requesting a transparent PNG in Web Mercator (wkid 102100)
/// sized to exactly one tile. The bounding box is sent in WGS84 as
/// `west,south,east,north`; the server reprojects.
pub struct ExportSource {
    base_url: String,
    tile_size: u32,
    layer_defs: Option<String>,
}

impl ExportSource {
    /// Creates a source for the given service URL (no trailing slash).
    ///
    /// When `visible_layers` is non-empty, exported images are restricted to
    /// those sublayer ids via the `layers=show:` parameter.
    pub fn new(service_url: &str, tile_size: u32, visible_layers: Option<&[u32]>) -> Self {
        let layer_defs = visible_layers
            .filter(|ids| !ids.is_empty())
            .map(|ids| {
                let joined = ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("show:{}", joined)
            });

        Self {
            base_url: service_url.to_string(),
            tile_size,
            layer_defs,
        }
    }
}

impl TileSource for ExportSource {
    fn url(&self, coord: TileCoord) -> String {
        let bounds = coord.bounding_box(self.tile_size);
        let mut url = format!(
            "{}/export?dpi=96&transparent=true&format=png8&bbox={},{},{},{}&bboxSR=4326&imageSR=102100&size={},{}&f=image",
            self.base_url,
            bounds.west(),
            bounds.south(),
            bounds.east(),
            bounds.north(),
            self.tile_size,
            self.tile_size,
        );
        if let Some(layer_defs) = &self.layer_defs {
            url.push_str("&layers=");
            url.push_str(layer_defs);
        }
        url
    }
}
