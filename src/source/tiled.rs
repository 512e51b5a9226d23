use crate::core::geo::TileCoord;
use crate::source::TileSource;

const ARCGIS_DOMAIN: &str = ".arcgis.com";
const HOSTED_TILES_HOST: &str = "://tiles.arcgis.com";
const HOSTED_TILES_TEMPLATE: &str = "://tiles{s}.arcgis.com";
const HOSTED_SUBDOMAINS: [&str; 4] = ["1", "2", "3", "4"];

/// Tile source for services that publish a pre-rendered tile cache.
///
/// URLs follow the `{service}/tile/{z}/{y}/{x}` scheme. Services on the
/// shared `tiles.arcgis.com` host are spread across the `tiles1` through
/// `tiles4` aliases the platform provides, so concurrent tile requests fan
/// out over several hostnames.
pub struct TiledSource {
    base_url: String,
    subdomains: Vec<&'static str>,
}

impl TiledSource {
    /// Creates a source for the given service URL (no trailing slash).
    ///
    /// A `{s}` placeholder already present in an `arcgis.com` URL is honored
    /// as-is; otherwise one is inserted for the shared hosting domain. The
    /// numeric alias rotation is specific to that platform, so URLs on other
    /// hosts are used verbatim, any placeholder left for the host viewer's
    /// own templating.
    pub fn new(service_url: &str) -> Self {
        let base_url = if service_url.contains(HOSTED_TILES_HOST) && !service_url.contains("{s}") {
            service_url.replacen(HOSTED_TILES_HOST, HOSTED_TILES_TEMPLATE, 1)
        } else {
            service_url.to_string()
        };
        let subdomains = if base_url.contains("{s}") && base_url.contains(ARCGIS_DOMAIN) {
            HOSTED_SUBDOMAINS.to_vec()
        } else {
            Vec::new()
        };

        Self {
            base_url,
            subdomains,
        }
    }
}

impl TileSource for TiledSource {
    fn url(&self, coord: TileCoord) -> String {
        let base = if self.subdomains.is_empty() {
            self.base_url.clone()
        } else {
            // Wrapped sum: deep-zoom addresses can push x + y past u32::MAX.
            let pick = coord.x.wrapping_add(coord.y) % self.subdomains.len() as u32;
            self.base_url.replacen("{s}", self.subdomains[pick as usize], 1)
        };

        format!("{}/tile/{}/{}/{}", base, coord.z, coord.y, coord.x)
    }
}
