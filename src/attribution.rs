//! Dynamic attribution resolved against the current viewport.
//!
//! Hosted services publish a contributor feed where every contributor names
//! the zoom range and geographic boxes its data covers. The layer re-resolves
//! the feed whenever the view settles, so the credit line only names
//! contributors whose data can actually be on screen.

use serde::{Deserialize, Deserializer};

use crate::core::geo::LatLngBounds;
use crate::core::viewport::Viewport;

/// One rectangle of coverage with the zoom range it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageArea {
    pub bounds: LatLngBounds,
    pub zoom_min: u8,
    pub zoom_max: u8,
}

/// Wire shape of a coverage area. The `bbox` array is ordered
/// `[south, west, north, east]`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverageAreaWire {
    zoom_min: u8,
    zoom_max: u8,
    bbox: [f64; 4],
}

impl<'de> Deserialize<'de> for CoverageArea {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CoverageAreaWire::deserialize(deserializer)?;
        let [south, west, north, east] = wire.bbox;
        Ok(CoverageArea {
            bounds: LatLngBounds::from_coords(south, west, north, east),
            zoom_min: wire.zoom_min,
            zoom_max: wire.zoom_max,
        })
    }
}

impl CoverageArea {
    /// Whether this area applies to the given viewport.
    ///
    /// The zoom range is inclusive at both ends and boxes that merely touch
    /// the viewport edge still match. Malformed areas (inverted zoom range,
    /// inverted or NaN box) never match.
    pub fn matches(&self, viewport: &Viewport) -> bool {
        self.zoom_min <= self.zoom_max
            && self.bounds.is_valid()
            && (self.zoom_min..=self.zoom_max).contains(&viewport.zoom)
            && self.bounds.intersects(&viewport.bounds)
    }
}

/// A data contributor from the attribution feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contributor {
    pub attribution: String,
    #[serde(rename = "coverageAreas", default)]
    pub coverage_areas: Vec<CoverageArea>,
}

/// Envelope of the attribution feed document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttributionFeed {
    #[serde(default)]
    pub contributors: Vec<Contributor>,
}

/// Attribution strings of every contributor covering the viewport.
///
/// Contributors keep their feed order and appear at most once each, no
/// matter how many of their coverage areas match.
pub fn resolve(contributors: &[Contributor], viewport: &Viewport) -> Vec<String> {
    let mut include = Vec::new();
    for contributor in contributors {
        if contributor.coverage_areas.iter().any(|a| a.matches(viewport)) {
            include.push(contributor.attribution.clone());
        }
    }
    include
}
