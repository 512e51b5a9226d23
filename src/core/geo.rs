use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Northernmost latitude representable in the spherical Mercator projection.
///
/// Tile row 0 at any zoom level tops out here; latitudes beyond it never
/// appear in tile bounds.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    /// Checks that the corners are ordered (south at or below north, west at
    /// or east of east). Inverted or NaN corners fail.
    pub fn is_valid(&self) -> bool {
        self.south_west.lat <= self.north_east.lat && self.south_west.lng <= self.north_east.lng
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Checks if the bounds intersect with another bounds.
    ///
    /// Boxes that merely touch along an edge or corner count as intersecting.
    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        !(other.north_east.lat < self.south_west.lat
            || other.south_west.lat > self.north_east.lat
            || other.north_east.lng < self.south_west.lng
            || other.south_west.lng > self.north_east.lng)
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Checks if the tile address is in range for its zoom level
    pub fn is_valid(&self) -> bool {
        if self.z >= 32 {
            return true;
        }
        let side = 1_u32 << self.z;
        self.x < side && self.y < side
    }

    /// Geographic bounds of this tile for the given tile size in pixels.
    ///
    /// Longitude edges map linearly across the world width at this zoom
    /// level; latitude edges run the top and bottom pixel rows through the
    /// inverse Mercator projection. Row `y` addresses the tile's top edge
    /// and row `y + 1` its bottom, so the result always has `south < north`
    /// and `west < east`, and tiles that are neighbors in the grid share
    /// their common edge value exactly.
    pub fn bounding_box(&self, tile_size: u32) -> LatLngBounds {
        let size = tile_size as f64;
        let world_px = size * 2_f64.powi(self.z as i32);

        let west = (self.x as f64 * size) * 360.0 / world_px - 180.0;
        let east = ((self.x as f64 + 1.0) * size) * 360.0 / world_px - 180.0;
        let north = Self::edge_latitude(self.y as f64 * size, size, self.z);
        let south = Self::edge_latitude((self.y as f64 + 1.0) * size, size, self.z);

        LatLngBounds::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Latitude of a horizontal pixel edge, via the inverse Mercator
    /// y-to-latitude mapping.
    fn edge_latitude(edge_px_y: f64, tile_size: f64, zoom: u8) -> f64 {
        let f = 0.5 - edge_px_y / tile_size / 2_f64.powi(zoom as i32);
        let e = (4.0 * PI * f).exp();
        ((e - 1.0) / (e + 1.0)).asin().to_degrees()
    }
}
