use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tile edge in pixels for the Web Mercator pyramid.
pub const TILE_SIZE: f64 = 256.0;

pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 20;

/// Mercator is undefined at the poles; projections clamp to this latitude.
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> LatLng {
        LatLng { lat, lon }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8) -> Viewport {
        Viewport {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }
}

/// Screen size the host map is drawn at, used to fit bounds.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ViewportSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        ViewportSize {
            width_px: 1280,
            height_px: 720,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn around(point: LatLng) -> Bounds {
        Bounds {
            south: point.lat,
            west: point.lon,
            north: point.lat,
            east: point.lon,
        }
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lon);
        self.east = self.east.max(point.lon);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Deepest zoom at which the whole box still fits in `size`, capped to
    /// `max_zoom`. A degenerate box fits at any zoom.
    pub fn fit_zoom(&self, size: ViewportSize, max_zoom: u8) -> u8 {
        for zoom in (MIN_ZOOM..=max_zoom).rev() {
            let sw = project(LatLng::new(self.south, self.west), zoom);
            let ne = project(LatLng::new(self.north, self.east), zoom);
            let width = (ne.x - sw.x).abs();
            let height = (sw.y - ne.y).abs();
            if width <= size.width_px as f64 && height <= size.height_px as f64 {
                return zoom;
            }
        }
        MIN_ZOOM
    }
}

/// Absolute pixel position in the world image at a given zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn distance(&self, other: &PixelPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Spherical Web Mercator, the projection slippy-map tiles are drawn in.
pub fn project(point: LatLng, zoom: u8) -> PixelPoint {
    let scale = TILE_SIZE * f64::from(1u32 << zoom.min(MAX_ZOOM));
    let lat = point
        .lat
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    let x = (point.lon + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
    PixelPoint { x, y }
}
