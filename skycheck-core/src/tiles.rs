//! Map overlay tiles and condition icons served by OpenWeather.

use std::f64::consts::PI;

use crate::model::Coordinates;

const TILE_BASE: &str = "https://tile.openweathermap.org/map";
const ICON_BASE: &str = "https://openweathermap.org/img/wn";

pub const MAX_ZOOM: u8 = 19;

/// Web-mercator latitude limit.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileLayer {
    Temperature,
    Clouds,
    Precipitation,
}

impl TileLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileLayer::Temperature => "temp_new",
            TileLayer::Clouds => "clouds_new",
            TileLayer::Precipitation => "precipitation_new",
        }
    }

    /// Stacking order when overlaid on a base map.
    pub fn z_index(&self) -> u8 {
        match self {
            TileLayer::Temperature => 1,
            TileLayer::Clouds => 2,
            TileLayer::Precipitation => 3,
        }
    }

    pub const fn all() -> &'static [TileLayer] {
        &[TileLayer::Temperature, TileLayer::Clouds, TileLayer::Precipitation]
    }

    /// URL template with `{z}/{x}/{y}` placeholders left for the map widget.
    pub fn url_template(&self, api_key: &str) -> String {
        format!("{TILE_BASE}/{}/{{z}}/{{x}}/{{y}}.png?appid={api_key}", self.as_str())
    }

    pub fn tile_url(&self, tile: Tile, api_key: &str) -> String {
        format!(
            "{TILE_BASE}/{}/{}/{}/{}.png?appid={api_key}",
            self.as_str(),
            tile.zoom,
            tile.x,
            tile.y
        )
    }
}

impl std::fmt::Display for TileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl Tile {
    /// Slippy-map tile containing `coords` at `zoom` (clamped to [`MAX_ZOOM`]).
    pub fn containing(coords: Coordinates, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM);
        let n = f64::from(1u32 << zoom);
        let max_index = n - 1.0;

        let lat = coords.latitude.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let lon = coords.longitude.clamp(-180.0, 180.0);

        let x = ((lon + 180.0) / 360.0 * n).floor().clamp(0.0, max_index);
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n)
            .floor()
            .clamp(0.0, max_index);

        Self { zoom, x: x as u32, y: y as u32 }
    }
}

pub fn icon_url(code: &str) -> String {
    format!("{ICON_BASE}/{code}.png")
}

pub fn icon_url_2x(code: &str) -> String {
    format!("{ICON_BASE}/{code}@2x.png")
}
