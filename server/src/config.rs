use std::str::FromStr;

use crate::error::ConfigError;

/// Canvas and output settings, fixed once the map is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Interior canvas width in pixels.
    pub width: u32,
    /// Interior canvas height in pixels.
    pub height: u32,
    /// Map units per pixel.
    pub pixel_size: u32,
    /// Size of the map coordinate space.
    pub map_size: u32,
    pub render_floor: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 80,
            pixel_size: 5,
            map_size: 5120,
            render_floor: true,
        }
    }
}

pub struct Config {
    pub listen_addr: String,
    pub map: MapConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = MapConfig::default();
        let map = MapConfig {
            width: parse_or(&lookup, "MOCK_MAP_WIDTH", defaults.width)?,
            height: parse_or(&lookup, "MOCK_MAP_HEIGHT", defaults.height)?,
            pixel_size: parse_or(&lookup, "MOCK_MAP_PIXEL_SIZE", defaults.pixel_size)?,
            map_size: parse_or(&lookup, "MOCK_MAP_SIZE", defaults.map_size)?,
            render_floor: parse_or(&lookup, "MOCK_MAP_RENDER_FLOOR", defaults.render_floor)?,
        };
        map.validate()?;

        Ok(Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            map,
        })
    }
}

impl MapConfig {
    /// The walled canvas, `(width + 2)` by `(height + 2)` pixels, must fit
    /// inside the map coordinate space.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_size == 0 {
            return Err(ConfigError::ZeroPixelSize);
        }

        let extent = |side: u32| (u64::from(side) + 2) * u64::from(self.pixel_size);
        if extent(self.width) > u64::from(self.map_size) || extent(self.height) > u64::from(self.map_size) {
            return Err(ConfigError::CanvasTooLarge {
                width: self.width,
                height: self.height,
                pixel_size: self.pixel_size,
                map_size: self.map_size,
            });
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
