//! Configuration for the map container
//!
//! `MapOptions` mirrors the props a map container accepts. It can be built in
//! code (usually through [`MapBuilder`](crate::core::builder::MapBuilder)) or
//! loaded from JSON, and is validated before the engine ever sees it.

use crate::{
    core::{constants, geo::LngLat},
    style::StyleMode,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

/// Corner of the map a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ControlPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlPosition::TopLeft => "top-left",
            ControlPosition::TopRight => "top-right",
            ControlPosition::BottomLeft => "bottom-left",
            ControlPosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for ControlPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Initial center
    pub center: LngLat,
    /// Initial zoom level
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Camera tilt in degrees
    pub pitch: f64,
    /// Camera rotation in degrees
    pub bearing: f64,
    pub style: StyleMode,
    /// URL of the PMTiles archive backing the basemap
    pub tiles: String,
    /// Enables pan/zoom interactions
    pub interactive: bool,
    /// Extra CSS classes for the container element
    pub class: Option<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LngLat::default(),
            zoom: constants::DEFAULT_ZOOM,
            min_zoom: constants::DEFAULT_MIN_ZOOM,
            max_zoom: constants::DEFAULT_MAX_ZOOM,
            pitch: 0.0,
            bearing: 0.0,
            style: StyleMode::Auto,
            tiles: String::new(),
            interactive: true,
            class: None,
        }
    }
}

impl MapOptions {
    pub fn new(tiles: impl Into<String>) -> Self {
        Self {
            tiles: tiles.into(),
            ..Self::default()
        }
    }

    /// Parse and validate options from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let options: MapOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Read, parse and validate options from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tiles.trim().is_empty() {
            return Err(MapError::InvalidOptions(
                "`tiles` must point to a PMTiles archive".to_string(),
            ));
        }

        if !self.center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "center {:?} is outside [-180, 180] x [-90, 90]",
                self.center.to_array()
            )));
        }

        if !(self.min_zoom >= 0.0 && self.min_zoom <= constants::ZOOM_LIMIT) {
            return Err(MapError::InvalidOptions(format!(
                "min_zoom {} must be within [0, {}]",
                self.min_zoom,
                constants::ZOOM_LIMIT
            )));
        }

        if !(self.max_zoom >= self.min_zoom && self.max_zoom <= constants::ZOOM_LIMIT) {
            return Err(MapError::InvalidOptions(format!(
                "max_zoom {} must be within [{}, {}]",
                self.max_zoom,
                self.min_zoom,
                constants::ZOOM_LIMIT
            )));
        }

        if !(self.zoom >= self.min_zoom && self.zoom <= self.max_zoom) {
            return Err(MapError::InvalidOptions(format!(
                "zoom {} must be within [{}, {}]",
                self.zoom, self.min_zoom, self.max_zoom
            )));
        }

        if !(self.pitch >= 0.0 && self.pitch <= constants::MAX_PITCH) {
            return Err(MapError::InvalidOptions(format!(
                "pitch {} must be within [0, {}]",
                self.pitch,
                constants::MAX_PITCH
            )));
        }

        if !self.bearing.is_finite() {
            return Err(MapError::InvalidOptions("bearing must be finite".to_string()));
        }

        if let StyleMode::Custom(style) = &self.style {
            style.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = MapOptions::default();
        assert_eq!(options.center, LngLat::new(0.0, 0.0));
        assert_eq!(options.zoom, 1.0);
        assert_eq!(options.min_zoom, 0.0);
        assert_eq!(options.max_zoom, 22.0);
        assert!(options.interactive);
        assert_eq!(options.style, StyleMode::Auto);
        assert!(options.class.is_none());
    }

    #[test]
    fn test_tiles_are_required() {
        let err = MapOptions::default().validate().unwrap_err();
        assert!(matches!(err, MapError::InvalidOptions(_)));

        assert!(MapOptions::new("https://example.com/world.pmtiles")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_zoom_range_validation() {
        let mut options = MapOptions::new("world.pmtiles");
        options.min_zoom = 5.0;
        options.max_zoom = 3.0;
        assert!(options.validate().is_err());

        let mut options = MapOptions::new("world.pmtiles");
        options.zoom = 23.0;
        assert!(options.validate().is_err());

        let mut options = MapOptions::new("world.pmtiles");
        options.max_zoom = 30.0;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_pitch_and_center_validation() {
        let mut options = MapOptions::new("world.pmtiles");
        options.pitch = 90.0;
        assert!(options.validate().is_err());

        let mut options = MapOptions::new("world.pmtiles");
        options.center = LngLat::new(0.0, 95.0);
        assert!(matches!(
            options.validate(),
            Err(MapError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let options = MapOptions::from_json(
            r#"{
                "center": [-122.42, 37.77],
                "zoom": 11,
                "style": "dark",
                "tiles": "https://example.com/sf.pmtiles",
                "interactive": false
            }"#,
        )
        .unwrap();

        assert_eq!(options.center, LngLat::new(-122.42, 37.77));
        assert_eq!(options.zoom, 11.0);
        assert_eq!(options.style, StyleMode::Dark);
        assert!(!options.interactive);
        assert_eq!(options.max_zoom, 22.0);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            MapOptions::from_json("{\"zoom\": 3}"),
            Err(MapError::InvalidOptions(_))
        ));
        assert!(matches!(
            MapOptions::from_json("not json"),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_control_position_names() {
        assert_eq!(ControlPosition::TopRight.to_string(), "top-right");
        let parsed: ControlPosition = serde_json::from_str("\"bottom-left\"").unwrap();
        assert_eq!(parsed, ControlPosition::BottomLeft);
    }
}
