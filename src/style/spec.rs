//! Typed view of the engine's style document format.
//!
//! Only the parts this crate generates are typed; everything else is kept as
//! raw JSON so custom documents survive a round trip through the container.

use crate::{core::constants, prelude::HashSet, MapError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSpecification {
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub sources: BTreeMap<String, Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphs: Option<String>,
    #[serde(default)]
    pub layers: Vec<StyleLayer>,
    /// Top-level keys this crate does not interpret (sprite, light, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StyleSpecification {
    /// Parse and validate a style document
    pub fn from_json(json: &str) -> Result<Self> {
        let style: StyleSpecification = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != constants::STYLE_VERSION {
            return Err(MapError::InvalidStyle(format!(
                "unsupported style version {} (expected {})",
                self.version,
                constants::STYLE_VERSION
            )));
        }

        let mut seen = HashSet::default();
        for layer in &self.layers {
            if !seen.insert(layer.id.as_str()) {
                return Err(MapError::InvalidStyle(format!(
                    "duplicate layer id `{}`",
                    layer.id
                )));
            }
            if let Some(source) = &layer.source {
                if !self.sources.contains_key(source) {
                    return Err(MapError::InvalidStyle(format!(
                        "layer `{}` references unknown source `{}`",
                        layer.id, source
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn layer(&self, id: &str) -> Option<&StyleLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.id.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Source {
    pub fn vector(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Vector,
            url: Some(url.into()),
            attribution: None,
            extra: Map::new(),
        }
    }

    /// Inline GeoJSON source; `data` is a feature collection
    pub fn geojson(data: Value) -> Self {
        let mut extra = Map::new();
        extra.insert("data".to_string(), data);
        Self {
            kind: SourceKind::Geojson,
            url: None,
            attribution: None,
            extra,
        }
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }

    pub fn with_option(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn data(&self) -> Option<&Value> {
        self.extra.get("data")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Vector,
    Raster,
    RasterDem,
    Geojson,
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Background,
    Fill,
    Line,
    Symbol,
    Circle,
    Heatmap,
    FillExtrusion,
    Raster,
    Hillshade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        rename = "source-layer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub layout: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub paint: Map<String, Value>,
}

impl StyleLayer {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            source: None,
            source_layer: None,
            minzoom: None,
            maxzoom: None,
            filter: None,
            layout: Map::new(),
            paint: Map::new(),
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source_layer(mut self, source_layer: impl Into<String>) -> Self {
        self.source_layer = Some(source_layer.into());
        self
    }

    pub fn minzoom(mut self, zoom: f64) -> Self {
        self.minzoom = Some(zoom);
        self
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn layout(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.layout.insert(property.to_string(), value.into());
        self
    }

    pub fn paint(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.paint.insert(property.to_string(), value.into());
        self
    }
}
