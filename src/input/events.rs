use crate::core::geo::{LngLat, Point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle and interaction events reported by the mapping engine for the
/// map as a whole. The embedding application forwards them to
/// [`MapContainer::handle_event`](crate::core::map::MapContainer::handle_event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineEvent {
    /// Initial style and tiles are loaded; the map can be mutated
    Load,
    /// The engine map was torn down
    Destroy,
    /// Click/tap on the map
    Click { lng_lat: LngLat, point: Point },
    /// Camera moved
    Move { center: LngLat, zoom: f64 },
    /// Zoom level changed
    Zoom { zoom: f64 },
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::Load => "load",
            EngineEvent::Destroy => "destroy",
            EngineEvent::Click { .. } => "click",
            EngineEvent::Move { .. } => "move",
            EngineEvent::Zoom { .. } => "zoom",
        }
    }

    /// Whether this event changes the registry rather than only being
    /// forwarded to application callbacks
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, EngineEvent::Load | EngineEvent::Destroy)
    }
}

/// Payload of the map click callback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub lng_lat: LngLat,
    pub point: Point,
}

/// Payload of the camera move callback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub center: LngLat,
    pub zoom: f64,
}

/// A click on a rendered feature of a style layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerClick {
    pub layer_id: String,
    /// Position of the clicked feature (for point geometries) or of the
    /// pointer
    pub lng_lat: LngLat,
    pub properties: Map<String, Value>,
}

impl LayerClick {
    pub fn new(layer_id: impl Into<String>, lng_lat: LngLat) -> Self {
        Self {
            layer_id: layer_id.into(),
            lng_lat,
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
