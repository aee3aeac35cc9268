//! Boundary to the mapping engine that does the actual rendering.
//!
//! The container only needs [`MapEngine`] to create and destroy maps. The
//! components need [`MapHandle`] to put themselves on a live map. Both are
//! implemented by an adapter for the concrete engine; see
//! [`headless`](crate::headless) for an in-memory one.

use crate::{
    core::{
        config::{ControlPosition, MapOptions},
        geo::LngLat,
    },
    input::events::LayerClick,
    style::spec::{Source, StyleLayer, StyleSpecification},
    ui::style::MarkerStyle,
    Result,
};
use serde::Serialize;
use serde_json::Value;
use std::{fmt, rc::Rc};

/// Identifier the engine assigns to an element added to a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type ClickListener = Rc<dyn Fn()>;
pub type DragEndListener = Rc<dyn Fn(LngLat)>;
pub type CloseListener = Rc<dyn Fn()>;
pub type LayerClickListener = Rc<dyn Fn(&LayerClick)>;

/// A marker as the engine should draw it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub lng_lat: LngLat,
    pub draggable: bool,
    pub style: MarkerStyle,
}

/// Listeners the engine calls for interactions on a marker element
#[derive(Clone, Default)]
pub struct MarkerListeners {
    pub on_click: Option<ClickListener>,
    pub on_drag_end: Option<DragEndListener>,
}

impl fmt::Debug for MarkerListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerListeners")
            .field("on_click", &self.on_click.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupSpec {
    pub lng_lat: LngLat,
    pub content: String,
    /// Pixel offset from the anchor
    pub offset: [f64; 2],
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ControlSpec {
    Navigation {
        show_compass: bool,
        show_zoom: bool,
    },
    Scale {
        unit: &'static str,
        max_width: u32,
    },
}

/// Creates and destroys engine maps for a container
pub trait MapEngine {
    type Handle: MapHandle;

    /// Start creating a map. The returned handle is not usable until the
    /// engine reports [`EngineEvent::Load`](crate::input::events::EngineEvent::Load).
    fn create(&mut self, options: &MapOptions, style: &StyleSpecification) -> Result<Self::Handle>;

    /// Tear down a map created by this engine
    fn destroy(&mut self, handle: &Self::Handle);
}

/// Reference to a live engine map.
///
/// Handles are cheap to clone and compare equal when they refer to the same
/// engine map.
pub trait MapHandle: Clone + PartialEq + 'static {
    fn add_marker(&self, marker: &MarkerSpec, listeners: MarkerListeners) -> Result<ElementId>;
    fn set_marker_position(&self, id: ElementId, lng_lat: LngLat) -> Result<()>;
    fn remove_marker(&self, id: ElementId);

    fn add_popup(&self, popup: &PopupSpec, on_close: Option<CloseListener>) -> Result<ElementId>;
    fn remove_popup(&self, id: ElementId);

    fn add_control(&self, control: &ControlSpec, position: ControlPosition) -> Result<ElementId>;
    fn remove_control(&self, id: ElementId);

    fn add_source(&self, id: &str, source: &Source) -> Result<()>;
    /// Replace the data of a GeoJSON source
    fn set_source_data(&self, id: &str, data: &Value) -> Result<()>;
    fn remove_source(&self, id: &str);

    fn add_layer(&self, layer: &StyleLayer) -> Result<()>;
    fn remove_layer(&self, id: &str);

    /// Listen for clicks on features of a layer
    fn on_layer_click(&self, layer_id: &str, listener: LayerClickListener) -> Result<ElementId>;
    fn off_layer_click(&self, id: ElementId);

    /// Zoom at which a cluster of a clustered GeoJSON source breaks apart
    fn cluster_expansion_zoom(&self, source_id: &str, cluster_id: u64) -> Result<f64>;

    fn ease_to(&self, center: LngLat, zoom: f64);

    /// Swap the whole style document
    fn set_style(&self, style: &StyleSpecification) -> Result<()>;
}
