//! In-memory map engine.
//!
//! Keeps everything the components add to a map in plain collections so it
//! can be inspected, and lets tests simulate the interactions a real engine
//! would report (marker clicks and drags, popup close buttons, layer
//! clicks). Nothing is rendered.

use crate::{
    core::{
        config::{ControlPosition, MapOptions},
        engine::{
            CloseListener, ControlSpec, ElementId, LayerClickListener, MapEngine, MapHandle,
            MarkerListeners, MarkerSpec, PopupSpec,
        },
        geo::LngLat,
    },
    input::events::LayerClick,
    prelude::HashMap,
    style::spec::{Source, SourceKind, StyleLayer, StyleSpecification},
    MapError, Result,
};
use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

struct MarkerEntry {
    spec: MarkerSpec,
    listeners: MarkerListeners,
}

struct PopupEntry {
    spec: PopupSpec,
    on_close: Option<CloseListener>,
}

struct Inner {
    id: u32,
    removed: bool,
    style: StyleSpecification,
    center: LngLat,
    zoom: f64,
    max_zoom: f64,
    next_element: u64,
    markers: BTreeMap<ElementId, MarkerEntry>,
    popups: BTreeMap<ElementId, PopupEntry>,
    controls: BTreeMap<ElementId, (ControlSpec, ControlPosition)>,
    sources: HashMap<String, Source>,
    /// Layers added at runtime, on top of the style's own
    layers: Vec<StyleLayer>,
    layer_listeners: BTreeMap<ElementId, (String, LayerClickListener)>,
}

impl Inner {
    fn next_element(&mut self) -> ElementId {
        self.next_element += 1;
        ElementId(self.next_element)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.removed {
            return Err(MapError::Engine(format!("map {} has been removed", self.id)));
        }
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.style.layer(id).is_some() || self.layers.iter().any(|layer| layer.id == id)
    }

    fn clear(&mut self) {
        self.markers.clear();
        self.popups.clear();
        self.controls.clear();
        self.sources.clear();
        self.layers.clear();
        self.layer_listeners.clear();
    }
}

/// Handle to a map created by [`HeadlessEngine`]
#[derive(Clone)]
pub struct HeadlessMap {
    inner: Rc<RefCell<Inner>>,
}

impl PartialEq for HeadlessMap {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HeadlessMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("HeadlessMap")
            .field("id", &inner.id)
            .field("removed", &inner.removed)
            .field("markers", &inner.markers.len())
            .field("popups", &inner.popups.len())
            .field("controls", &inner.controls.len())
            .finish()
    }
}

impl HeadlessMap {
    fn new(id: u32, options: &MapOptions, style: &StyleSpecification) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                id,
                removed: false,
                style: style.clone(),
                center: options.center,
                zoom: options.zoom,
                max_zoom: options.max_zoom,
                next_element: 0,
                markers: BTreeMap::new(),
                popups: BTreeMap::new(),
                controls: BTreeMap::new(),
                sources: HashMap::default(),
                layers: Vec::new(),
                layer_listeners: BTreeMap::new(),
            })),
        }
    }

    /// Sequence number of the map within its engine, starting at 1
    pub fn id(&self) -> u32 {
        self.inner.borrow().id
    }

    pub fn is_removed(&self) -> bool {
        self.inner.borrow().removed
    }

    pub fn style(&self) -> StyleSpecification {
        self.inner.borrow().style.clone()
    }

    pub fn style_name(&self) -> Option<String> {
        self.inner.borrow().style.name.clone()
    }

    /// Current center and zoom
    pub fn camera(&self) -> (LngLat, f64) {
        let inner = self.inner.borrow();
        (inner.center, inner.zoom)
    }

    pub fn marker_count(&self) -> usize {
        self.inner.borrow().markers.len()
    }

    pub fn marker(&self, id: ElementId) -> Option<MarkerSpec> {
        self.inner.borrow().markers.get(&id).map(|entry| entry.spec.clone())
    }

    /// Markers in insertion order
    pub fn markers(&self) -> Vec<MarkerSpec> {
        let inner = self.inner.borrow();
        inner.markers.values().map(|entry| entry.spec.clone()).collect()
    }

    pub fn popup_count(&self) -> usize {
        self.inner.borrow().popups.len()
    }

    pub fn popups(&self) -> Vec<PopupSpec> {
        let inner = self.inner.borrow();
        inner.popups.values().map(|entry| entry.spec.clone()).collect()
    }

    pub fn controls(&self) -> Vec<(ControlSpec, ControlPosition)> {
        self.inner.borrow().controls.values().cloned().collect()
    }

    pub fn source(&self, id: &str) -> Option<Source> {
        self.inner.borrow().sources.get(id).cloned()
    }

    /// Ids of layers added at runtime, in drawing order
    pub fn runtime_layer_ids(&self) -> Vec<String> {
        let inner = self.inner.borrow();
        inner.layers.iter().map(|layer| layer.id.clone()).collect()
    }

    pub fn layer_listener_count(&self) -> usize {
        self.inner.borrow().layer_listeners.len()
    }

    /// Simulate a click on a marker element. Returns false if there is no
    /// such marker.
    pub fn click_marker(&self, id: ElementId) -> bool {
        let listener = {
            let inner = self.inner.borrow();
            match inner.markers.get(&id) {
                Some(entry) => entry.listeners.on_click.clone(),
                None => return false,
            }
        };
        if let Some(listener) = listener {
            listener();
        }
        true
    }

    /// Simulate the end of a drag that left the marker at `lng_lat`
    pub fn drag_marker(&self, id: ElementId, lng_lat: LngLat) -> bool {
        let listener = {
            let mut inner = self.inner.borrow_mut();
            match inner.markers.get_mut(&id) {
                Some(entry) if entry.spec.draggable => {
                    entry.spec.lng_lat = lng_lat;
                    entry.listeners.on_drag_end.clone()
                }
                _ => return false,
            }
        };
        if let Some(listener) = listener {
            listener(lng_lat);
        }
        true
    }

    /// Simulate the popup's close button
    pub fn close_popup(&self, id: ElementId) -> bool {
        let entry = self.inner.borrow_mut().popups.remove(&id);
        match entry {
            Some(PopupEntry { on_close, .. }) => {
                if let Some(on_close) = on_close {
                    on_close();
                }
                true
            }
            None => false,
        }
    }

    /// Simulate a click on a rendered feature. Returns the number of
    /// listeners that were called.
    pub fn click_layer(&self, click: &LayerClick) -> usize {
        let listeners: Vec<LayerClickListener> = {
            let inner = self.inner.borrow();
            inner
                .layer_listeners
                .values()
                .filter(|(layer_id, _)| *layer_id == click.layer_id)
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        };
        for listener in &listeners {
            listener(click);
        }
        listeners.len()
    }

    fn remove(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.removed = true;
        inner.clear();
    }
}

impl MapHandle for HeadlessMap {
    fn add_marker(&self, marker: &MarkerSpec, listeners: MarkerListeners) -> Result<ElementId> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        if !marker.lng_lat.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "marker at {:?}",
                marker.lng_lat
            )));
        }
        let id = inner.next_element();
        inner.markers.insert(
            id,
            MarkerEntry {
                spec: marker.clone(),
                listeners,
            },
        );
        Ok(id)
    }

    fn set_marker_position(&self, id: ElementId, lng_lat: LngLat) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        match inner.markers.get_mut(&id) {
            Some(entry) => {
                entry.spec.lng_lat = lng_lat;
                Ok(())
            }
            None => Err(MapError::Engine(format!("no marker {}", id))),
        }
    }

    fn remove_marker(&self, id: ElementId) {
        self.inner.borrow_mut().markers.remove(&id);
    }

    fn add_popup(&self, popup: &PopupSpec, on_close: Option<CloseListener>) -> Result<ElementId> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        if !popup.lng_lat.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "popup at {:?}",
                popup.lng_lat
            )));
        }
        let id = inner.next_element();
        inner.popups.insert(
            id,
            PopupEntry {
                spec: popup.clone(),
                on_close,
            },
        );
        Ok(id)
    }

    fn remove_popup(&self, id: ElementId) {
        self.inner.borrow_mut().popups.remove(&id);
    }

    fn add_control(&self, control: &ControlSpec, position: ControlPosition) -> Result<ElementId> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        let id = inner.next_element();
        inner.controls.insert(id, (control.clone(), position));
        Ok(id)
    }

    fn remove_control(&self, id: ElementId) {
        self.inner.borrow_mut().controls.remove(&id);
    }

    fn add_source(&self, id: &str, source: &Source) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        if inner.sources.contains_key(id) || inner.style.sources.contains_key(id) {
            return Err(MapError::Engine(format!("source {} already exists", id)));
        }
        inner.sources.insert(id.to_string(), source.clone());
        Ok(())
    }

    fn set_source_data(&self, id: &str, data: &serde_json::Value) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        match inner.sources.get_mut(id) {
            Some(source) if source.kind == SourceKind::Geojson => {
                source.extra.insert("data".to_string(), data.clone());
                Ok(())
            }
            Some(_) => Err(MapError::Engine(format!("source {} is not GeoJSON", id))),
            None => Err(MapError::Engine(format!("no source {}", id))),
        }
    }

    fn remove_source(&self, id: &str) {
        self.inner.borrow_mut().sources.remove(id);
    }

    fn add_layer(&self, layer: &StyleLayer) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        if inner.has_layer(&layer.id) {
            return Err(MapError::Engine(format!("layer {} already exists", layer.id)));
        }
        if let Some(source) = &layer.source {
            if !inner.sources.contains_key(source) && !inner.style.sources.contains_key(source) {
                return Err(MapError::Engine(format!(
                    "layer {} uses unknown source {}",
                    layer.id, source
                )));
            }
        }
        inner.layers.push(layer.clone());
        Ok(())
    }

    fn remove_layer(&self, id: &str) {
        self.inner.borrow_mut().layers.retain(|layer| layer.id != id);
    }

    fn on_layer_click(&self, layer_id: &str, listener: LayerClickListener) -> Result<ElementId> {
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        if !inner.has_layer(layer_id) {
            return Err(MapError::Engine(format!("no layer {}", layer_id)));
        }
        let id = inner.next_element();
        inner
            .layer_listeners
            .insert(id, (layer_id.to_string(), listener));
        Ok(id)
    }

    fn off_layer_click(&self, id: ElementId) {
        self.inner.borrow_mut().layer_listeners.remove(&id);
    }

    /// One level past the current zoom, capped at the map's max zoom. The
    /// real answer depends on the engine's cluster index.
    fn cluster_expansion_zoom(&self, source_id: &str, _cluster_id: u64) -> Result<f64> {
        let inner = self.inner.borrow();
        inner.ensure_live()?;
        let clustered = inner
            .sources
            .get(source_id)
            .and_then(|source| source.extra.get("cluster"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !clustered {
            return Err(MapError::Engine(format!(
                "source {} is not a clustered GeoJSON source",
                source_id
            )));
        }
        Ok((inner.zoom + 1.0).min(inner.max_zoom))
    }

    fn ease_to(&self, center: LngLat, zoom: f64) {
        let mut inner = self.inner.borrow_mut();
        if inner.removed {
            return;
        }
        inner.center = center;
        inner.zoom = zoom.min(inner.max_zoom);
    }

    fn set_style(&self, style: &StyleSpecification) -> Result<()> {
        style.validate()?;
        let mut inner = self.inner.borrow_mut();
        inner.ensure_live()?;
        inner.style = style.clone();
        Ok(())
    }
}

/// Engine that creates [`HeadlessMap`]s
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    created: Vec<HeadlessMap>,
    destroyed: usize,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of maps created so far
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    /// Most recently created map
    pub fn last_map(&self) -> Option<HeadlessMap> {
        self.created.last().cloned()
    }
}

impl MapEngine for HeadlessEngine {
    type Handle = HeadlessMap;

    fn create(&mut self, options: &MapOptions, style: &StyleSpecification) -> Result<HeadlessMap> {
        style.validate()?;
        let id = self.created.len() as u32 + 1;
        let map = HeadlessMap::new(id, options, style);
        log::debug!("headless map {} created with style {:?}", id, style.name);
        self.created.push(map.clone());
        Ok(map)
    }

    fn destroy(&mut self, handle: &HeadlessMap) {
        if handle.is_removed() {
            return;
        }
        handle.remove();
        self.destroyed += 1;
        log::debug!("headless map {} destroyed", handle.id());
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::{context::registry::SharedRegistry, style::basemap::create_light_style};

    /// A registry holding a loaded headless map
    pub fn live_registry() -> (SharedRegistry<HeadlessMap>, HeadlessMap) {
        let mut engine = HeadlessEngine::new();
        let handle = engine
            .create(
                &MapOptions::new("test.pmtiles"),
                &create_light_style("test.pmtiles"),
            )
            .unwrap();
        let registry = Rc::new(crate::MapRegistry::new());
        registry.publish(handle.clone());
        registry.mark_ready(true);
        (registry, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{style::basemap::create_dark_style, ui::style::MarkerStyle};
    use std::cell::Cell;

    fn map() -> (HeadlessEngine, HeadlessMap) {
        let mut engine = HeadlessEngine::new();
        let map = engine
            .create(&MapOptions::new("a.pmtiles"), &create_dark_style("a.pmtiles"))
            .unwrap();
        (engine, map)
    }

    fn marker_at(lng: f64, lat: f64) -> MarkerSpec {
        MarkerSpec {
            lng_lat: LngLat::new(lng, lat),
            draggable: false,
            style: MarkerStyle::default(),
        }
    }

    #[test]
    fn test_handles_compare_by_identity() {
        let mut engine = HeadlessEngine::new();
        let options = MapOptions::new("a.pmtiles");
        let style = create_dark_style("a.pmtiles");
        let a = engine.create(&options, &style).unwrap();
        let b = engine.create(&options, &style).unwrap();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!((a.id(), b.id()), (1, 2));
        assert_eq!(engine.last_map(), Some(b));
    }

    #[test]
    fn test_removed_map_rejects_changes() {
        let (mut engine, map) = map();
        engine.destroy(&map);
        engine.destroy(&map);

        assert!(map.is_removed());
        assert_eq!(engine.destroyed_count(), 1);
        assert!(matches!(
            map.add_marker(&marker_at(0.0, 0.0), MarkerListeners::default()),
            Err(MapError::Engine(_))
        ));
    }

    #[test]
    fn test_invalid_marker_position() {
        let (_engine, map) = map();
        assert!(matches!(
            map.add_marker(&marker_at(0.0, 95.0), MarkerListeners::default()),
            Err(MapError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_click_marker_calls_listener() {
        let (_engine, map) = map();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let listeners = MarkerListeners {
            on_click: Some(Rc::new(move || counter.set(counter.get() + 1))),
            on_drag_end: None,
        };
        let id = map.add_marker(&marker_at(1.0, 1.0), listeners).unwrap();

        assert!(map.click_marker(id));
        assert!(!map.click_marker(ElementId(999)));
        // Not draggable
        assert!(!map.drag_marker(id, LngLat::new(2.0, 2.0)));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_layers_need_known_sources() {
        let (_engine, map) = map();
        let layer = StyleLayer::new("dots", crate::style::spec::LayerKind::Circle).source("dots");
        assert!(map.add_layer(&layer).is_err());

        map.add_source("dots", &Source::geojson(serde_json::json!({})))
            .unwrap();
        map.add_layer(&layer).unwrap();
        assert!(map.add_layer(&layer).is_err());
        assert_eq!(map.runtime_layer_ids(), vec!["dots"]);
    }

    #[test]
    fn test_expansion_zoom_needs_clustered_source() {
        let (_engine, map) = map();
        map.add_source("plain", &Source::geojson(serde_json::json!({})))
            .unwrap();
        assert!(map.cluster_expansion_zoom("plain", 1).is_err());

        let clustered =
            Source::geojson(serde_json::json!({})).with_option("cluster", serde_json::json!(true));
        map.add_source("clustered", &clustered).unwrap();
        assert_eq!(map.cluster_expansion_zoom("clustered", 1).unwrap(), 2.0);
    }
}
