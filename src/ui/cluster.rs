//! Clustered point layer backed by a GeoJSON source.
//!
//! Clustering itself is done by the engine; this component feeds it the
//! points, adds three layers (cluster bubbles, their counts and the
//! unclustered points) and turns layer clicks into callbacks.

use crate::{
    core::{
        constants,
        engine::{ElementId, LayerClickListener, MapHandle},
        geo::LngLat,
    },
    input::events::LayerClick,
    style::{
        colors::COLORS,
        spec::{LayerKind, Source, StyleLayer},
    },
    ui::traits::{MapComponent, Mountable, Mounted},
    Result,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::{
    cell::RefCell,
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_CLUSTER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a clustered point, as given by the application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Number(n) => write!(f, "{}", n),
            PointId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for PointId {
    fn from(n: i32) -> Self {
        PointId::Number(n.into())
    }
}

impl From<i64> for PointId {
    fn from(n: i64) -> Self {
        PointId::Number(n)
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        PointId::Text(s.to_string())
    }
}

impl From<String> for PointId {
    fn from(s: String) -> Self {
        PointId::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPoint {
    pub id: PointId,
    pub lng_lat: LngLat,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl ClusterPoint {
    pub fn new(id: impl Into<PointId>, lng_lat: impl Into<LngLat>) -> Self {
        Self {
            id: id.into(),
            lng_lat: lng_lat.into(),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    fn to_feature(&self) -> Value {
        let mut properties = self.properties.clone();
        properties.insert("id".to_string(), json!(self.id));

        let mut feature = json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": self.lng_lat.to_array(),
            },
            "properties": properties,
        });
        // Engines only accept numeric feature ids
        if let PointId::Number(n) = self.id {
            feature["id"] = json!(n);
        }
        feature
    }
}

/// GeoJSON feature collection for `points`
pub fn feature_collection(points: &[ClusterPoint]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": points.iter().map(ClusterPoint::to_feature).collect::<Vec<_>>(),
    })
}

type PointClickListener = Rc<dyn Fn(&ClusterPoint)>;
type ClusterClickListener = Rc<dyn Fn(u64, f64)>;

pub struct ClusterLayer {
    id: String,
    /// Shared with the point click listener, which looks clicked points up
    points: Rc<RefCell<Vec<ClusterPoint>>>,
    cluster_radius: u32,
    cluster_max_zoom: u32,
    on_click: Option<PointClickListener>,
    on_cluster_click: Option<ClusterClickListener>,
    /// What is on the map right now, so a partial attach can be undone
    source_added: bool,
    layers_added: Vec<String>,
    listeners: Vec<ElementId>,
}

impl ClusterLayer {
    pub fn new(points: Vec<ClusterPoint>) -> Self {
        let n = NEXT_CLUSTER_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("shadmap-cluster-{}", n),
            points: Rc::new(RefCell::new(points)),
            cluster_radius: constants::DEFAULT_CLUSTER_RADIUS,
            cluster_max_zoom: constants::DEFAULT_CLUSTER_MAX_ZOOM,
            on_click: None,
            on_cluster_click: None,
            source_added: false,
            layers_added: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Use `id` for the source and as prefix of the layer ids
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Cluster radius in pixels
    pub fn cluster_radius(mut self, radius: u32) -> Self {
        self.cluster_radius = radius;
        self
    }

    pub fn cluster_max_zoom(mut self, zoom: u32) -> Self {
        self.cluster_max_zoom = zoom;
        self
    }

    /// Called when an unclustered point is clicked
    pub fn on_click(mut self, callback: impl Fn(&ClusterPoint) + 'static) -> Self {
        self.on_click = Some(Rc::new(callback));
        self
    }

    /// Called with the cluster id and its expansion zoom after the camera
    /// started easing into a clicked cluster
    pub fn on_cluster_click(mut self, callback: impl Fn(u64, f64) + 'static) -> Self {
        self.on_cluster_click = Some(Rc::new(callback));
        self
    }

    pub fn source_id(&self) -> &str {
        &self.id
    }

    pub fn clusters_layer_id(&self) -> String {
        format!("{}-clusters", self.id)
    }

    pub fn count_layer_id(&self) -> String {
        format!("{}-cluster-count", self.id)
    }

    pub fn unclustered_layer_id(&self) -> String {
        format!("{}-unclustered", self.id)
    }

    pub fn points(&self) -> Vec<ClusterPoint> {
        self.points.borrow().clone()
    }

    fn source(&self) -> Source {
        Source::geojson(feature_collection(&self.points.borrow()))
            .with_option("cluster", json!(true))
            .with_option("clusterRadius", json!(self.cluster_radius))
            .with_option("clusterMaxZoom", json!(self.cluster_max_zoom))
    }

    /// Layers in drawing order
    pub fn layers(&self) -> Vec<StyleLayer> {
        let marker = COLORS.marker;
        vec![
            StyleLayer::new(self.clusters_layer_id(), LayerKind::Circle)
                .source(self.id.as_str())
                .filter(json!(["has", "point_count"]))
                .paint(
                    "circle-color",
                    json!([
                        "step", ["get", "point_count"],
                        marker.primary.bg, 10,
                        marker.warning.bg, 50,
                        marker.destructive.bg
                    ]),
                )
                .paint(
                    "circle-radius",
                    json!(["step", ["get", "point_count"], 18, 10, 24, 50, 32]),
                )
                .paint("circle-stroke-width", 2)
                .paint("circle-stroke-color", marker.primary.border),
            StyleLayer::new(self.count_layer_id(), LayerKind::Symbol)
                .source(self.id.as_str())
                .filter(json!(["has", "point_count"]))
                .layout("text-field", "{point_count_abbreviated}")
                .layout("text-font", json!([constants::LABEL_FONT]))
                .layout("text-size", 12)
                .paint("text-color", marker.primary.text),
            StyleLayer::new(self.unclustered_layer_id(), LayerKind::Circle)
                .source(self.id.as_str())
                .filter(json!(["!", ["has", "point_count"]]))
                .paint("circle-color", marker.primary.bg)
                .paint("circle-radius", 6)
                .paint("circle-stroke-width", 2)
                .paint("circle-stroke-color", marker.primary.text),
        ]
    }

    fn cluster_listener<H: MapHandle>(&self, map: &H) -> LayerClickListener {
        let map = map.clone();
        let source_id = self.id.clone();
        let callback = self.on_cluster_click.clone();
        Rc::new(move |click: &LayerClick| {
            let Some(cluster_id) = click.property("cluster_id").and_then(Value::as_u64) else {
                log::warn!("cluster click on {} without a cluster_id", click.layer_id);
                return;
            };
            match map.cluster_expansion_zoom(&source_id, cluster_id) {
                Ok(zoom) => {
                    map.ease_to(click.lng_lat, zoom);
                    if let Some(callback) = &callback {
                        callback(cluster_id, zoom);
                    }
                }
                Err(err) => log::warn!("no expansion zoom for cluster {}: {}", cluster_id, err),
            }
        })
    }

    fn point_listener(&self) -> Option<LayerClickListener> {
        let callback = self.on_click.clone()?;
        let points = Rc::clone(&self.points);
        Some(Rc::new(move |click: &LayerClick| {
            let id = click
                .property("id")
                .and_then(|id| serde_json::from_value::<PointId>(id.clone()).ok());
            let known = id.as_ref().and_then(|id| {
                points.borrow().iter().find(|point| &point.id == id).cloned()
            });
            let point = match (known, id) {
                (Some(point), _) => point,
                (None, Some(id)) => {
                    let mut properties = click.properties.clone();
                    properties.remove("id");
                    ClusterPoint {
                        id,
                        lng_lat: click.lng_lat,
                        properties,
                    }
                }
                (None, None) => {
                    log::warn!("point click on {} without an id", click.layer_id);
                    return;
                }
            };
            callback(&point);
        }))
    }

    fn add_to<H: MapHandle>(&mut self, map: &H) -> Result<()> {
        map.add_source(&self.id, &self.source())?;
        self.source_added = true;
        for layer in self.layers() {
            map.add_layer(&layer)?;
            self.layers_added.push(layer.id);
        }

        let id = map.on_layer_click(&self.clusters_layer_id(), self.cluster_listener(map))?;
        self.listeners.push(id);
        if let Some(listener) = self.point_listener() {
            let id = map.on_layer_click(&self.unclustered_layer_id(), listener)?;
            self.listeners.push(id);
        }
        Ok(())
    }

    /// Remove listeners, then layers in reverse order, then the source
    fn remove_from<H: MapHandle>(&mut self, map: &H) {
        for id in self.listeners.drain(..) {
            map.off_layer_click(id);
        }
        while let Some(layer_id) = self.layers_added.pop() {
            map.remove_layer(&layer_id);
        }
        if std::mem::take(&mut self.source_added) {
            map.remove_source(&self.id);
        }
    }
}

impl<H: MapHandle> MapComponent<H> for ClusterLayer {
    const NAME: &'static str = "ClusterLayer";

    fn attach(&mut self, map: &H) -> Result<()> {
        let result = self.add_to(map);
        if let Err(err) = &result {
            log::debug!("undoing partial attach of cluster layer {}: {}", self.id, err);
            self.remove_from(map);
        }
        result
    }

    fn detach(&mut self, map: &H) {
        self.remove_from(map);
    }

    fn forget(&mut self) {
        self.listeners.clear();
        self.layers_added.clear();
        self.source_added = false;
    }
}

impl Mountable for ClusterLayer {}

impl<H: MapHandle> Mounted<H, ClusterLayer> {
    /// Replace the points, refreshing the live source
    pub fn set_points(&self, points: Vec<ClusterPoint>) -> Result<()> {
        self.update(|layer, map| {
            *layer.points.borrow_mut() = points;
            match map {
                Some(map) if layer.source_added => {
                    map.set_source_data(&layer.id, &feature_collection(&layer.points.borrow()))
                }
                _ => Ok(()),
            }
        })
    }
}

impl fmt::Debug for ClusterLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterLayer")
            .field("id", &self.id)
            .field("points", &self.points.borrow().len())
            .field("cluster_radius", &self.cluster_radius)
            .field("cluster_max_zoom", &self.cluster_max_zoom)
            .field("on_map", &self.source_added)
            .finish()
    }
}
