//! Prelude module for common shadmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use shadmap::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{ControlPosition, MapOptions},
    engine::{ElementId, MapEngine, MapHandle},
    geo::{LngLat, Point},
    map::{MapCallbacks, MapContainer},
};

pub use crate::context::{
    accessor::MapContext,
    observable::{Observable, Subscription},
    registry::{MapRegistry, MapState},
};

pub use crate::input::events::{ClickEvent, EngineEvent, LayerClick, MoveEvent};

pub use crate::style::{
    basemap::{create_dark_style, create_light_style},
    spec::{LayerKind, Source, StyleLayer, StyleSpecification},
    ColorScheme, StyleMode,
};

pub use crate::ui::{
    cluster::{ClusterLayer, ClusterPoint, PointId},
    controls::{NavigationControl, ScaleControl, ScaleUnit},
    marker::Marker,
    popup::{Popup, PopupOffset},
    style::{MarkerSize, MarkerVariant},
    traits::{MapComponent, Mountable, Mounted},
};

pub use crate::headless::{HeadlessEngine, HeadlessMap};

pub use crate::{MapError, Result};

pub use std::rc::Rc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
