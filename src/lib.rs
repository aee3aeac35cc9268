//! # shadmap
//!
//! Shadcn-styled map components on top of a pluggable vector map engine.
//!
//! A [`MapContainer`] owns one [`MapRegistry`] per mount cycle and hands a
//! [`MapContext`] to every descendant component (markers, popups, controls,
//! cluster layers). Components subscribe to the registry and attach
//! themselves to the live map once the engine reports that it has loaded,
//! regardless of whether they were mounted before or after that moment.
//!
//! Rendering, projection, tiling and clustering are delegated to the engine
//! behind the [`MapEngine`] / [`MapHandle`] traits. The [`headless`] module
//! ships an in-memory engine for tests and server-side use.

pub mod context;
pub mod core;
pub mod headless;
pub mod input;
pub mod prelude;
pub mod style;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapBuilder,
    config::{ControlPosition, MapOptions},
    engine::{ElementId, MapEngine, MapHandle},
    geo::{LngLat, Point},
    map::{MapCallbacks, MapContainer},
};

pub use context::{
    accessor::MapContext,
    observable::{Observable, Subscription},
    registry::{MapRegistry, MapState},
};

pub use input::events::{ClickEvent, EngineEvent, LayerClick, MoveEvent};

pub use style::{
    basemap::{create_dark_style, create_light_style},
    colors::COLORS,
    spec::StyleSpecification,
    ColorScheme, StyleMode,
};

pub use ui::{
    cluster::{ClusterLayer, ClusterPoint},
    controls::{NavigationControl, ScaleControl, ScaleUnit},
    marker::Marker,
    popup::{Popup, PopupOffset},
    style::{MarkerSize, MarkerVariant},
    traits::{MapComponent, Mountable, Mounted},
};

pub use headless::{HeadlessEngine, HeadlessMap};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A descendant component was used outside of a live map container.
    #[error("no enclosing map container: {component} must be used within a <Map> component. {hint}")]
    Configuration {
        component: &'static str,
        hint: String,
    },

    #[error("Invalid map options: {0}")]
    InvalidOptions(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid style document: {0}")]
    InvalidStyle(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    /// Returns true for the "used outside of a map" programming mistake.
    pub fn is_configuration(&self) -> bool {
        matches!(self, MapError::Configuration { .. })
    }
}

/// Error type alias for convenience
pub type Error = MapError;

/// Install `env_logger` as the `log` backend. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
