//! Map builder for fluent container configuration
//!
//! This module provides a `MapBuilder` that collects map options and
//! application callbacks, then validates them and produces a
//! [`MapContainer`] for a given engine.

use crate::{
    core::{
        config::MapOptions,
        engine::MapEngine,
        geo::LngLat,
        map::{MapCallbacks, MapContainer},
    },
    input::events::{ClickEvent, MoveEvent},
    style::{ColorScheme, StyleMode},
    Result,
};

/// Builder for creating and configuring map containers
pub struct MapBuilder<H> {
    options: MapOptions,
    callbacks: MapCallbacks<H>,
    color_scheme: ColorScheme,
}

impl<H> MapBuilder<H> {
    /// Create a builder for a basemap backed by the PMTiles archive at `tiles`
    pub fn new(tiles: impl Into<String>) -> Self {
        Self::from_options(MapOptions::new(tiles))
    }

    /// Start from existing options, e.g. loaded from a config file
    pub fn from_options(options: MapOptions) -> Self {
        Self {
            options,
            callbacks: MapCallbacks::default(),
            color_scheme: ColorScheme::default(),
        }
    }

    /// Set the initial center
    pub fn center(mut self, center: impl Into<LngLat>) -> Self {
        self.options.center = center.into();
        self
    }

    /// Set the initial zoom level
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.options.zoom = zoom;
        self
    }

    /// Set zoom limits
    pub fn zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.options.min_zoom = min_zoom;
        self.options.max_zoom = max_zoom;
        self
    }

    pub fn pitch(mut self, pitch: f64) -> Self {
        self.options.pitch = pitch;
        self
    }

    pub fn bearing(mut self, bearing: f64) -> Self {
        self.options.bearing = bearing;
        self
    }

    /// Set the style mode (`auto`, `dark`, `light` or a custom document)
    pub fn style(mut self, style: impl Into<StyleMode>) -> Self {
        self.options.style = style.into();
        self
    }

    /// Enable or disable pan/zoom interactions
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.options.interactive = interactive;
        self
    }

    /// Extra CSS classes for the container element
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.options.class = Some(class.into());
        self
    }

    /// Initial light/dark preference, used by the `auto` style mode
    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    /// Called once per mount cycle when the map has loaded
    pub fn on_load(mut self, callback: impl Fn(&H) + 'static) -> Self {
        self.callbacks.on_load = Some(Box::new(callback));
        self
    }

    pub fn on_click(mut self, callback: impl Fn(&ClickEvent) + 'static) -> Self {
        self.callbacks.on_click = Some(Box::new(callback));
        self
    }

    pub fn on_move(mut self, callback: impl Fn(&MoveEvent) + 'static) -> Self {
        self.callbacks.on_move = Some(Box::new(callback));
        self
    }

    pub fn on_zoom(mut self, callback: impl Fn(f64) + 'static) -> Self {
        self.callbacks.on_zoom = Some(Box::new(callback));
        self
    }

    /// Options collected so far
    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Validate the options and build a container driving `engine`
    pub fn build<E>(self, engine: E) -> Result<MapContainer<E>>
    where
        E: MapEngine<Handle = H>,
    {
        let mut container = MapContainer::with_callbacks(engine, self.options, self.callbacks)?;
        container.set_color_scheme(self.color_scheme)?;
        Ok(container)
    }
}

impl<H> From<MapOptions> for MapBuilder<H> {
    fn from(options: MapOptions) -> Self {
        Self::from_options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        headless::{HeadlessEngine, HeadlessMap},
        input::events::EngineEvent,
        MapError,
    };
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn test_builder_sets_options() {
        let builder: MapBuilder<HeadlessMap> = MapBuilder::new("https://example.com/a.pmtiles")
            .center((-122.42, 37.77))
            .zoom(11.0)
            .zoom_range(2.0, 18.0)
            .pitch(30.0)
            .bearing(-15.0)
            .style(StyleMode::Dark)
            .interactive(false)
            .class("rounded-lg");

        let options = builder.options();
        assert_eq!(options.center, LngLat::new(-122.42, 37.77));
        assert_eq!(options.zoom, 11.0);
        assert_eq!(options.min_zoom, 2.0);
        assert_eq!(options.max_zoom, 18.0);
        assert_eq!(options.pitch, 30.0);
        assert_eq!(options.bearing, -15.0);
        assert_eq!(options.style, StyleMode::Dark);
        assert!(!options.interactive);
        assert_eq!(options.class.as_deref(), Some("rounded-lg"));
    }

    #[test]
    fn test_build_validates() {
        let result = MapBuilder::new("a.pmtiles")
            .zoom(30.0)
            .build(HeadlessEngine::new());
        assert!(matches!(result, Err(MapError::InvalidOptions(_))));
    }

    #[test]
    fn test_build_with_callbacks_and_scheme() {
        let loads = Rc::new(Cell::new(0));
        let counter = Rc::clone(&loads);

        let mut map = MapBuilder::new("a.pmtiles")
            .color_scheme(ColorScheme::Dark)
            .on_load(move |_: &HeadlessMap| counter.set(counter.get() + 1))
            .build(HeadlessEngine::new())
            .unwrap();

        assert_eq!(map.color_scheme(), ColorScheme::Dark);
        assert_eq!(map.resolve_style().name.as_deref(), Some("shadcn-dark"));

        let _ctx = map.mount().unwrap();
        map.handle_event(EngineEvent::Load);
        assert_eq!(loads.get(), 1);
    }
}
