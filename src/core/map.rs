use crate::{
    context::{
        accessor::MapContext,
        registry::{MapRegistry, MapState, SharedRegistry},
    },
    core::{
        config::MapOptions,
        engine::{MapEngine, MapHandle},
    },
    input::events::{ClickEvent, EngineEvent, MoveEvent},
    style::{spec::StyleSpecification, ColorScheme, StyleMode},
    Result,
};
use std::{fmt, rc::Rc};

/// Application callbacks of a map container
pub struct MapCallbacks<H> {
    pub on_load: Option<Box<dyn Fn(&H)>>,
    pub on_click: Option<Box<dyn Fn(&ClickEvent)>>,
    pub on_move: Option<Box<dyn Fn(&MoveEvent)>>,
    pub on_zoom: Option<Box<dyn Fn(f64)>>,
}

impl<H> Default for MapCallbacks<H> {
    fn default() -> Self {
        Self {
            on_load: None,
            on_click: None,
            on_move: None,
            on_zoom: None,
        }
    }
}

impl<H> fmt::Debug for MapCallbacks<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCallbacks")
            .field("on_load", &self.on_load.is_some())
            .field("on_click", &self.on_click.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("on_zoom", &self.on_zoom.is_some())
            .finish()
    }
}

/// State of one mount cycle
struct Mount<H> {
    registry: SharedRegistry<H>,
    /// Created by the engine, published on load
    handle: H,
}

/// The map container component.
///
/// It is the sole writer of its registry: a fresh registry is created on
/// every [`mount`](Self::mount), the engine handle is published and marked
/// ready inside the same `Load` event, and everything is reset before the
/// registry is dropped on [`unmount`](Self::unmount).
pub struct MapContainer<E: MapEngine> {
    engine: E,
    options: MapOptions,
    callbacks: MapCallbacks<E::Handle>,
    color_scheme: ColorScheme,
    mount: Option<Mount<E::Handle>>,
    cycle: u64,
}

impl<E: MapEngine> MapContainer<E> {
    pub fn new(engine: E, options: MapOptions) -> Result<Self> {
        Self::with_callbacks(engine, options, MapCallbacks::default())
    }

    pub fn with_callbacks(
        engine: E,
        options: MapOptions,
        callbacks: MapCallbacks<E::Handle>,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            engine,
            options,
            callbacks,
            color_scheme: ColorScheme::default(),
            mount: None,
            cycle: 0,
        })
    }

    /// Start a mount cycle and return the context for descendants.
    ///
    /// Mounting an already mounted container returns the current context.
    pub fn mount(&mut self) -> Result<MapContext<E::Handle>> {
        if let Some(mount) = &self.mount {
            log::warn!("map container already mounted (cycle {})", self.cycle);
            return Ok(MapContext::new(&mount.registry));
        }

        let style = self.resolve_style();
        let handle = self.engine.create(&self.options, &style)?;
        let registry: SharedRegistry<E::Handle> = Rc::new(MapRegistry::new());
        let context = MapContext::new(&registry);

        self.cycle += 1;
        log::debug!(
            "map container mounted (cycle {}, style {})",
            self.cycle,
            self.options.style
        );
        self.mount = Some(Mount { registry, handle });

        Ok(context)
    }

    /// Tear down the current mount cycle. Components that were mounted in it
    /// see the registry reset before it goes away.
    pub fn unmount(&mut self) {
        let Some(mount) = self.mount.take() else {
            return;
        };

        mount.registry.reset();
        drop(mount.registry);
        self.engine.destroy(&mount.handle);
        log::debug!("map container unmounted (cycle {})", self.cycle);
    }

    /// Feed an engine event to the container
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Load => self.on_engine_load(),
            EngineEvent::Destroy => {
                if let Some(mount) = &self.mount {
                    log::debug!("engine destroyed map (cycle {})", self.cycle);
                    mount.registry.reset();
                }
            }
            EngineEvent::Click { lng_lat, point } => {
                if let Some(on_click) = &self.callbacks.on_click {
                    on_click(&ClickEvent { lng_lat, point });
                }
            }
            EngineEvent::Move { center, zoom } => {
                if let Some(on_move) = &self.callbacks.on_move {
                    on_move(&MoveEvent { center, zoom });
                }
            }
            EngineEvent::Zoom { zoom } => {
                if let Some(on_zoom) = &self.callbacks.on_zoom {
                    on_zoom(zoom);
                }
            }
        }
    }

    fn on_engine_load(&mut self) {
        let Some(mount) = &self.mount else {
            log::warn!("engine load event ignored: map container is not mounted");
            return;
        };

        let handle = mount.handle.clone();
        // Publish and mark ready in the same call so no reader can observe
        // ready without a handle.
        mount.registry.publish(handle.clone());
        mount.registry.mark_ready(true);
        log::debug!("map loaded (cycle {})", self.cycle);

        if let Some(on_load) = &self.callbacks.on_load {
            on_load(&handle);
        }
    }

    /// Context for descendants. Detached while the container is unmounted.
    pub fn context(&self) -> MapContext<E::Handle> {
        match &self.mount {
            Some(mount) => MapContext::new(&mount.registry),
            None => MapContext::detached(),
        }
    }

    /// Current `(handle, ready)` pair; empty while unmounted
    pub fn state(&self) -> MapState<E::Handle> {
        match &self.mount {
            Some(mount) => mount.registry.read(),
            None => MapState::empty(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.mount
            .as_ref()
            .is_some_and(|mount| mount.registry.is_ready())
    }

    /// Number of mount cycles started so far
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    /// Document the current mode resolves to
    pub fn resolve_style(&self) -> StyleSpecification {
        self.options
            .style
            .resolve(&self.options.tiles, self.color_scheme)
    }

    /// Switch the style mode, restyling the live map if it is ready
    pub fn set_style_mode(&mut self, mode: StyleMode) -> Result<()> {
        if let StyleMode::Custom(style) = &mode {
            style.validate()?;
        }
        if self.options.style == mode {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.options.style, mode);
        if let Err(err) = self.apply_style() {
            self.options.style = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Report a change of the light/dark preference. Only `auto` reacts.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) -> Result<()> {
        if self.color_scheme == scheme {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.color_scheme, scheme);
        if self.options.style.follows_scheme() {
            if let Err(err) = self.apply_style() {
                self.color_scheme = previous;
                return Err(err);
            }
        }
        Ok(())
    }

    fn apply_style(&self) -> Result<()> {
        let Some(mount) = &self.mount else {
            return Ok(());
        };
        if let Some(handle) = mount.registry.read().live() {
            let style = self.resolve_style();
            log::debug!("applying style {:?}", style.name);
            handle.set_style(&style)?;
        }
        Ok(())
    }
}

impl<E: MapEngine> Drop for MapContainer<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<E: MapEngine> fmt::Debug for MapContainer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapContainer")
            .field("options", &self.options)
            .field("color_scheme", &self.color_scheme)
            .field("mounted", &self.is_mounted())
            .field("ready", &self.is_ready())
            .field("cycle", &self.cycle)
            .finish()
    }
}
