use crate::{
    core::{
        engine::{ClickListener, DragEndListener, ElementId, MapHandle, MarkerListeners, MarkerSpec},
        geo::LngLat,
    },
    ui::{
        style::{MarkerSize, MarkerStyle, MarkerVariant},
        traits::{MapComponent, Mountable, Mounted},
    },
    Result,
};
use std::{cell::Cell, fmt, rc::Rc};

/// A dot marker pinned to a coordinate
pub struct Marker {
    /// Shared with the drag listener so a drag end is reflected here
    lng_lat: Rc<Cell<LngLat>>,
    variant: MarkerVariant,
    size: MarkerSize,
    pulse: bool,
    label: Option<String>,
    draggable: bool,
    class: Option<String>,
    on_click: Option<ClickListener>,
    on_drag_end: Option<DragEndListener>,
    element: Option<ElementId>,
}

impl Marker {
    pub fn new(lng_lat: impl Into<LngLat>) -> Self {
        Self {
            lng_lat: Rc::new(Cell::new(lng_lat.into())),
            variant: MarkerVariant::default(),
            size: MarkerSize::default(),
            pulse: false,
            label: None,
            draggable: false,
            class: None,
            on_click: None,
            on_drag_end: None,
            element: None,
        }
    }

    pub fn variant(mut self, variant: MarkerVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: MarkerSize) -> Self {
        self.size = size;
        self
    }

    pub fn pulse(mut self, pulse: bool) -> Self {
        self.pulse = pulse;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn on_click(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(callback));
        self
    }

    /// Called with the new position when the user finishes dragging
    pub fn on_drag_end(mut self, callback: impl Fn(LngLat) + 'static) -> Self {
        self.on_drag_end = Some(Rc::new(callback));
        self
    }

    pub fn lng_lat(&self) -> LngLat {
        self.lng_lat.get()
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Engine element while attached
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn style(&self) -> MarkerStyle {
        MarkerStyle::resolve(
            self.variant,
            self.size,
            self.pulse,
            self.label.as_deref(),
            self.class.as_deref(),
        )
    }

    fn spec(&self) -> MarkerSpec {
        MarkerSpec {
            lng_lat: self.lng_lat.get(),
            draggable: self.draggable,
            style: self.style(),
        }
    }

    fn listeners(&self) -> MarkerListeners {
        let on_drag_end: Option<DragEndListener> = if self.draggable {
            let position = Rc::clone(&self.lng_lat);
            let callback = self.on_drag_end.clone();
            Some(Rc::new(move |lng_lat: LngLat| {
                position.set(lng_lat);
                if let Some(callback) = &callback {
                    callback(lng_lat);
                }
            }))
        } else {
            None
        };

        MarkerListeners {
            on_click: self.on_click.clone(),
            on_drag_end,
        }
    }
}

impl<H: MapHandle> MapComponent<H> for Marker {
    const NAME: &'static str = "Marker";

    fn attach(&mut self, map: &H) -> Result<()> {
        let id = map.add_marker(&self.spec(), self.listeners())?;
        self.element = Some(id);
        Ok(())
    }

    fn detach(&mut self, map: &H) {
        if let Some(id) = self.element.take() {
            map.remove_marker(id);
        }
    }

    fn forget(&mut self) {
        self.element = None;
    }
}

impl Mountable for Marker {}

impl<H: MapHandle> Mounted<H, Marker> {
    /// Move the marker, updating the live element if there is one
    pub fn set_lng_lat(&self, lng_lat: impl Into<LngLat>) -> Result<()> {
        let lng_lat = lng_lat.into();
        self.update(|marker, map| {
            marker.lng_lat.set(lng_lat);
            match (map, marker.element) {
                (Some(map), Some(id)) => map.set_marker_position(id, lng_lat),
                _ => Ok(()),
            }
        })
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("lng_lat", &self.lng_lat.get())
            .field("variant", &self.variant)
            .field("size", &self.size)
            .field("draggable", &self.draggable)
            .field("element", &self.element)
            .finish()
    }
}
