use crate::{
    core::{
        constants,
        engine::{CloseListener, ElementId, MapHandle, PopupSpec},
        geo::LngLat,
    },
    ui::traits::{MapComponent, Mountable, Mounted},
    Result,
};
use serde::{Deserialize, Serialize};
use std::{cell::Cell, fmt, rc::Rc};

/// Distance between the popup and its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PopupOffset {
    Uniform(f64),
    Xy([f64; 2]),
}

impl PopupOffset {
    /// Pixel offset as `[x, y]`. A uniform offset lifts the popup above
    /// the anchor.
    pub fn to_pixels(&self) -> [f64; 2] {
        match *self {
            PopupOffset::Uniform(distance) => [0.0, -distance],
            PopupOffset::Xy(xy) => xy,
        }
    }
}

impl Default for PopupOffset {
    fn default() -> Self {
        PopupOffset::Uniform(constants::DEFAULT_POPUP_OFFSET)
    }
}

impl From<f64> for PopupOffset {
    fn from(distance: f64) -> Self {
        PopupOffset::Uniform(distance)
    }
}

impl From<[f64; 2]> for PopupOffset {
    fn from(xy: [f64; 2]) -> Self {
        PopupOffset::Xy(xy)
    }
}

/// Content bubble anchored to a coordinate. Only on the map while open.
pub struct Popup {
    lng_lat: LngLat,
    content: String,
    class: Option<String>,
    offset: PopupOffset,
    on_close: Option<CloseListener>,
    /// Shared with the close listener, which runs outside the component
    open: Rc<Cell<bool>>,
    element: Rc<Cell<Option<ElementId>>>,
}

impl Popup {
    pub fn new(lng_lat: impl Into<LngLat>, content: impl Into<String>) -> Self {
        Self {
            lng_lat: lng_lat.into(),
            content: content.into(),
            class: None,
            offset: PopupOffset::default(),
            on_close: None,
            open: Rc::new(Cell::new(true)),
            element: Rc::new(Cell::new(None)),
        }
    }

    pub fn open(self, open: bool) -> Self {
        self.open.set(open);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn offset(mut self, offset: impl Into<PopupOffset>) -> Self {
        self.offset = offset.into();
        self
    }

    /// Called when the popup is closed from the map, e.g. its close button
    pub fn on_close(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_close = Some(Rc::new(callback));
        self
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn lng_lat(&self) -> LngLat {
        self.lng_lat
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element.get()
    }

    fn spec(&self) -> PopupSpec {
        PopupSpec {
            lng_lat: self.lng_lat,
            content: self.content.clone(),
            offset: self.offset.to_pixels(),
            class_name: self.class.clone(),
        }
    }

    fn close_listener(&self) -> CloseListener {
        let open = Rc::clone(&self.open);
        let element = Rc::clone(&self.element);
        let callback = self.on_close.clone();
        Rc::new(move || {
            open.set(false);
            element.set(None);
            if let Some(callback) = &callback {
                callback();
            }
        })
    }

    fn show<H: MapHandle>(&mut self, map: &H) -> Result<()> {
        if self.element.get().is_none() {
            let id = map.add_popup(&self.spec(), Some(self.close_listener()))?;
            self.element.set(Some(id));
        }
        Ok(())
    }

    fn hide<H: MapHandle>(&mut self, map: &H) {
        if let Some(id) = self.element.take() {
            map.remove_popup(id);
        }
    }
}

impl<H: MapHandle> MapComponent<H> for Popup {
    const NAME: &'static str = "Popup";

    fn attach(&mut self, map: &H) -> Result<()> {
        if self.open.get() {
            self.show(map)?;
        }
        Ok(())
    }

    fn detach(&mut self, map: &H) {
        self.hide(map);
    }

    fn forget(&mut self) {
        self.element.set(None);
    }
}

impl Mountable for Popup {}

impl<H: MapHandle> Mounted<H, Popup> {
    /// Open or close the popup
    pub fn set_open(&self, open: bool) -> Result<()> {
        self.update(|popup, map| {
            popup.open.set(open);
            match map {
                Some(map) if open => popup.show(map),
                Some(map) => {
                    popup.hide(map);
                    Ok(())
                }
                None => Ok(()),
            }
        })
    }

    /// Move the popup. An open popup is re-added at the new position.
    pub fn set_lng_lat(&self, lng_lat: impl Into<LngLat>) -> Result<()> {
        let lng_lat = lng_lat.into();
        self.update(|popup, map| {
            popup.lng_lat = lng_lat;
            match map {
                Some(map) if popup.open.get() => {
                    popup.hide(map);
                    popup.show(map)
                }
                _ => Ok(()),
            }
        })
    }
}

impl fmt::Debug for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popup")
            .field("lng_lat", &self.lng_lat)
            .field("open", &self.open.get())
            .field("offset", &self.offset)
            .field("element", &self.element.get())
            .finish()
    }
}
