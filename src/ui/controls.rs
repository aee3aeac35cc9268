//! Built-in map controls.
//!
//! Controls are drawn by the engine; the components here only describe
//! which control goes where.

use crate::{
    core::{
        config::ControlPosition,
        constants,
        engine::{ControlSpec, ElementId, MapHandle},
    },
    ui::traits::{MapComponent, Mountable},
    Result,
};
use serde::{Deserialize, Serialize};

/// Generates the [`MapComponent`] and [`Mountable`] impls shared by all controls. The control
/// type needs `position`, `element` fields and a `spec()` method.
macro_rules! impl_control_component {
    ($control:ty, $name:literal) => {
        impl<H: MapHandle> MapComponent<H> for $control {
            const NAME: &'static str = $name;

            fn attach(&mut self, map: &H) -> Result<()> {
                let id = map.add_control(&self.spec(), self.position)?;
                self.element = Some(id);
                Ok(())
            }

            fn detach(&mut self, map: &H) {
                if let Some(id) = self.element.take() {
                    map.remove_control(id);
                }
            }

            fn forget(&mut self) {
                self.element = None;
            }
        }

        impl Mountable for $control {}
    };
}

/// Zoom buttons and compass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationControl {
    pub position: ControlPosition,
    pub show_compass: bool,
    pub show_zoom: bool,
    #[serde(skip)]
    element: Option<ElementId>,
}

impl NavigationControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: ControlPosition) -> Self {
        self.position = position;
        self
    }

    pub fn show_compass(mut self, show: bool) -> Self {
        self.show_compass = show;
        self
    }

    pub fn show_zoom(mut self, show: bool) -> Self {
        self.show_zoom = show;
        self
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    fn spec(&self) -> ControlSpec {
        ControlSpec::Navigation {
            show_compass: self.show_compass,
            show_zoom: self.show_zoom,
        }
    }
}

impl Default for NavigationControl {
    fn default() -> Self {
        Self {
            position: ControlPosition::TopRight,
            show_compass: true,
            show_zoom: true,
            element: None,
        }
    }
}

impl_control_component!(NavigationControl, "NavigationControl");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleUnit {
    Imperial,
    #[default]
    Metric,
    Nautical,
}

impl ScaleUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleUnit::Imperial => "imperial",
            ScaleUnit::Metric => "metric",
            ScaleUnit::Nautical => "nautical",
        }
    }
}

/// Distance scale bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleControl {
    pub position: ControlPosition,
    pub unit: ScaleUnit,
    /// Maximum bar length in pixels
    pub max_width: u32,
    #[serde(skip)]
    element: Option<ElementId>,
}

impl ScaleControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: ControlPosition) -> Self {
        self.position = position;
        self
    }

    pub fn unit(mut self, unit: ScaleUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    fn spec(&self) -> ControlSpec {
        ControlSpec::Scale {
            unit: self.unit.as_str(),
            max_width: self.max_width,
        }
    }
}

impl Default for ScaleControl {
    fn default() -> Self {
        Self {
            position: ControlPosition::BottomLeft,
            unit: ScaleUnit::default(),
            max_width: constants::DEFAULT_SCALE_MAX_WIDTH,
            element: None,
        }
    }
}

impl_control_component!(ScaleControl, "ScaleControl");
