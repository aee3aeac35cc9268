//! Components that live inside a map container.
//!
//! Each component implements [`MapComponent`] and is mounted with
//! [`Mountable::mount`]; the resulting [`Mounted`] keeps it in sync with the
//! container's map.

pub mod cluster;
pub mod controls;
pub mod marker;
pub mod popup;
pub mod style;
pub mod traits;

pub use cluster::{ClusterLayer, ClusterPoint, PointId};
pub use controls::{NavigationControl, ScaleControl, ScaleUnit};
pub use marker::Marker;
pub use popup::{Popup, PopupOffset};
pub use style::{MarkerSize, MarkerStyle, MarkerVariant};
pub use traits::{MapComponent, Mountable, Mounted};
