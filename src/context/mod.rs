//! Map context propagation: how one live map handle reaches every component
//! mounted under a map container.

pub mod accessor;
pub mod observable;
pub mod registry;

pub use accessor::MapContext;
pub use observable::{Observable, Subscription};
pub use registry::{MapRegistry, MapState, SharedRegistry};
