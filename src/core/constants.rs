//! Library-wide defaults and fixed values of the basemap style format.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Initial zoom when none is configured.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Engine default zoom range.
pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
pub const DEFAULT_MAX_ZOOM: f64 = 22.0;

/// Hard limit accepted for `max_zoom`.
pub const ZOOM_LIMIT: f64 = 24.0;

/// Maximum camera tilt in degrees.
pub const MAX_PITCH: f64 = 85.0;

/// Style specification version produced and accepted.
pub const STYLE_VERSION: u8 = 8;

/// Name of the vector source in generated basemap styles.
pub const BASEMAP_SOURCE: &str = "protomaps";

/// URL scheme the engine's PMTiles protocol handler is registered under.
pub const PMTILES_SCHEME: &str = "pmtiles://";

pub const BASEMAP_ATTRIBUTION: &str = "© <a href=\"https://protomaps.com\">Protomaps</a> © <a href=\"https://openstreetmap.org\">OpenStreetMap</a>";

pub const GLYPHS_URL: &str =
    "https://protomaps.github.io/basemaps-assets/fonts/{fontstack}/{range}.pbf";

pub const LABEL_FONT: &str = "Noto Sans Regular";

/// Cluster radius in pixels.
pub const DEFAULT_CLUSTER_RADIUS: u32 = 50;

/// Zoom level past which points are no longer clustered.
pub const DEFAULT_CLUSTER_MAX_ZOOM: u32 = 14;

/// Scale bar maximum width in pixels.
pub const DEFAULT_SCALE_MAX_WIDTH: u32 = 100;

/// Marker dot diameters in pixels for `sm`, `md` and `lg`.
pub const MARKER_SIZE_SM: u32 = 12;
pub const MARKER_SIZE_MD: u32 = 16;
pub const MARKER_SIZE_LG: u32 = 24;

/// Popup distance from its anchor in pixels.
pub const DEFAULT_POPUP_OFFSET: f64 = 12.0;
