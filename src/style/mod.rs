//! Style documents handed to the engine.

pub mod basemap;
pub mod colors;
pub mod spec;

use crate::style::spec::StyleSpecification;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The application's current light/dark preference, as reported by whatever
/// watches the system setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Which style document the map container uses
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "StyleModeRepr", into = "StyleModeRepr")]
pub enum StyleMode {
    /// Follow the current [`ColorScheme`]
    #[default]
    Auto,
    Dark,
    Light,
    Custom(Box<StyleSpecification>),
}

impl StyleMode {
    /// Produce the document for this mode. Built-in modes are generated from
    /// `tiles_url`; a custom document is returned as is.
    pub fn resolve(&self, tiles_url: &str, scheme: ColorScheme) -> StyleSpecification {
        match self {
            StyleMode::Auto => match scheme {
                ColorScheme::Light => basemap::create_light_style(tiles_url),
                ColorScheme::Dark => basemap::create_dark_style(tiles_url),
            },
            StyleMode::Dark => basemap::create_dark_style(tiles_url),
            StyleMode::Light => basemap::create_light_style(tiles_url),
            StyleMode::Custom(style) => style.as_ref().clone(),
        }
    }

    /// True when the resolved document depends on the colour scheme
    pub fn follows_scheme(&self) -> bool {
        matches!(self, StyleMode::Auto)
    }
}

impl From<StyleSpecification> for StyleMode {
    fn from(style: StyleSpecification) -> Self {
        StyleMode::Custom(Box::new(style))
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleMode::Auto => f.write_str("auto"),
            StyleMode::Dark => f.write_str("dark"),
            StyleMode::Light => f.write_str("light"),
            StyleMode::Custom(style) => {
                write!(f, "custom({})", style.name.as_deref().unwrap_or("unnamed"))
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NamedMode {
    Auto,
    Dark,
    Light,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StyleModeRepr {
    Named(NamedMode),
    Custom(Box<StyleSpecification>),
}

impl From<StyleModeRepr> for StyleMode {
    fn from(repr: StyleModeRepr) -> Self {
        match repr {
            StyleModeRepr::Named(NamedMode::Auto) => StyleMode::Auto,
            StyleModeRepr::Named(NamedMode::Dark) => StyleMode::Dark,
            StyleModeRepr::Named(NamedMode::Light) => StyleMode::Light,
            StyleModeRepr::Custom(style) => StyleMode::Custom(style),
        }
    }
}

impl From<StyleMode> for StyleModeRepr {
    fn from(mode: StyleMode) -> Self {
        match mode {
            StyleMode::Auto => StyleModeRepr::Named(NamedMode::Auto),
            StyleMode::Dark => StyleModeRepr::Named(NamedMode::Dark),
            StyleMode::Light => StyleModeRepr::Named(NamedMode::Light),
            StyleMode::Custom(style) => StyleModeRepr::Custom(style),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILES: &str = "world.pmtiles";

    #[test]
    fn test_auto_follows_scheme() {
        let light = StyleMode::Auto.resolve(TILES, ColorScheme::Light);
        let dark = StyleMode::Auto.resolve(TILES, ColorScheme::Dark);
        assert_eq!(light.name.as_deref(), Some("shadcn-light"));
        assert_eq!(dark.name.as_deref(), Some("shadcn-dark"));
        assert!(StyleMode::Auto.follows_scheme());
        assert!(!StyleMode::Dark.follows_scheme());
    }

    #[test]
    fn test_fixed_modes_ignore_scheme() {
        let style = StyleMode::Dark.resolve(TILES, ColorScheme::Light);
        assert_eq!(style.name.as_deref(), Some("shadcn-dark"));

        let style = StyleMode::Light.resolve(TILES, ColorScheme::Dark);
        assert_eq!(style.name.as_deref(), Some("shadcn-light"));
    }

    #[test]
    fn test_custom_returned_unchanged() {
        let mut custom = basemap::create_dark_style("other.pmtiles");
        custom.name = Some("mine".to_string());
        let mode = StyleMode::from(custom.clone());
        assert_eq!(mode.resolve(TILES, ColorScheme::Light), custom);
        assert_eq!(mode.to_string(), "custom(mine)");
    }

    #[test]
    fn test_deserialize_modes() {
        let mode: StyleMode = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(mode, StyleMode::Dark);

        let mode: StyleMode = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(mode, StyleMode::Auto);

        let mode: StyleMode =
            serde_json::from_str(r#"{ "version": 8, "sources": {}, "layers": [] }"#).unwrap();
        assert!(matches!(mode, StyleMode::Custom(_)));

        assert!(serde_json::from_str::<StyleMode>("\"sepia\"").is_err());
    }

    #[test]
    fn test_serialize_named_mode() {
        assert_eq!(serde_json::to_string(&StyleMode::Light).unwrap(), "\"light\"");
    }
}
