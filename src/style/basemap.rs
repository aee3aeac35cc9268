//! Minimal Protomaps basemap styles in the shadcn palette.
//!
//! The output is a pure function of the tiles URL: roads first, subtle water,
//! buildings only at high zoom and labels for major places only.

use crate::{
    core::constants,
    style::{
        colors::{BasemapPalette, COLORS},
        spec::{LayerKind, Source, StyleLayer, StyleSpecification},
    },
};
use serde_json::{json, Map};
use std::collections::BTreeMap;

/// Dark basemap backed by the PMTiles archive at `tiles_url`.
///
/// `tiles_url` may be given with or without the `pmtiles://` scheme; it is
/// added only when missing, so an already prefixed URL is not doubled.
pub fn create_dark_style(tiles_url: &str) -> StyleSpecification {
    create_basemap_style("shadcn-dark", &COLORS.dark, tiles_url)
}

/// Light basemap backed by the PMTiles archive at `tiles_url`. The
/// `pmtiles://` scheme is added as for [`create_dark_style`].
pub fn create_light_style(tiles_url: &str) -> StyleSpecification {
    create_basemap_style("shadcn-light", &COLORS.light, tiles_url)
}

/// Build a basemap document for any palette
pub fn create_basemap_style(
    name: &str,
    palette: &BasemapPalette,
    tiles_url: &str,
) -> StyleSpecification {
    let mut sources = BTreeMap::new();
    sources.insert(
        constants::BASEMAP_SOURCE.to_string(),
        Source::vector(pmtiles_url(tiles_url)).with_attribution(constants::BASEMAP_ATTRIBUTION),
    );

    StyleSpecification {
        version: constants::STYLE_VERSION,
        name: Some(name.to_string()),
        sources,
        glyphs: Some(constants::GLYPHS_URL.to_string()),
        layers: basemap_layers(palette),
        extra: Map::new(),
    }
}

/// Prefix `tiles_url` with the PMTiles protocol unless it already has it
pub fn pmtiles_url(tiles_url: &str) -> String {
    if tiles_url.starts_with(constants::PMTILES_SCHEME) {
        tiles_url.to_string()
    } else {
        format!("{}{}", constants::PMTILES_SCHEME, tiles_url)
    }
}

fn basemap_layers(c: &BasemapPalette) -> Vec<StyleLayer> {
    let src = constants::BASEMAP_SOURCE;

    vec![
        StyleLayer::new("background", LayerKind::Background)
            .paint("background-color", c.background),
        // Land, barely visible, for coastlines
        StyleLayer::new("land", LayerKind::Fill)
            .source(src)
            .source_layer("land")
            .paint("fill-color", c.land),
        StyleLayer::new("water", LayerKind::Fill)
            .source(src)
            .source_layer("water")
            .paint("fill-color", c.water),
        StyleLayer::new("buildings", LayerKind::Fill)
            .source(src)
            .source_layer("buildings")
            .minzoom(14.0)
            .paint("fill-color", c.building)
            .paint(
                "fill-opacity",
                json!(["interpolate", ["linear"], ["zoom"], 14, 0, 15, 0.5]),
            ),
        StyleLayer::new("roads-minor", LayerKind::Line)
            .source(src)
            .source_layer("roads")
            .filter(json!(["in", "pmap:kind", "minor_road", "other", "path"]))
            .minzoom(12.0)
            .paint("line-color", c.road_minor)
            .paint(
                "line-width",
                json!(["interpolate", ["linear"], ["zoom"], 12, 0.5, 16, 2]),
            ),
        StyleLayer::new("roads-major", LayerKind::Line)
            .source(src)
            .source_layer("roads")
            .filter(json!(["in", "pmap:kind", "major_road", "medium_road"]))
            .minzoom(8.0)
            .paint("line-color", c.road_major)
            .paint(
                "line-width",
                json!(["interpolate", ["linear"], ["zoom"], 8, 0.5, 12, 2, 16, 4]),
            ),
        StyleLayer::new("roads-highway", LayerKind::Line)
            .source(src)
            .source_layer("roads")
            .filter(json!(["==", "pmap:kind", "highway"]))
            .minzoom(5.0)
            .paint("line-color", c.road_highway)
            .paint(
                "line-width",
                json!(["interpolate", ["linear"], ["zoom"], 5, 0.5, 10, 2, 16, 6]),
            ),
        StyleLayer::new("boundaries", LayerKind::Line)
            .source(src)
            .source_layer("boundaries")
            .paint("line-color", c.boundary)
            .paint("line-width", 1)
            .paint("line-dasharray", json!([2, 2])),
        // Major places only
        StyleLayer::new("labels-places", LayerKind::Symbol)
            .source(src)
            .source_layer("places")
            .minzoom(6.0)
            .filter(json!(["in", "pmap:kind", "city", "state", "country"]))
            .layout("text-field", json!(["get", "name"]))
            .layout("text-font", json!([constants::LABEL_FONT]))
            .layout(
                "text-size",
                json!(["interpolate", ["linear"], ["zoom"], 6, 10, 12, 14]),
            )
            .layout("text-max-width", 10)
            .paint("text-color", c.label)
            .paint("text-halo-color", c.label_halo)
            .paint("text-halo-width", 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILES: &str = "https://example.com/world.pmtiles";

    #[test]
    fn test_dark_style_document() {
        let style = create_dark_style(TILES);
        assert_eq!(style.version, 8);
        assert_eq!(style.name.as_deref(), Some("shadcn-dark"));
        assert_eq!(
            style.sources["protomaps"].url.as_deref(),
            Some("pmtiles://https://example.com/world.pmtiles")
        );
        assert!(style.sources["protomaps"]
            .attribution
            .as_deref()
            .unwrap()
            .contains("OpenStreetMap"));
        assert_eq!(style.glyphs.as_deref(), Some(constants::GLYPHS_URL));
        assert!(style.validate().is_ok());
    }

    #[test]
    fn test_layer_order() {
        let style = create_light_style(TILES);
        assert_eq!(
            style.layer_ids(),
            vec![
                "background",
                "land",
                "water",
                "buildings",
                "roads-minor",
                "roads-major",
                "roads-highway",
                "boundaries",
                "labels-places",
            ]
        );
    }

    #[test]
    fn test_palettes_apply() {
        let dark = create_dark_style(TILES);
        let light = create_light_style(TILES);

        assert_eq!(
            dark.layer("background").unwrap().paint["background-color"],
            json!("#09090b")
        );
        assert_eq!(
            light.layer("background").unwrap().paint["background-color"],
            json!("#fafafa")
        );
        assert_eq!(light.layer("water").unwrap().paint["fill-color"], json!("#dbeafe"));
        assert_eq!(
            dark.layer("labels-places").unwrap().paint["text-halo-color"],
            json!("#09090b")
        );
    }

    #[test]
    fn test_zoom_dependent_layers() {
        let style = create_dark_style(TILES);
        assert_eq!(style.layer("buildings").unwrap().minzoom, Some(14.0));
        assert_eq!(style.layer("roads-minor").unwrap().minzoom, Some(12.0));
        assert_eq!(style.layer("roads-major").unwrap().minzoom, Some(8.0));
        assert_eq!(style.layer("roads-highway").unwrap().minzoom, Some(5.0));
        assert_eq!(style.layer("labels-places").unwrap().minzoom, Some(6.0));
        assert!(style.layer("boundaries").unwrap().minzoom.is_none());

        let highway = style.layer("roads-highway").unwrap();
        assert_eq!(highway.filter, Some(json!(["==", "pmap:kind", "highway"])));
    }

    #[test]
    fn test_pmtiles_prefix_not_doubled() {
        assert_eq!(pmtiles_url("pmtiles://a.pmtiles"), "pmtiles://a.pmtiles");
        assert_eq!(pmtiles_url("/tiles/a.pmtiles"), "pmtiles:///tiles/a.pmtiles");

        let style = create_dark_style("pmtiles://https://example.com/a.pmtiles");
        assert_eq!(
            style.sources["protomaps"].url.as_deref(),
            Some("pmtiles://https://example.com/a.pmtiles")
        );
    }
}
