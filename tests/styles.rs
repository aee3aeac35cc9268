use serde_json::json;
use shadmap::prelude::*;

/// Integration tests for style selection through the container
#[cfg(test)]
mod styles {
    use super::*;

    const TILES: &str = "https://example.com/world.pmtiles";

    fn custom_style() -> StyleSpecification {
        StyleSpecification::from_json(
            &json!({
                "version": 8,
                "name": "satellite",
                "sources": {
                    "imagery": {"type": "raster", "tiles": ["https://tiles/{z}/{x}/{y}.jpg"]}
                },
                "layers": [
                    {"id": "imagery", "type": "raster", "source": "imagery"}
                ],
                "sprite": "https://example.com/sprite"
            })
            .to_string(),
        )
        .unwrap()
    }

    /// Custom documents go to the engine unchanged
    #[test]
    fn test_custom_style_is_used_as_is() {
        let style = custom_style();
        let mut map = MapBuilder::new(TILES)
            .style(style.clone())
            .build(HeadlessEngine::new())
            .unwrap();
        let _ctx = map.mount().unwrap();

        let handle = map.engine().last_map().unwrap();
        assert_eq!(handle.style(), style);
        assert_eq!(handle.style().extra["sprite"], json!("https://example.com/sprite"));
    }

    /// Options loaded from JSON select the generated basemap
    #[test]
    fn test_options_from_json_drive_style() {
        let options = MapOptions::from_json(&format!(
            r#"{{"tiles": "{}", "style": "dark", "center": [2.35, 48.85], "zoom": 5}}"#,
            TILES
        ))
        .unwrap();

        let mut map = MapContainer::new(HeadlessEngine::new(), options).unwrap();
        let _ctx = map.mount().unwrap();
        map.handle_event(EngineEvent::Load);

        let handle = map.engine().last_map().unwrap();
        let style = handle.style();
        assert_eq!(style.name.as_deref(), Some("shadcn-dark"));
        assert_eq!(
            style.sources["protomaps"].url.as_deref(),
            Some("pmtiles://https://example.com/world.pmtiles")
        );
        assert_eq!(handle.camera(), (LngLat::new(2.35, 48.85), 5.0));
    }

    /// Broken custom documents are rejected before reaching the engine
    #[test]
    fn test_invalid_custom_style_rejected() {
        let mut style = custom_style();
        style.layers[0].source = Some("missing".to_string());

        let result = MapBuilder::new(TILES)
            .style(style.clone())
            .build(HeadlessEngine::new());
        assert!(matches!(result, Err(MapError::InvalidStyle(_))));

        let mut map = MapContainer::new(HeadlessEngine::new(), MapOptions::new(TILES)).unwrap();
        assert!(map.set_style_mode(StyleMode::from(style)).is_err());
        assert_eq!(map.options().style, StyleMode::Auto);
    }

    /// Switching to a custom document restyles the live map
    #[test]
    fn test_switch_to_custom_style_when_live() {
        let mut map = MapContainer::new(HeadlessEngine::new(), MapOptions::new(TILES)).unwrap();
        let _ctx = map.mount().unwrap();
        map.handle_event(EngineEvent::Load);
        let handle = map.engine().last_map().unwrap();

        map.set_style_mode(StyleMode::from(custom_style())).unwrap();
        assert_eq!(handle.style_name().as_deref(), Some("satellite"));
    }

    /// Both generated documents share structure and differ in colours only
    #[test]
    fn test_generated_documents_match() {
        let dark = create_dark_style(TILES);
        let light = create_light_style(TILES);

        assert_eq!(dark.layer_ids(), light.layer_ids());
        assert_eq!(dark.glyphs, light.glyphs);
        assert_ne!(
            dark.layer("background").unwrap().paint,
            light.layer("background").unwrap().paint
        );
        assert!(dark.validate().is_ok() && light.validate().is_ok());
    }
}
