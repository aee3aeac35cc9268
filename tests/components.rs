use shadmap::prelude::*;
use std::cell::{Cell, RefCell};

/// Integration tests for components driven by a real container through the
/// engine lifecycle
#[cfg(test)]
mod components {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn container() -> MapContainer<HeadlessEngine> {
        MapBuilder::new("https://example.com/world.pmtiles")
            .center((-0.12, 51.5))
            .zoom(10.0)
            .build(HeadlessEngine::new())
            .unwrap()
    }

    /// A whole subtree mounted before load comes up together on load
    #[test]
    fn test_full_subtree_attaches_on_load() {
        init();
        let mut map = container();
        let ctx = map.mount().unwrap();

        let _marker = Marker::new((-0.12, 51.5))
            .variant(MarkerVariant::Destructive)
            .mount(&ctx)
            .unwrap();
        let _popup = Popup::new((-0.12, 51.5), "London").mount(&ctx).unwrap();
        let _nav = NavigationControl::new().mount(&ctx).unwrap();
        let _scale = ScaleControl::new().mount(&ctx).unwrap();
        let _cluster = ClusterLayer::new(vec![ClusterPoint::new(1, (0.0, 51.0))])
            .id("pins")
            .mount(&ctx)
            .unwrap();

        let handle = map.engine().last_map().unwrap();
        assert_eq!(handle.marker_count(), 0);
        assert!(handle.controls().is_empty());

        map.handle_event(EngineEvent::Load);

        assert_eq!(handle.marker_count(), 1);
        assert_eq!(handle.popup_count(), 1);
        assert_eq!(handle.controls().len(), 2);
        assert!(handle.source("pins").is_some());
        assert_eq!(handle.runtime_layer_ids().len(), 3);
        assert_eq!(handle.markers()[0].style.background_color, "#ef4444");
    }

    /// A destroy event from the engine leaves components waiting for the
    /// next load
    #[test]
    fn test_destroy_then_reload() {
        init();
        let mut map = container();
        let ctx = map.mount().unwrap();
        map.handle_event(EngineEvent::Load);

        let marker = Marker::new((0.0, 0.0)).mount(&ctx).unwrap();
        assert!(marker.is_attached());

        map.handle_event(EngineEvent::Destroy);
        assert!(!marker.is_attached());
        assert_eq!(marker.component().element(), None);

        map.handle_event(EngineEvent::Load);
        assert!(marker.is_attached());
    }

    /// Clicks reach the callbacks given to the component
    #[test]
    fn test_marker_click_callback() {
        init();
        let mut map = container();
        let ctx = map.mount().unwrap();
        map.handle_event(EngineEvent::Load);

        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let marker = Marker::new((0.0, 0.0))
            .on_click(move || counter.set(counter.get() + 1))
            .mount(&ctx)
            .unwrap();

        let handle = marker.map().unwrap();
        let id = marker.component().element().unwrap();
        assert!(handle.click_marker(id));
        assert!(handle.click_marker(id));
        assert_eq!(clicks.get(), 2);
    }

    /// Moving a marker before load takes effect when it attaches
    #[test]
    fn test_position_set_before_load_is_used() {
        init();
        let mut map = container();
        let ctx = map.mount().unwrap();
        let marker = Marker::new((0.0, 0.0)).mount(&ctx).unwrap();
        marker.set_lng_lat((10.0, 20.0)).unwrap();

        map.handle_event(EngineEvent::Load);
        let handle = marker.map().unwrap();
        assert_eq!(handle.markers()[0].lng_lat, LngLat::new(10.0, 20.0));
    }

    /// Opening a popup before load shows it once the map is live
    #[test]
    fn test_popup_opened_before_load() {
        init();
        let mut map = container();
        let ctx = map.mount().unwrap();
        let popup = Popup::new((0.0, 0.0), "Hi").open(false).mount(&ctx).unwrap();
        popup.set_open(true).unwrap();

        map.handle_event(EngineEvent::Load);
        assert_eq!(popup.map().unwrap().popup_count(), 1);
    }

    /// Cluster clicks ease the live camera and report the expansion zoom
    #[test]
    fn test_cluster_click_through_container() {
        init();
        let mut map = container();
        let ctx = map.mount().unwrap();
        map.handle_event(EngineEvent::Load);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let cluster = ClusterLayer::new(vec![
            ClusterPoint::new("a", (0.0, 0.0)),
            ClusterPoint::new("b", (0.1, 0.1)),
        ])
        .id("pins")
        .on_cluster_click(move |id, zoom| sink.borrow_mut().push((id, zoom)))
        .mount(&ctx)
        .unwrap();

        let handle = cluster.map().unwrap();
        let click = LayerClick::new("pins-clusters", LngLat::new(0.05, 0.05))
            .with_property("cluster_id", 11);
        assert_eq!(handle.click_layer(&click), 1);
        assert_eq!(*seen.borrow(), vec![(11, 11.0)]);
        assert_eq!(handle.camera(), (LngLat::new(0.05, 0.05), 11.0));
    }

    /// Unmounting the container takes every engine element with it
    #[test]
    fn test_unmount_clears_map() {
        init();
        let mut map = container();
        let ctx = map.mount().unwrap();
        map.handle_event(EngineEvent::Load);
        let handle = map.engine().last_map().unwrap();

        let marker = Marker::new((0.0, 0.0)).mount(&ctx).unwrap();
        let nav = NavigationControl::new().mount(&ctx).unwrap();
        map.unmount();

        assert!(handle.is_removed());
        assert_eq!(handle.marker_count(), 0);
        assert!(!marker.is_attached());
        assert!(!nav.is_attached());
        assert_eq!(map.engine().destroyed_count(), 1);
    }

    /// A component that fails to attach on load stays detached, reports the
    /// error on its next update and recovers once the update is valid
    #[test]
    fn test_failed_attach_recovers_through_container() {
        init();
        let mut map = container();
        let ctx = map.mount().unwrap();

        let marker = Marker::new((0.0, 95.0)).mount(&ctx).unwrap();
        let popup = Popup::new((0.0, -95.0), "Off the map").mount(&ctx).unwrap();
        map.handle_event(EngineEvent::Load);
        let handle = map.engine().last_map().unwrap();

        assert!(!marker.is_attached());
        assert!(!popup.is_attached());
        assert_eq!(handle.marker_count(), 0);
        assert_eq!(handle.popup_count(), 0);
        assert!(popup.set_open(true).is_err());

        marker.set_lng_lat((0.0, 45.0)).unwrap();
        popup.set_lng_lat((0.0, -45.0)).unwrap();
        assert!(marker.is_attached() && popup.is_attached());

        assert_eq!(handle.marker_count(), 1);
        assert_eq!(handle.popup_count(), 1);

        drop(marker);
        drop(popup);
        assert_eq!(handle.marker_count(), 0);
        assert_eq!(handle.popup_count(), 0);
    }
}
