use async_trait::async_trait;
use quakemap::{
    constants::{EARTHQUAKE_FEED_URL, TECTONIC_PLATES_URL},
    core::config::{BaseLayerKind, OverlayKind},
    data::{feed::FileFeedSource, style::palette},
    load_map, Error, FeedSource, GeoJson, LayerTrait, MapBuilder, MapConfig, MapProfile,
    NoticeLevel, Result,
};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

const QUAKES: &str = r#"{
  "type": "FeatureCollection",
  "metadata": {"generated": 1700000000000, "title": "USGS All Earthquakes, Past Week"},
  "features": [
    {"type": "Feature", "id": "ci1",
     "properties": {"mag": 2.5, "place": "10 km N of Ridgecrest, CA", "time": 1700000000000},
     "geometry": {"type": "Point", "coordinates": [-117.6, 35.7, 15.0]}},
    {"type": "Feature", "id": "us2",
     "properties": {"mag": 0.0, "place": "Fiji region", "time": 1700000100000},
     "geometry": {"type": "Point", "coordinates": [178.2, -17.9, 61.0]}},
    {"type": "Feature", "id": "bad",
     "properties": {"mag": 1.0, "place": "nowhere", "time": 1700000200000},
     "geometry": null}
  ]
}"#;

const PLATES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"Name": "AF-AN"},
     "geometry": {"type": "LineString", "coordinates": [[-0.43, -54.85], [-0.04, -54.67], [0.01, -54.47]]}}
  ]
}"#;

/// Serves canned bodies per URL; anything else fails like a dead server
struct StubFeeds {
    bodies: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StubFeeds {
    fn new(feeds: &[(&str, &str)]) -> Self {
        Self {
            bodies: feeds
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for StubFeeds {
    async fn fetch(&self, url: &str) -> Result<GeoJson> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.bodies.get(url) {
            Some(body) => GeoJson::parse(body),
            None => Err(Error::Http {
                status: 503,
                url: url.to_string(),
            }),
        }
    }
}

fn satellite_config() -> MapConfig {
    let mut config = MapProfile::Satellite.resolve();
    config.access_token = Some("pk.test".to_string());
    config
}

#[tokio::test]
async fn test_basic_profile_loads_earthquakes() {
    let feeds = StubFeeds::new(&[(EARTHQUAKE_FEED_URL, QUAKES)]);
    let map = load_map(MapProfile::Basic.resolve(), &feeds).await.unwrap();

    assert_eq!(feeds.calls(), 1);
    assert_eq!(map.base_layers().len(), 2);
    assert_eq!(map.overlays().len(), 1);
    assert_eq!(map.active_base_layer().unwrap().name(), "Street Map");

    let quakes = map.earthquakes().unwrap();
    assert_eq!(quakes.len(), 2);
    assert_eq!(quakes.skipped(), 1);

    let first = &quakes.markers()[0];
    assert_eq!(first.radius, 30_000.0);
    assert_eq!(first.fill_color, palette::DEPTH_10_20);
    assert_eq!(first.popup.as_ref().unwrap().title, "10 km N of Ridgecrest, CA");

    let second = &quakes.markers()[1];
    assert_eq!(second.radius, 0.0);
    assert_eq!(second.fill_color, palette::DEPTH_60_PLUS);

    assert_eq!(map.notices().len(), 1);
    assert_eq!(map.notices()[0].level, NoticeLevel::Warning);
}

#[tokio::test]
async fn test_satellite_profile_loads_both_overlays() {
    let feeds = StubFeeds::new(&[(EARTHQUAKE_FEED_URL, QUAKES), (TECTONIC_PLATES_URL, PLATES)]);
    let map = load_map(satellite_config(), &feeds).await.unwrap();

    assert_eq!(feeds.calls(), 2);
    let names: Vec<&str> = map.base_layers().iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["Satellite", "Grayscale", "Outdoors"]);
    let overlays: Vec<&str> = map.overlays().iter().map(|l| l.name()).collect();
    assert_eq!(overlays, vec!["Earthquakes", "Tectonic Plates"]);

    let plates = map.plate_boundaries().unwrap();
    assert_eq!(plates.lines().len(), 1);
    assert!(plates.is_visible());
}

#[tokio::test]
async fn test_failed_plate_feed_keeps_earthquakes() {
    let feeds = StubFeeds::new(&[(EARTHQUAKE_FEED_URL, QUAKES)]);
    let map = load_map(satellite_config(), &feeds).await.unwrap();

    assert!(map.earthquakes().is_some());
    assert!(map.plate_boundaries().is_none());
    assert_eq!(map.overlays().len(), 1);

    let errors: Vec<_> = map
        .notices()
        .iter()
        .filter(|n| n.level == NoticeLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Tectonic Plates"));
}

#[tokio::test]
async fn test_both_feeds_failing_still_yields_a_map() {
    let feeds = StubFeeds::new(&[]);
    let map = load_map(satellite_config(), &feeds).await.unwrap();

    assert!(map.overlays().is_empty());
    assert_eq!(map.base_layers().len(), 3);
    assert_eq!(map.notices().len(), 2);
    assert!(map.notices().iter().all(|n| n.level == NoticeLevel::Error));
}

#[tokio::test]
async fn test_unparseable_feed_becomes_a_notice() {
    let feeds = StubFeeds::new(&[(EARTHQUAKE_FEED_URL, "<html>maintenance</html>")]);
    let map = load_map(MapProfile::Basic.resolve(), &feeds).await.unwrap();

    assert!(map.earthquakes().is_none());
    assert_eq!(map.notices()[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_satellite_without_token_is_a_config_error() {
    let feeds = StubFeeds::new(&[]);
    let result = load_map(MapProfile::Satellite.resolve(), &feeds).await;
    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(feeds.calls(), 0);
}

#[tokio::test]
async fn test_builder_with_file_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("all_week.geojson"), QUAKES).unwrap();
    std::fs::write(dir.path().join("PB2002_boundaries.json"), PLATES).unwrap();

    let source = FileFeedSource::new(dir.path());
    let map = MapBuilder::new()
        .with_base_layers(vec![BaseLayerKind::Topographic])
        .with_overlays(vec![OverlayKind::TectonicPlates, OverlayKind::Earthquakes])
        .with_collapsed_control(true)
        .load(&source)
        .await
        .unwrap();

    let overlays: Vec<&str> = map.overlays().iter().map(|l| l.id()).collect();
    assert_eq!(overlays, vec!["tectonic-plates", "earthquakes"]);
    assert!(map.layer_control().collapsed);
    assert_eq!(map.legend().entries.len(), 8);
}

#[tokio::test]
async fn test_overlay_toggles_after_load() {
    let feeds = StubFeeds::new(&[(EARTHQUAKE_FEED_URL, QUAKES)]);
    let mut map = load_map(MapProfile::Basic.resolve(), &feeds).await.unwrap();

    map.select_base_layer("topographic").unwrap();
    assert!(!map.toggle_overlay("earthquakes").unwrap());
    assert!(map.toggle_overlay("earthquakes").unwrap());

    let control = map.layer_control();
    assert_eq!(control.selected_base().unwrap().name, "Topographic Map");
    assert!(control.overlays[0].active);
}
