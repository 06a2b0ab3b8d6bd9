//! Map composition.
//!
//! `compose_map` assembles already-built layers, `load_map` fetches the feeds
//! first, and `MapBuilder` offers a fluent way to put a `MapConfig` together.

use crate::{
    core::{
        config::{BaseLayerKind, MapConfig, MapProfile, OverlayKind},
        geo::LatLng,
        map::{Map, Notice},
    },
    data::{feed::FeedSource, geojson::GeoJson},
    layers::{
        base::LayerTrait, earthquake::EarthquakeLayer, tile::TileLayer,
        vector::PlateBoundaryLayer,
    },
    ui::elements::Position,
    Result,
};

/// Builds a map from the configured base layers and whichever overlays are
/// present. Overlays not named in the config are ignored.
pub fn compose_map(
    config: MapConfig,
    earthquakes: Option<EarthquakeLayer>,
    plates: Option<PlateBoundaryLayer>,
    notices: Vec<Notice>,
) -> Result<Map> {
    config.validate()?;

    let base_layers = config
        .base_layers
        .iter()
        .map(|kind| kind.build(config.access_token.as_deref()))
        .collect::<Result<Vec<TileLayer>>>()?;

    let mut earthquakes = earthquakes;
    let mut plates = plates;
    let mut overlays: Vec<Box<dyn LayerTrait>> = Vec::new();
    for kind in &config.overlays {
        match kind {
            OverlayKind::Earthquakes => {
                if let Some(layer) = earthquakes.take() {
                    overlays.push(Box::new(layer));
                }
            }
            OverlayKind::TectonicPlates => {
                if let Some(layer) = plates.take() {
                    overlays.push(Box::new(layer));
                }
            }
        }
    }

    log::info!(
        "composed map with {} base layers and {} overlays",
        base_layers.len(),
        overlays.len()
    );
    Map::assemble(config, base_layers, overlays, notices)
}

/// Fetches the earthquake feed (and the plate feed when the config shows
/// plates) concurrently, renders the overlays and composes the map. A feed
/// that fails leaves its overlay out and adds an error notice.
pub async fn load_map(config: MapConfig, source: &dyn FeedSource) -> Result<Map> {
    config.validate()?;

    let want_quakes = config.has_overlay(OverlayKind::Earthquakes);
    let want_plates = config.has_overlay(OverlayKind::TectonicPlates);

    let quake_fetch = async {
        if want_quakes {
            Some(source.fetch(&config.earthquake_feed_url).await)
        } else {
            None
        }
    };
    let plate_fetch = async {
        if want_plates {
            Some(source.fetch(&config.plates_feed_url).await)
        } else {
            None
        }
    };
    let (quake_result, plate_result) = futures::join!(quake_fetch, plate_fetch);

    let mut notices = Vec::new();

    let earthquakes = accept_feed(quake_result, OverlayKind::Earthquakes, &mut notices);
    let earthquakes = earthquakes.map(|geojson| {
        let kind = OverlayKind::Earthquakes;
        let layer =
            EarthquakeLayer::from_geojson(kind.id().to_string(), kind.name().to_string(), &geojson);
        if layer.skipped() > 0 {
            notices.push(Notice::warning(format!(
                "{} earthquake features could not be shown",
                layer.skipped()
            )));
        }
        layer
    });

    let plates = accept_feed(plate_result, OverlayKind::TectonicPlates, &mut notices);
    let plates = plates.map(|geojson| {
        let kind = OverlayKind::TectonicPlates;
        PlateBoundaryLayer::from_geojson(kind.id().to_string(), kind.name().to_string(), &geojson)
    });

    compose_map(config, earthquakes, plates, notices)
}

fn accept_feed(
    result: Option<Result<GeoJson>>,
    kind: OverlayKind,
    notices: &mut Vec<Notice>,
) -> Option<GeoJson> {
    match result? {
        Ok(geojson) => Some(geojson),
        Err(e) => {
            log::error!("failed to load {} feed: {}", kind.name(), e);
            notices.push(Notice::error(format!(
                "{} data could not be loaded: {}",
                kind.name(),
                e
            )));
            None
        }
    }
}

/// Fluent builder for a `MapConfig`
#[derive(Debug, Clone)]
pub struct MapBuilder {
    config: MapConfig,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self {
            config: MapConfig::default(),
        }
    }

    /// Starts from a profile preset, keeping nothing set so far
    pub fn with_profile(mut self, profile: MapProfile) -> Self {
        self.config = profile.resolve();
        self
    }

    pub fn with_center(mut self, center: LatLng) -> Self {
        self.config.center = center;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.config.zoom = zoom;
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    pub fn with_base_layers(mut self, base_layers: Vec<BaseLayerKind>) -> Self {
        self.config.base_layers = base_layers;
        self
    }

    pub fn with_overlays(mut self, overlays: Vec<OverlayKind>) -> Self {
        self.config.overlays = overlays;
        self
    }

    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.config.earthquake_feed_url = url.into();
        self
    }

    pub fn with_plates_url(mut self, url: impl Into<String>) -> Self {
        self.config.plates_feed_url = url.into();
        self
    }

    pub fn with_collapsed_control(mut self, collapsed: bool) -> Self {
        self.config.control_collapsed = collapsed;
        self
    }

    pub fn with_legend_position(mut self, position: Position) -> Self {
        self.config.legend_position = position;
        self
    }

    pub fn with_tile_cache_size(mut self, tiles: usize) -> Self {
        self.config.tile_cache_size = tiles;
        self
    }

    /// Validated configuration
    pub fn config(self) -> Result<MapConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Composes a map from layers the caller already has
    pub fn build(
        self,
        earthquakes: Option<EarthquakeLayer>,
        plates: Option<PlateBoundaryLayer>,
    ) -> Result<Map> {
        compose_map(self.config, earthquakes, plates, Vec::new())
    }

    /// Fetches the feeds and composes the map
    pub async fn load(self, source: &dyn FeedSource) -> Result<Map> {
        load_map(self.config, source).await
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
