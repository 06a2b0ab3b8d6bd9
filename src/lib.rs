//! # quakemap
//!
//! Earthquake and tectonic plate maps built from public GeoJSON feeds.
//!
//! The crate fetches the USGS earthquake feed (and optionally the PB2002
//! plate boundary feed), turns every earthquake into a styled circle marker
//! and composes a [`Map`] holding base layers, overlays, a layer control and a
//! depth legend. The `egui` feature adds a widget that paints the composed map.

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod tiles;
pub mod traits;
pub mod ui;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    builder::{compose_map, load_map, MapBuilder},
    config::{MapConfig, MapProfile},
    geo::{LatLng, LatLngBounds, TileCoord},
    map::{Map, Notice, NoticeLevel},
    viewport::Viewport,
};

pub use data::{
    feed::{FeedSource, HttpFeedSource},
    geojson::GeoJson,
    quake::Earthquake,
    style::{color_for, radius_for, style_for, StyleResult},
};

pub use layers::{
    base::LayerTrait, earthquake::EarthquakeLayer, marker::CircleMarker, tile::TileLayer,
    vector::PlateBoundaryLayer,
};

pub use ui::{controls::{LayerControl, Legend}, elements::Position};

#[cfg(feature = "egui")]
pub use ui::widget::MapWidget;

/// Initializes `env_logger` from `RUST_LOG`, defaulting to `info` for this
/// crate. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("quakemap=info,quakemap_app=info"),
    )
    .try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Invalid feature: {0}")]
    InvalidFeature(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
