//! Prelude module for common quakemap types and traits
//!
//! `use quakemap::prelude::*;` brings in everything needed to load a map
//! and inspect its layers.

pub use crate::core::{
    builder::{compose_map, load_map, MapBuilder},
    config::{BaseLayerKind, MapConfig, MapProfile, OverlayKind},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, Notice, NoticeLevel},
    viewport::Viewport,
};

pub use crate::data::{
    feed::{FeedSource, FileFeedSource, HttpFeedSource},
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    quake::Earthquake,
    style::{color_for, radius_for, style_for, SerializableColor, StyleResult, DEPTH_BUCKETS},
};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    earthquake::EarthquakeLayer,
    manager::LayerManager,
    marker::{CircleMarker, Popup},
    tile::TileLayer,
    vector::{LineStyle, PlateBoundaryLayer},
};

pub use crate::tiles::{TileCache, TileLoader, TileSource};

pub use crate::ui::{
    controls::{ControlAction, Legend, LayerControl},
    elements::Position,
};

#[cfg(feature = "egui")]
pub use crate::ui::{style::MapStyle, widget::MapWidget, UiMapExt};

#[cfg(feature = "egui")]
pub use crate::traits::UiRenderable;

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
