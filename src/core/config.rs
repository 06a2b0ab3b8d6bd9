//! Map configuration: profile presets resolved into a `MapConfig`.
//!
//! A profile names one of the two stock maps (street/topographic with the
//! earthquake overlay, or the Mapbox satellite map that also shows plate
//! boundaries). Anything else is expressed as `MapProfile::Custom`.

use crate::{
    core::{
        constants::{DEFAULT_CENTER, DEFAULT_ZOOM, EARTHQUAKE_FEED_URL, TECTONIC_PLATES_URL},
        geo::LatLng,
    },
    layers::tile::TileLayer,
    ui::elements::Position,
    Error, Result,
};
use serde::{Deserialize, Serialize};

pub const ENV_PROFILE: &str = "QUAKEMAP_PROFILE";
pub const ENV_ACCESS_TOKEN: &str = "MAPBOX_ACCESS_TOKEN";
pub const ENV_FEED_URL: &str = "QUAKEMAP_FEED_URL";
pub const ENV_PLATES_URL: &str = "QUAKEMAP_PLATES_URL";

/// Background imagery a map can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseLayerKind {
    Street,
    Topographic,
    Satellite,
    Grayscale,
    Outdoors,
}

impl BaseLayerKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Street => "street",
            Self::Topographic => "topographic",
            Self::Satellite => "satellite",
            Self::Grayscale => "grayscale",
            Self::Outdoors => "outdoors",
        }
    }

    /// Name shown in the layer control
    pub fn name(&self) -> &'static str {
        match self {
            Self::Street => "Street Map",
            Self::Topographic => "Topographic Map",
            Self::Satellite => "Satellite",
            Self::Grayscale => "Grayscale",
            Self::Outdoors => "Outdoors",
        }
    }

    pub fn requires_access_token(&self) -> bool {
        matches!(self, Self::Satellite | Self::Grayscale | Self::Outdoors)
    }

    pub fn build(&self, access_token: Option<&str>) -> Result<TileLayer> {
        let id = self.id().to_string();
        let name = self.name().to_string();
        let token = || {
            access_token.ok_or_else(|| {
                Error::Config(format!("'{}' needs {}", self.name(), ENV_ACCESS_TOKEN))
            })
        };
        match self {
            Self::Street => Ok(TileLayer::street(id, name)),
            Self::Topographic => Ok(TileLayer::topographic(id, name)),
            Self::Satellite => TileLayer::satellite(id, name, token()?),
            Self::Grayscale => TileLayer::grayscale(id, name, token()?),
            Self::Outdoors => TileLayer::outdoors(id, name, token()?),
        }
    }
}

/// Toggleable data drawn over the base layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayKind {
    Earthquakes,
    TectonicPlates,
}

impl OverlayKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Earthquakes => "earthquakes",
            Self::TectonicPlates => "tectonic-plates",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Earthquakes => "Earthquakes",
            Self::TectonicPlates => "Tectonic Plates",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapProfile {
    Basic,
    Satellite,
    Custom(MapConfig),
}

impl MapProfile {
    pub fn resolve(&self) -> MapConfig {
        match self {
            Self::Basic => MapConfig {
                base_layers: vec![BaseLayerKind::Street, BaseLayerKind::Topographic],
                overlays: vec![OverlayKind::Earthquakes],
                ..MapConfig::common()
            },
            Self::Satellite => MapConfig {
                base_layers: vec![
                    BaseLayerKind::Satellite,
                    BaseLayerKind::Grayscale,
                    BaseLayerKind::Outdoors,
                ],
                overlays: vec![OverlayKind::Earthquakes, OverlayKind::TectonicPlates],
                ..MapConfig::common()
            },
            Self::Custom(config) => config.clone(),
        }
    }

    /// `basic` or `satellite`, case-insensitive
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "basic" => Ok(Self::Basic),
            "satellite" => Ok(Self::Satellite),
            other => Err(Error::Config(format!("unknown map profile '{}'", other))),
        }
    }
}

impl Default for MapProfile {
    fn default() -> Self {
        Self::Basic
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: f64,
    /// Base layers in control order; the first one starts selected
    pub base_layers: Vec<BaseLayerKind>,
    pub overlays: Vec<OverlayKind>,
    pub earthquake_feed_url: String,
    pub plates_feed_url: String,
    pub access_token: Option<String>,
    pub control_collapsed: bool,
    pub legend_position: Position,
    /// Tiles kept in memory per base layer
    pub tile_cache_size: usize,
}

impl MapConfig {
    fn common() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            base_layers: Vec::new(),
            overlays: Vec::new(),
            earthquake_feed_url: EARTHQUAKE_FEED_URL.to_string(),
            plates_feed_url: TECTONIC_PLATES_URL.to_string(),
            access_token: None,
            control_collapsed: false,
            legend_position: Position::BottomRight,
            tile_cache_size: 512,
        }
    }

    /// Reads the profile and overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like `from_env` with a custom variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = match lookup(ENV_PROFILE) {
            Some(name) => MapProfile::from_name(&name)?,
            None => MapProfile::default(),
        };
        let mut config = profile.resolve();

        config.access_token = lookup(ENV_ACCESS_TOKEN).filter(|token| !token.trim().is_empty());
        if let Some(url) = lookup(ENV_FEED_URL) {
            config.earthquake_feed_url = url;
        }
        if let Some(url) = lookup(ENV_PLATES_URL) {
            config.plates_feed_url = url;
        }

        config.validate()?;
        log::debug!("resolved map config: {:?}", profile);
        Ok(config)
    }

    pub fn has_overlay(&self, kind: OverlayKind) -> bool {
        self.overlays.contains(&kind)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center.is_valid() {
            return Err(Error::Config(format!("invalid map center {:?}", self.center)));
        }
        if !self.zoom.is_finite() || self.zoom < 0.0 {
            return Err(Error::Config(format!("invalid zoom {}", self.zoom)));
        }
        if self.base_layers.is_empty() {
            return Err(Error::Config("at least one base layer is required".to_string()));
        }
        let has_token = self.access_token.as_deref().is_some_and(|t| !t.is_empty());
        if let Some(kind) = self.base_layers.iter().find(|k| k.requires_access_token()) {
            if !has_token {
                return Err(Error::Config(format!(
                    "base layer '{}' needs {}",
                    kind.name(),
                    ENV_ACCESS_TOKEN
                )));
            }
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        MapProfile::default().resolve()
    }
}
