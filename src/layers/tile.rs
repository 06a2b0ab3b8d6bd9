use crate::{
    core::{
        constants::{MAX_ZOOM, TILE_SIZE},
        geo::TileCoord,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    tiles::source::TileSource,
    Error, Result,
};

const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
const TOPO_ATTRIBUTION: &str =
    "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)";
const MAPBOX_ATTRIBUTION: &str = "© Mapbox © OpenStreetMap contributors";
const MAPBOX_TEMPLATE: &str =
    "https://api.mapbox.com/styles/v1/mapbox/{style}/tiles/256/{z}/{x}/{y}?access_token={accessToken}";

/// Configuration for a tile layer
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TileLayerOptions {
    /// URL template, e.g. `https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`.
    /// `{accessToken}` is substituted from `access_token`.
    pub url_template: String,
    /// Available subdomains for load balancing
    pub subdomains: Vec<String>,
    /// Attribution text
    pub attribution: String,
    /// Tile size in pixels
    pub tile_size: u32,
    /// Maximum zoom level for this tile source
    pub max_zoom: u8,
    /// Minimum zoom level for this tile source
    pub min_zoom: u8,
    /// Provider access token, required when the template names one
    pub access_token: Option<String>,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: OSM_ATTRIBUTION.to_string(),
            tile_size: TILE_SIZE,
            max_zoom: MAX_ZOOM,
            min_zoom: 0,
            access_token: None,
        }
    }
}

impl TileLayerOptions {
    fn mapbox(style: &str, access_token: &str) -> Self {
        Self {
            url_template: MAPBOX_TEMPLATE.replace("{style}", style),
            subdomains: Vec::new(),
            attribution: MAPBOX_ATTRIBUTION.to_string(),
            access_token: Some(access_token.to_string()),
            ..Self::default()
        }
    }

    pub fn requires_access_token(&self) -> bool {
        self.url_template.contains("{accessToken}")
    }
}

/// A raster tile base layer
pub struct TileLayer {
    /// Base layer properties
    properties: LayerProperties,
    /// Tile layer specific options
    options: TileLayerOptions,
}

impl TileLayer {
    /// Create a tile layer; fails when the template needs a token and none is set
    pub fn with_options(id: String, name: String, options: TileLayerOptions) -> Result<Self> {
        if options.requires_access_token()
            && options.access_token.as_deref().map_or(true, str::is_empty)
        {
            return Err(Error::Config(format!(
                "tile layer '{}' needs an access token",
                name
            )));
        }
        Ok(Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            options,
        })
    }

    /// OpenStreetMap standard tiles
    pub fn street(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            options: TileLayerOptions::default(),
        }
    }

    /// OpenTopoMap topographic tiles
    pub fn topographic(id: String, name: String) -> Self {
        let options = TileLayerOptions {
            url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png".to_string(),
            attribution: TOPO_ATTRIBUTION.to_string(),
            max_zoom: 17,
            ..TileLayerOptions::default()
        };
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            options,
        }
    }

    /// Mapbox satellite imagery
    pub fn satellite(id: String, name: String, access_token: &str) -> Result<Self> {
        Self::with_options(id, name, TileLayerOptions::mapbox("satellite-v9", access_token))
    }

    /// Mapbox light style, used as a grayscale background
    pub fn grayscale(id: String, name: String, access_token: &str) -> Result<Self> {
        Self::with_options(id, name, TileLayerOptions::mapbox("light-v10", access_token))
    }

    /// Mapbox outdoors style
    pub fn outdoors(id: String, name: String, access_token: &str) -> Result<Self> {
        Self::with_options(id, name, TileLayerOptions::mapbox("outdoors-v11", access_token))
    }

    pub fn attribution(&self) -> &str {
        &self.options.attribution
    }

    pub fn max_zoom(&self) -> u8 {
        self.options.max_zoom
    }
}

impl TileSource for TileLayer {
    fn url(&self, coord: TileCoord) -> String {
        let subdomain = if self.options.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.options.subdomains.len() as u32) as usize;
            self.options.subdomains[idx].as_str()
        };

        self.options
            .url_template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace(
                "{accessToken}",
                self.options.access_token.as_deref().unwrap_or_default(),
            )
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    crate::impl_options_serialization!(
        properties,
        "url_template" => |layer| layer.options.url_template,
        "attribution" => |layer| layer.options.attribution,
        "max_zoom" => |layer| layer.options.max_zoom
    );
}
