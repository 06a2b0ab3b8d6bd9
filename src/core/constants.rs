//! Core constants: feed endpoints, the default view and web-map conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// USGS summary feed of every earthquake in the past week.
pub const EARTHQUAKE_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// PB2002 plate boundary model as GeoJSON line strings.
pub const TECTONIC_PLATES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Initial map center (continental United States).
pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 5.0;

/// Meters of circle radius per unit of magnitude.
pub const RADIUS_SCALE: f64 = 12_000.0;

/// Every earthquake marker is drawn fully opaque.
pub const MARKER_FILL_OPACITY: f32 = 1.0;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom any bundled tile provider serves.
pub const MAX_ZOOM: u8 = 18;

/// User-Agent sent with every request; public tile servers reject anonymous clients.
pub const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));
