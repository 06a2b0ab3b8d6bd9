pub mod feed;
pub mod geojson;
pub mod quake;
pub mod style;

pub use feed::{FeedSource, FileFeedSource, HttpFeedSource};
pub use geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};
pub use quake::Earthquake;
pub use style::{color_for, radius_for, style_for, DepthBucket, SerializableColor, StyleResult};
