pub mod base;
pub mod earthquake;
pub mod macros;
pub mod manager;
pub mod marker;
pub mod tile;
pub mod vector;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use earthquake::{render_earthquake, EarthquakeLayer};
pub use manager::LayerManager;
pub use marker::{CircleMarker, Popup};
pub use tile::{TileLayer, TileLayerOptions};
pub use vector::{LineStyle, PlateBoundaryLayer};
