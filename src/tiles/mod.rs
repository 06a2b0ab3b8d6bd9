pub mod cache;
pub mod loader;
pub mod source;

pub use cache::TileCache;
pub use loader::{fetch_tile, TileLoader, TileResult};
pub use source::{TemplateSource, TileSource};
