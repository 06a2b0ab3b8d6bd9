pub mod controls;
pub mod elements;

#[cfg(feature = "egui")]
pub mod style;
#[cfg(feature = "egui")]
pub mod widget;

pub use controls::{ControlAction, ControlEntry, LayerControl, Legend, LegendEntry, LEGEND_TITLE};
pub use elements::Position;

#[cfg(feature = "egui")]
use crate::core::map::Map;

#[cfg(feature = "egui")]
pub use style::{AttributionStyle, MapStyle};
#[cfg(feature = "egui")]
pub use widget::MapWidget;

/// Shorthand for painting a map with a widget
#[cfg(feature = "egui")]
pub trait UiMapExt {
    fn quake_map(&mut self, widget: &mut MapWidget, map: &mut Map) -> egui::Response;
}

#[cfg(feature = "egui")]
impl UiMapExt for egui::Ui {
    fn quake_map(&mut self, widget: &mut MapWidget, map: &mut Map) -> egui::Response {
        widget.show(self, map)
    }
}
