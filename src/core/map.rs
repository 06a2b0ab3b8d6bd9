use crate::{
    core::{config::MapConfig, geo::Point, viewport::Viewport},
    layers::{
        base::LayerTrait, earthquake::EarthquakeLayer, manager::LayerManager, tile::TileLayer,
        vector::PlateBoundaryLayer,
    },
    ui::controls::{ControlAction, ControlEntry, Legend, LayerControl},
    Error, Result,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user about how the map was loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.message),
            NoticeLevel::Warning => write!(f, "Warning: {}", self.message),
            NoticeLevel::Error => write!(f, "Error: {}", self.message),
        }
    }
}

/// A composed map: exclusive base layers, independent overlays, controls
/// and the current view. Built by `compose_map` or `load_map`.
pub struct Map {
    config: MapConfig,
    layers: LayerManager,
    base_ids: Vec<String>,
    overlay_ids: Vec<String>,
    active_base: usize,
    viewport: Viewport,
    legend: Legend,
    control_collapsed: bool,
    notices: Vec<Notice>,
}

impl Map {
    /// Assembles a map from built layers. The first base layer is selected;
    /// every overlay starts visible.
    pub(crate) fn assemble(
        config: MapConfig,
        base_layers: Vec<TileLayer>,
        overlays: Vec<Box<dyn LayerTrait>>,
        notices: Vec<Notice>,
    ) -> Result<Self> {
        if base_layers.is_empty() {
            return Err(Error::Layer("a map needs at least one base layer".to_string()));
        }

        let mut layers = LayerManager::new();
        let mut base_ids = Vec::with_capacity(base_layers.len());
        for (index, mut layer) in base_layers.into_iter().enumerate() {
            layer.set_visible(index == 0);
            base_ids.push(layer.id().to_string());
            layers.add_layer(Box::new(layer))?;
        }

        let mut overlay_ids = Vec::with_capacity(overlays.len());
        for mut overlay in overlays {
            overlay.set_visible(true);
            overlay_ids.push(overlay.id().to_string());
            layers.add_layer(overlay)?;
        }

        let mut viewport = Viewport::new(config.center, config.zoom, Point::default());
        if let Some(max_zoom) = layers
            .get_as::<TileLayer>(&base_ids[0])
            .map(|layer| layer.max_zoom())
        {
            viewport.set_zoom_limits(0.0, max_zoom as f64);
        }

        Ok(Self {
            legend: Legend::depth(config.legend_position),
            control_collapsed: config.control_collapsed,
            config,
            layers,
            base_ids,
            overlay_ids,
            active_base: 0,
            viewport,
            notices,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    /// Base layers in control order
    pub fn base_layers(&self) -> Vec<&TileLayer> {
        self.base_ids
            .iter()
            .filter_map(|id| self.layers.get_as::<TileLayer>(id))
            .collect()
    }

    /// Overlays in control order
    pub fn overlays(&self) -> Vec<&dyn LayerTrait> {
        self.overlay_ids
            .iter()
            .filter_map(|id| self.layers.get_layer(id))
            .collect()
    }

    pub fn active_base_layer(&self) -> Option<&TileLayer> {
        self.layers.get_as::<TileLayer>(&self.base_ids[self.active_base])
    }

    /// Shows `id` and hides every other base layer
    pub fn select_base_layer(&mut self, id: &str) -> Result<()> {
        let index = self
            .base_ids
            .iter()
            .position(|base| base == id)
            .ok_or_else(|| Error::Layer(format!("no base layer '{}'", id)))?;

        for (i, base) in self.base_ids.iter().enumerate() {
            if let Some(layer) = self.layers.get_layer_mut(base) {
                layer.set_visible(i == index);
            }
        }
        self.active_base = index;

        if let Some(max_zoom) = self.active_base_layer().map(|layer| layer.max_zoom()) {
            self.viewport.set_zoom_limits(0.0, max_zoom as f64);
        }
        log::info!("base layer switched to '{}'", id);
        Ok(())
    }

    pub fn set_overlay_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        if !self.overlay_ids.iter().any(|overlay| overlay == id) {
            return Err(Error::Layer(format!("no overlay '{}'", id)));
        }
        if let Some(layer) = self.layers.get_layer_mut(id) {
            layer.set_visible(visible);
        }
        log::debug!("overlay '{}' visible: {}", id, visible);
        Ok(())
    }

    /// Flips an overlay and returns its new visibility
    pub fn toggle_overlay(&mut self, id: &str) -> Result<bool> {
        let visible = !self.is_overlay_visible(id);
        self.set_overlay_visible(id, visible)?;
        Ok(visible)
    }

    pub fn is_overlay_visible(&self, id: &str) -> bool {
        self.overlay_ids.iter().any(|overlay| overlay == id)
            && self.layers.get_layer(id).is_some_and(|layer| layer.is_visible())
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Current state of the layer control
    pub fn layer_control(&self) -> LayerControl {
        let entry = |layer: &dyn LayerTrait, active: bool| ControlEntry {
            id: layer.id().to_string(),
            name: layer.name().to_string(),
            active,
        };
        let base_layers = self
            .base_layers()
            .into_iter()
            .enumerate()
            .map(|(i, layer)| entry(layer, i == self.active_base))
            .collect();
        let overlays = self
            .overlays()
            .into_iter()
            .map(|layer| entry(layer, layer.is_visible()))
            .collect();
        LayerControl::new(base_layers, overlays, self.control_collapsed)
    }

    pub fn set_control_collapsed(&mut self, collapsed: bool) {
        self.control_collapsed = collapsed;
    }

    /// Applies a change made through the layer control
    pub fn apply(&mut self, action: ControlAction) -> Result<()> {
        match action {
            ControlAction::SelectBase(id) => self.select_base_layer(&id),
            ControlAction::SetOverlay(id, visible) => self.set_overlay_visible(&id, visible),
            ControlAction::SetCollapsed(collapsed) => {
                self.set_control_collapsed(collapsed);
                Ok(())
            }
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn earthquakes(&self) -> Option<&EarthquakeLayer> {
        self.layers.find_as::<EarthquakeLayer>()
    }

    pub fn plate_boundaries(&self) -> Option<&PlateBoundaryLayer> {
        self.layers.find_as::<PlateBoundaryLayer>()
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("base_layers", &self.base_ids)
            .field("overlays", &self.overlay_ids)
            .field("active_base", &self.base_ids[self.active_base])
            .field("notices", &self.notices)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MapProfile;

    fn basic_map() -> Map {
        let config = MapProfile::Basic.resolve();
        let bases = vec![
            TileLayer::street("street".into(), "Street Map".into()),
            TileLayer::topographic("topographic".into(), "Topographic Map".into()),
        ];
        let quakes = EarthquakeLayer::new("earthquakes".into(), "Earthquakes".into(), Vec::new());
        Map::assemble(config, bases, vec![Box::new(quakes)], Vec::new()).unwrap()
    }

    #[test]
    fn test_first_base_layer_starts_selected() {
        let map = basic_map();
        assert_eq!(map.active_base_layer().unwrap().id(), "street");
        let visible: Vec<bool> = map.base_layers().iter().map(|l| l.is_visible()).collect();
        assert_eq!(visible, vec![true, false]);
        assert!(map.is_overlay_visible("earthquakes"));
        assert_eq!(map.viewport().zoom, 5.0);
    }

    #[test]
    fn test_base_layers_are_exclusive() {
        let mut map = basic_map();
        map.select_base_layer("topographic").unwrap();
        assert_eq!(map.active_base_layer().unwrap().name(), "Topographic Map");
        let visible: Vec<bool> = map.base_layers().iter().map(|l| l.is_visible()).collect();
        assert_eq!(visible, vec![false, true]);
        assert!(map.is_overlay_visible("earthquakes"));

        assert!(map.select_base_layer("earthquakes").is_err());
        assert_eq!(map.active_base_layer().unwrap().id(), "topographic");
    }

    #[test]
    fn test_overlays_toggle_independently() {
        let mut map = basic_map();
        assert!(!map.toggle_overlay("earthquakes").unwrap());
        assert!(!map.is_overlay_visible("earthquakes"));
        assert_eq!(map.active_base_layer().unwrap().id(), "street");
        assert!(map.set_overlay_visible("street", false).is_err());
    }

    #[test]
    fn test_layer_control_reflects_state() {
        let mut map = basic_map();
        map.apply(ControlAction::SetOverlay("earthquakes".into(), false))
            .unwrap();
        map.apply(ControlAction::SelectBase("topographic".into())).unwrap();

        let control = map.layer_control();
        assert!(!control.collapsed);
        assert_eq!(control.selected_base().unwrap().name, "Topographic Map");
        assert_eq!(control.overlays.len(), 1);
        assert!(!control.overlays[0].active);

        map.apply(ControlAction::SetCollapsed(true)).unwrap();
        assert!(map.layer_control().collapsed);
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(Notice::error("feed down").to_string(), "Error: feed down");
        assert_eq!(Notice::warning("2 skipped").to_string(), "Warning: 2 skipped");
    }
}
