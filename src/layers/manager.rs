use crate::{
    layers::base::{LayerTrait, LayerType},
    prelude::HashMap,
    Error, Result,
};

/// Owns every layer of a map and keeps them ordered by z-index
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Layer IDs in draw order, lowest z-index first
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer. IDs are unique; a duplicate is rejected.
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(Error::Layer(format!("duplicate layer id '{}'", layer_id)));
        }
        let z_index = layer.z_index();
        self.layers.insert(layer_id.clone(), layer);

        // Equal z-indices keep insertion order
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    pub fn get_layer_mut(&mut self, layer_id: &str) -> Option<&mut dyn LayerTrait> {
        match self.layers.get_mut(layer_id) {
            Some(layer) => Some(layer.as_mut()),
            None => None,
        }
    }

    /// Downcasts a layer to its concrete type
    pub fn get_as<T: 'static>(&self, layer_id: &str) -> Option<&T> {
        self.get_layer(layer_id)?.as_any().downcast_ref::<T>()
    }

    /// First layer of the given concrete type in draw order
    pub fn find_as<T: 'static>(&self) -> Option<&T> {
        self.layers()
            .into_iter()
            .find_map(|layer| layer.as_any().downcast_ref::<T>())
    }

    pub fn contains(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    /// All layers in draw order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Visible layers of one type, in draw order
    pub fn visible_layers_of(&self, layer_type: LayerType) -> Vec<&dyn LayerTrait> {
        self.layers()
            .into_iter()
            .filter(|layer| layer.is_visible() && layer.layer_type() == layer_type)
            .collect()
    }

    /// Re-sorts after z-indices changed
    pub fn update_render_order(&mut self) {
        let layers = &self.layers;
        self.render_order
            .sort_by_key(|id| layers.get(id).map(|l| l.z_index()).unwrap_or(0));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{earthquake::EarthquakeLayer, tile::TileLayer, vector::PlateBoundaryLayer};

    fn manager() -> LayerManager {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(EarthquakeLayer::new(
                "quakes".into(),
                "Earthquakes".into(),
                Vec::new(),
            )))
            .unwrap();
        manager
            .add_layer(Box::new(TileLayer::street("street".into(), "Street Map".into())))
            .unwrap();
        manager
            .add_layer(Box::new(PlateBoundaryLayer::new(
                "plates".into(),
                "Plates".into(),
                Vec::new(),
            )))
            .unwrap();
        manager
    }

    #[test]
    fn test_layers_are_ordered_by_z_index() {
        let manager = manager();
        let ids: Vec<&str> = manager.layers().iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["street", "plates", "quakes"]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut manager = manager();
        let topo = TileLayer::topographic("street".into(), "Topo".into());
        let result = manager.add_layer(Box::new(topo));
        assert!(matches!(result, Err(Error::Layer(_))));
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn test_downcast_and_reorder() {
        let mut manager = manager();
        assert!(manager.get_as::<TileLayer>("street").is_some());
        assert!(manager.get_as::<TileLayer>("quakes").is_none());
        assert!(manager.find_as::<PlateBoundaryLayer>().is_some());

        manager.get_layer_mut("street").unwrap().set_z_index(100);
        manager.update_render_order();
        assert_eq!(manager.layers().last().unwrap().id(), "street");

        manager.get_layer_mut("plates").unwrap().set_visible(false);
        assert!(manager.visible_layers_of(LayerType::Vector).is_empty());
        assert!(manager.remove_layer("plates").is_some());
        assert!(!manager.contains("plates"));
    }
}
