use crate::{
    core::geo::{LatLng, LatLngBounds},
    data::{geojson::GeoJson, style::SerializableColor},
    layers::base::{LayerProperties, LayerTrait, LayerType},
};
use serde::{Deserialize, Serialize};

/// Style for line features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Line color
    pub color: SerializableColor,
    /// Line width in pixels
    pub width: f32,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
}

impl LineStyle {
    /// Plate boundaries: solid orange, two pixels wide
    pub fn plate_boundary() -> Self {
        Self {
            color: SerializableColor::rgb(0xFF, 0xA5, 0x00),
            width: 2.0,
            opacity: 1.0,
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::rgb(0x33, 0x88, 0xFF),
            width: 3.0,
            opacity: 1.0,
        }
    }
}

/// Polylines drawn above the base layer, such as tectonic plate boundaries
pub struct PlateBoundaryLayer {
    properties: LayerProperties,
    lines: Vec<Vec<LatLng>>,
    style: LineStyle,
}

impl PlateBoundaryLayer {
    pub fn new(id: String, name: String, lines: Vec<Vec<LatLng>>) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Vector),
            lines,
            style: LineStyle::plate_boundary(),
        }
    }

    /// Collects the line work of every feature. Point features are ignored
    /// and lines with fewer than two vertices are dropped.
    pub fn from_geojson(id: String, name: String, geojson: &GeoJson) -> Self {
        let lines: Vec<Vec<LatLng>> = geojson
            .features()
            .iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .flat_map(|geometry| geometry.line_strings())
            .filter(|line| line.len() >= 2)
            .collect();

        log::debug!(
            "built {} plate boundary lines from {} features",
            lines.len(),
            geojson.features().len()
        );
        Self::new(id, name, lines)
    }

    pub fn lines(&self) -> &[Vec<LatLng>] {
        &self.lines
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }
}

impl LayerTrait for PlateBoundaryLayer {
    crate::impl_layer_trait!(PlateBoundaryLayer, properties);

    crate::impl_options_serialization!(
        properties,
        "lines" => |layer| layer.lines.len(),
        "style" => |layer| layer.style
    );

    fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.lines.iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_layer_from_geojson() {
        let geojson = GeoJson::parse(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"Name": "AF-AN"},
                 "geometry": {"type": "LineString", "coordinates": [[-0.4, -54.8], [0.0, -54.6], [1.2, -54.4]]}},
                {"type": "Feature", "properties": {"Name": "stub"},
                 "geometry": {"type": "LineString", "coordinates": [[10.0, 10.0]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [5.0, 5.0]}}
            ]}"#,
        )
        .unwrap();

        let layer =
            PlateBoundaryLayer::from_geojson("plates".into(), "Tectonic Plates".into(), &geojson);
        assert_eq!(layer.lines().len(), 1);
        assert_eq!(layer.lines()[0].len(), 3);
        assert_eq!(layer.layer_type(), LayerType::Vector);
        assert_eq!(layer.style(), &LineStyle::plate_boundary());

        let bounds = layer.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-54.8, -0.4));
        assert_eq!(bounds.north_east, LatLng::new(-54.4, 1.2));
    }

    #[test]
    fn test_empty_plate_layer_has_no_bounds() {
        let layer = PlateBoundaryLayer::new("plates".into(), "Plates".into(), Vec::new());
        assert!(layer.bounds().is_none());
        assert_eq!(layer.options()["lines"], 0);
    }
}
