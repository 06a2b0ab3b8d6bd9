use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A GeoJSON position: `[lng, lat]` or `[lng, lat, elevation]`.
/// USGS feeds put the hypocenter depth (km) in the third slot.
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

/// Root of a feed document: a single feature or a feature collection.
/// Foreign members such as USGS `metadata` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    /// Parses a GeoJSON document.
    pub fn parse(geojson_str: &str) -> crate::Result<Self> {
        serde_json::from_str(geojson_str)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    /// Features in document order
    pub fn features(&self) -> &[GeoJsonFeature] {
        match self {
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
            GeoJson::FeatureCollection { features } => features,
        }
    }

    /// Bounding box of every feature geometry
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.features()
            .iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .filter_map(GeoJsonGeometry::bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
    }
}

impl GeoJsonFeature {
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref()?.get(key)
    }

    /// String property; `None` when absent, null, or not a string.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key)?.as_str()
    }

    /// Numeric property; `None` when absent, null, or not a number.
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.property(key)?.as_f64()
    }

    /// Integer property, accepting integral floats such as `1.7e12`.
    pub fn property_i64(&self, key: &str) -> Option<i64> {
        let value = self.property(key)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
    }
}

impl GeoJsonGeometry {
    /// Converts every position to a LatLng, dropping malformed positions
    pub fn to_lat_lng_points(&self) -> Vec<LatLng> {
        let mut points = Vec::new();
        self.visit_positions(&mut |position| {
            if let Some(point) = LatLng::from_position(position) {
                points.push(point);
            }
        });
        points
    }

    /// Line work contained in this geometry: line strings, polygon rings,
    /// recursively through collections. Points contribute nothing.
    pub fn line_strings(&self) -> Vec<Vec<LatLng>> {
        fn to_line(positions: &[Position]) -> Vec<LatLng> {
            positions
                .iter()
                .filter_map(|position| LatLng::from_position(position))
                .collect()
        }

        match self {
            GeoJsonGeometry::Point { .. } | GeoJsonGeometry::MultiPoint { .. } => Vec::new(),
            GeoJsonGeometry::LineString { coordinates } => vec![to_line(coordinates)],
            GeoJsonGeometry::MultiLineString { coordinates }
            | GeoJsonGeometry::Polygon { coordinates } => {
                coordinates.iter().map(|line| to_line(line)).collect()
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flatten()
                .map(|ring| to_line(ring))
                .collect(),
            GeoJsonGeometry::GeometryCollection { geometries } => geometries
                .iter()
                .flat_map(GeoJsonGeometry::line_strings)
                .collect(),
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        let points = self.to_lat_lng_points();
        LatLngBounds::from_points(points.iter())
    }

    fn visit_positions(&self, visit: &mut dyn FnMut(&[f64])) {
        match self {
            GeoJsonGeometry::Point { coordinates } => visit(coordinates),
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => {
                coordinates.iter().for_each(|position| visit(position))
            }
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => coordinates
                .iter()
                .flatten()
                .for_each(|position| visit(position)),
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flatten()
                .flatten()
                .for_each(|position| visit(position)),
            GeoJsonGeometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.visit_positions(visit);
                }
            }
        }
    }
}
