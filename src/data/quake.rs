use crate::{
    core::geo::LatLng,
    data::geojson::{GeoJsonFeature, GeoJsonGeometry},
    Error, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_PLACE: &str = "Unknown location";
pub const UNKNOWN_TIME: &str = "Unknown time";

/// One earthquake event taken from a feed feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earthquake {
    pub id: Option<String>,
    pub place: String,
    /// Origin time, epoch milliseconds
    pub time: Option<i64>,
    pub magnitude: f64,
    /// Hypocenter depth in kilometers, negative above sea level
    pub depth: f64,
    pub position: LatLng,
}

impl Earthquake {
    /// Origin time as UTC, when present and representable
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// Human-readable origin time, e.g. `Thu Oct 09 2025 08:53:20 UTC`
    pub fn time_label(&self) -> String {
        self.datetime()
            .map(|time| time.format("%a %b %d %Y %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| UNKNOWN_TIME.to_string())
    }
}

impl TryFrom<&GeoJsonFeature> for Earthquake {
    type Error = Error;

    fn try_from(feature: &GeoJsonFeature) -> Result<Self> {
        let describe = || {
            feature
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "<no id>".to_string())
        };

        let coordinates = match &feature.geometry {
            Some(GeoJsonGeometry::Point { coordinates }) => coordinates,
            Some(_) => {
                return Err(Error::InvalidFeature(format!(
                    "{}: geometry is not a point",
                    describe()
                )))
            }
            None => {
                return Err(Error::InvalidFeature(format!(
                    "{}: missing geometry",
                    describe()
                )))
            }
        };

        let (position, depth) = match coordinates.as_slice() {
            [lng, lat, depth, ..] => (LatLng::new(*lat, *lng), *depth),
            _ => {
                return Err(Error::InvalidFeature(format!(
                    "{}: point has no depth coordinate",
                    describe()
                )))
            }
        };

        let magnitude = feature.property_f64("mag").ok_or_else(|| {
            Error::InvalidFeature(format!("{}: missing magnitude", describe()))
        })?;

        Ok(Self {
            id: feature.id.as_ref().map(|id| match id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            place: feature
                .property_str("place")
                .unwrap_or(UNKNOWN_PLACE)
                .to_string(),
            time: feature.property_i64("time"),
            magnitude,
            depth,
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(properties: serde_json::Value, geometry: serde_json::Value) -> GeoJsonFeature {
        serde_json::from_value(json!({
            "type": "Feature",
            "id": "us7000test",
            "properties": properties,
            "geometry": geometry,
        }))
        .unwrap()
    }

    #[test]
    fn test_extracts_place_time_magnitude_depth() {
        let quake = Earthquake::try_from(&feature(
            json!({"mag": 4.1, "place": "Near the coast of Chile", "time": 0}),
            json!({"type": "Point", "coordinates": [-71.6, -33.0, 35.2]}),
        ))
        .unwrap();

        assert_eq!(quake.id.as_deref(), Some("us7000test"));
        assert_eq!(quake.place, "Near the coast of Chile");
        assert_eq!(quake.magnitude, 4.1);
        assert_eq!(quake.depth, 35.2);
        assert_eq!(quake.position, LatLng::new(-33.0, -71.6));
        assert_eq!(quake.time_label(), "Thu Jan 01 1970 00:00:00 UTC");
    }

    #[test]
    fn test_missing_place_and_time_fall_back() {
        let quake = Earthquake::try_from(&feature(
            json!({"mag": 1.0}),
            json!({"type": "Point", "coordinates": [10.0, 20.0, -1.5]}),
        ))
        .unwrap();

        assert_eq!(quake.place, UNKNOWN_PLACE);
        assert_eq!(quake.time, None);
        assert_eq!(quake.time_label(), UNKNOWN_TIME);
        assert_eq!(quake.depth, -1.5);
    }

    #[test]
    fn test_rejects_unplaceable_features() {
        let no_mag = feature(
            json!({"mag": null, "place": "x"}),
            json!({"type": "Point", "coordinates": [10.0, 20.0, 5.0]}),
        );
        assert!(matches!(
            Earthquake::try_from(&no_mag),
            Err(Error::InvalidFeature(_))
        ));

        let no_depth = feature(
            json!({"mag": 1.0}),
            json!({"type": "Point", "coordinates": [10.0, 20.0]}),
        );
        assert!(Earthquake::try_from(&no_depth).is_err());

        let line = feature(
            json!({"mag": 1.0}),
            json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}),
        );
        assert!(Earthquake::try_from(&line).is_err());

        let no_geometry = feature(json!({"mag": 1.0}), serde_json::Value::Null);
        assert!(Earthquake::try_from(&no_geometry).is_err());
    }
}
