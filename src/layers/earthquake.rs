//! Earthquake overlay: one styled circle per feed feature.

use crate::{
    core::{
        constants::MARKER_FILL_OPACITY,
        geo::{LatLngBounds, Point},
        viewport::Viewport,
    },
    data::{geojson::GeoJson, quake::Earthquake, style::style_for},
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        marker::{CircleMarker, Popup},
    },
};

/// Builds the marker for one earthquake: radius from magnitude, color from
/// depth, full opacity, and a popup naming the place and time.
pub fn render_earthquake(quake: &Earthquake) -> CircleMarker {
    CircleMarker::styled(quake.position, style_for(quake.magnitude, quake.depth))
        .with_fill_opacity(MARKER_FILL_OPACITY)
        .with_popup(Popup::new(quake.place.clone(), quake.time_label()))
}

pub struct EarthquakeLayer {
    properties: LayerProperties,
    quakes: Vec<Earthquake>,
    markers: Vec<CircleMarker>,
    skipped: usize,
}

impl EarthquakeLayer {
    pub fn new(id: String, name: String, quakes: Vec<Earthquake>) -> Self {
        let markers = quakes.iter().map(render_earthquake).collect();
        Self {
            properties: LayerProperties::new(id, name, LayerType::Marker),
            quakes,
            markers,
            skipped: 0,
        }
    }

    /// Renders every feature of a feed. Features that cannot be placed or
    /// sized are skipped and counted.
    pub fn from_geojson(id: String, name: String, geojson: &GeoJson) -> Self {
        let mut quakes = Vec::with_capacity(geojson.features().len());
        let mut skipped = 0;

        for feature in geojson.features() {
            match Earthquake::try_from(feature) {
                Ok(quake) => quakes.push(quake),
                Err(e) => {
                    log::warn!("skipping earthquake feature: {}", e);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::warn!(
                "{} of {} earthquake features were malformed",
                skipped,
                geojson.features().len()
            );
        }
        log::debug!("rendered {} earthquake markers", quakes.len());

        let mut layer = Self::new(id, name, quakes);
        layer.skipped = skipped;
        layer
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn earthquakes(&self) -> &[Earthquake] {
        &self.quakes
    }

    /// Number of feed features that could not be rendered
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Topmost drawable marker under a container pixel. Circles smaller than
    /// `min_pixels` are hit-tested as if they had that radius.
    pub fn marker_at(
        &self,
        viewport: &Viewport,
        pixel: Point,
        min_pixels: f64,
    ) -> Option<&CircleMarker> {
        self.markers
            .iter()
            .rev()
            .filter(|marker| marker.is_drawable())
            .find(|marker| {
                let center = viewport.lat_lng_to_pixel(&marker.position);
                center.distance_to(&pixel) <= marker.pixel_radius(viewport).max(min_pixels)
            })
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl LayerTrait for EarthquakeLayer {
    crate::impl_layer_trait!(EarthquakeLayer, properties);

    crate::impl_options_serialization!(
        properties,
        "markers" => |layer| layer.markers.len(),
        "skipped" => |layer| layer.skipped
    );

    fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.markers.iter().map(|marker| &marker.position))
    }
}
