use crate::{
    core::{geo::LatLng, viewport::Viewport},
    data::style::{SerializableColor, StyleResult},
};
use serde::{Deserialize, Serialize};

/// Outline width in pixels, matching the usual web map default
pub const DEFAULT_STROKE_WEIGHT: f32 = 3.0;

/// Text attached to a marker, shown when it is hovered or selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub body: String,
}

impl Popup {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Title and body on separate lines
    pub fn text(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }
}

/// A geographic circle: radius in meters, so it scales with zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMarker {
    pub position: LatLng,
    /// Radius in meters. May be zero or negative; such circles are not drawn.
    pub radius: f64,
    /// Outline color
    pub color: SerializableColor,
    /// Outline width in pixels
    pub weight: f32,
    pub fill_color: SerializableColor,
    pub fill_opacity: f32,
    pub popup: Option<Popup>,
}

impl CircleMarker {
    pub fn new(position: LatLng, radius: f64, color: SerializableColor) -> Self {
        Self {
            position,
            radius,
            color,
            weight: DEFAULT_STROKE_WEIGHT,
            fill_color: color,
            fill_opacity: 1.0,
            popup: None,
        }
    }

    /// Circle drawn with a computed style, stroke and fill sharing the color
    pub fn styled(position: LatLng, style: StyleResult) -> Self {
        Self::new(position, style.radius, style.color)
    }

    pub fn with_fill_opacity(mut self, fill_opacity: f32) -> Self {
        self.fill_opacity = fill_opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Whether the renderer should draw this circle at all
    pub fn is_drawable(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }

    /// Radius on screen at the viewport's zoom, measured at the marker's latitude
    pub fn pixel_radius(&self, viewport: &Viewport) -> f64 {
        self.radius / viewport.meters_per_pixel(self.position.lat)
    }

    pub fn style(&self) -> StyleResult {
        StyleResult {
            radius: self.radius,
            color: self.fill_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::style::palette;

    #[test]
    fn test_styled_marker_copies_style() {
        let style = StyleResult {
            radius: 30_000.0,
            color: palette::DEPTH_10_20,
        };
        let marker = CircleMarker::styled(LatLng::new(1.0, 2.0), style)
            .with_popup(Popup::new("Somewhere", "Sometime"));

        assert_eq!(marker.style(), style);
        assert_eq!(marker.color, marker.fill_color);
        assert_eq!(marker.fill_opacity, 1.0);
        assert_eq!(marker.weight, DEFAULT_STROKE_WEIGHT);
        assert_eq!(marker.popup.unwrap().text(), "Somewhere\nSometime");
    }

    #[test]
    fn test_pixel_radius_scales_with_zoom() {
        let marker = CircleMarker::new(LatLng::new(0.0, 0.0), 30_000.0, palette::DEPTH_0_5);
        let mut viewport = Viewport::default();
        viewport.set_zoom(5.0);
        let at_five = marker.pixel_radius(&viewport);
        viewport.set_zoom(6.0);
        let at_six = marker.pixel_radius(&viewport);

        assert!((at_six / at_five - 2.0).abs() < 1e-9);
        // roughly 4.9 km per pixel at the equator on zoom 5
        assert!((at_five - 30_000.0 / 4891.97).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_radii_are_not_drawable() {
        let color = palette::DEPTH_0_5;
        assert!(!CircleMarker::new(LatLng::default(), 0.0, color).is_drawable());
        assert!(!CircleMarker::new(LatLng::default(), -5.0, color).is_drawable());
        assert!(!CircleMarker::new(LatLng::default(), f64::NAN, color).is_drawable());
        assert!(CircleMarker::new(LatLng::default(), 1.0, color).is_drawable());
    }
}
