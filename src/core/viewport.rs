use crate::core::{
    constants::{MAX_ZOOM, TILE_SIZE},
    geo::{LatLng, LatLngBounds, Point, TileCoord, EARTH_RADIUS, MAX_LATITUDE},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center: Self::clamp_center(center),
            zoom: zoom.clamp(0.0, MAX_ZOOM as f64),
            size,
            min_zoom: 0.0,
            max_zoom: MAX_ZOOM as f64,
        }
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = Self::clamp_center(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Width of the whole world in pixels at the given zoom
    pub fn world_size(zoom: f64) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(zoom)
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = Self::world_size(zoom.unwrap_or(self.zoom));
        let lat = LatLng::clamp_lat(lat_lng.lat).to_radians();

        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * scale;

        Point::new(x, y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = Self::world_size(zoom.unwrap_or(self.zoom));

        let lng = pixel.x / scale * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pixel.y / scale);
        let lat = n.sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts a geographical coordinate to container pixel coordinates
    /// (origin at the top-left corner of the viewport)
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let center = self.project(&self.center, None);
        let point = self.project(lat_lng, None);
        Point::new(
            point.x - center.x + self.size.x / 2.0,
            point.y - center.y + self.size.y / 2.0,
        )
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let center = self.project(&self.center, None);
        let world = Point::new(
            pixel.x + center.x - self.size.x / 2.0,
            pixel.y + center.y - self.size.y / 2.0,
        );
        self.unproject(&world, None)
    }

    /// Ground resolution in meters per pixel at the given latitude
    pub fn meters_per_pixel(&self, lat: f64) -> f64 {
        2.0 * PI * EARTH_RADIUS * LatLng::clamp_lat(lat).to_radians().cos()
            / Self::world_size(self.zoom)
    }

    /// Pans the viewport by the given pixel offset; positive x moves the view east
    pub fn pan(&mut self, delta: Point) {
        let center = self.project(&self.center, None);
        let moved = center.add(&delta);
        let lat_lng = self.unproject(&moved, None);
        self.set_center(LatLng::new(lat_lng.lat, LatLng::wrap_lng(lat_lng.lng)));
    }

    /// Zooms around a container point, keeping the geographic location under it fixed
    pub fn zoom_around(&mut self, zoom: f64, focus: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus {
            Some(focus) => {
                let anchor = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;
                let drift = self.lat_lng_to_pixel(&anchor).subtract(&focus);
                self.pan(drift);
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Geographic bounds currently visible
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&self.size);
        LatLngBounds::from_coords(se.lat, nw.lng, nw.lat, se.lng)
    }

    /// Integer zoom used to pick tiles
    pub fn tile_zoom(&self, max_zoom: u8) -> u8 {
        self.zoom.round().clamp(0.0, max_zoom as f64) as u8
    }

    /// Tiles covering the viewport at `zoom`, paired with their container-space
    /// top-left corner and edge length in pixels. Horizontal wrap is resolved to
    /// the canonical tile index.
    pub fn visible_tiles(&self, zoom: u8) -> Vec<(TileCoord, Point, f64)> {
        let tile_px = TILE_SIZE as f64 * 2_f64.powf(self.zoom - zoom as f64);
        let world_tiles = TileCoord::tiles_per_axis(zoom) as i64;

        let center = self.project(&self.center, None);
        let left = center.x - self.size.x / 2.0;
        let top = center.y - self.size.y / 2.0;

        let x_min = (left / tile_px).floor() as i64;
        let x_max = ((left + self.size.x) / tile_px).ceil() as i64 - 1;
        let y_min = ((top / tile_px).floor() as i64).max(0);
        let y_max = (((top + self.size.y) / tile_px).ceil() as i64 - 1).min(world_tiles - 1);

        let mut tiles = Vec::new();
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let wrapped = x.rem_euclid(world_tiles) as u32;
                let corner = Point::new(x as f64 * tile_px - left, y as f64 * tile_px - top);
                tiles.push((TileCoord::new(wrapped, y as u32, zoom), corner, tile_px));
            }
        }
        tiles
    }

    fn clamp_center(center: LatLng) -> LatLng {
        LatLng::new(center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), center.lng)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::default(), 1.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(37.09, -95.71), 5.0, Point::new(800.0, 600.0));
        assert_eq!(viewport.zoom, 5.0);
        assert_eq!(viewport.size, Point::new(800.0, 600.0));
    }

    #[test]
    fn test_center_projects_to_container_middle() {
        let viewport = Viewport::new(LatLng::new(37.09, -95.71), 5.0, Point::new(800.0, 600.0));
        let pixel = viewport.lat_lng_to_pixel(&viewport.center);
        assert!((pixel.x - 400.0).abs() < 1e-6);
        assert!((pixel.y - 300.0).abs() < 1e-6);

        let back = viewport.pixel_to_lat_lng(&Point::new(120.0, 45.0));
        let again = viewport.lat_lng_to_pixel(&back);
        assert!((again.x - 120.0).abs() < 1e-4);
        assert!((again.y - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 10.0);
        viewport.set_zoom(15.0);
        assert_eq!(viewport.zoom, 10.0);
        viewport.set_zoom(-1.0);
        assert_eq!(viewport.zoom, 2.0);
    }

    #[test]
    fn test_meters_per_pixel_at_equator() {
        let viewport = Viewport::new(LatLng::default(), 0.0, Point::new(256.0, 256.0));
        let expected = 2.0 * PI * EARTH_RADIUS / 256.0;
        assert!((viewport.meters_per_pixel(0.0) - expected).abs() < 1e-6);
        assert!(viewport.meters_per_pixel(60.0) < expected);
    }

    #[test]
    fn test_zoom_around_keeps_focus_fixed() {
        let mut viewport = Viewport::new(LatLng::new(10.0, 20.0), 4.0, Point::new(800.0, 600.0));
        let focus = Point::new(200.0, 150.0);
        let anchor = viewport.pixel_to_lat_lng(&focus);
        viewport.zoom_around(6.0, Some(focus));
        let pixel = viewport.lat_lng_to_pixel(&anchor);
        assert!((pixel.x - focus.x).abs() < 1e-4);
        assert!((pixel.y - focus.y).abs() < 1e-4);
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let viewport = Viewport::new(LatLng::default(), 1.0, Point::new(512.0, 512.0));
        let tiles = viewport.visible_tiles(1);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|(coord, _, size)| coord.is_valid() && *size == 256.0));
    }
}
