//! egui widget that paints a composed [`Map`].
//!
//! Tiles of the selected base layer are downloaded in the background and
//! decoded into textures on the UI thread. Plate boundaries and earthquake
//! circles are painted on top, followed by the layer control, the legend,
//! notices and the attribution line.

use crate::{
    core::{
        geo::{Point, TileCoord},
        map::Map,
    },
    layers::{base::LayerTrait, marker::CircleMarker},
    prelude::HashMap,
    tiles::{TileCache, TileLoader},
    traits::UiRenderable,
    ui::style::MapStyle,
};
use egui::{
    epaint::CircleShape, Color32, ColorImage, Context, Painter, Pos2, Rect, Response, Sense,
    Shape, Stroke, TextureHandle, TextureOptions, Ui, Vec2,
};
use lru::LruCache;
use std::{num::NonZeroUsize, time::Duration};

/// Zoom change per pixel of scroll
const SCROLL_ZOOM_RATE: f64 = 0.002;
const TEXTURE_CAPACITY: usize = 256;

/// Decodes PNG/JPEG tile bytes into an egui image
pub fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let image = image::load_from_memory(bytes).ok()?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

fn to_pos(rect: Rect, point: Point) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

/// Circle for one marker: outlined and filled in the marker's own colors,
/// both scaled by the layer opacity.
pub fn marker_shape(
    marker: &CircleMarker,
    center: Pos2,
    radius: f32,
    opacity: f32,
) -> CircleShape {
    let fill = marker.fill_color.with_alpha(marker.fill_opacity * opacity);
    let outline = marker.color.with_alpha(opacity);
    CircleShape {
        center,
        radius,
        fill: Color32::from(fill),
        stroke: Stroke::new(marker.weight, Color32::from(outline)),
    }
}

/// Downloaded bytes and in-flight requests for one base layer
struct TileStore {
    cache: TileCache,
    loader: TileLoader,
}

pub struct MapWidget {
    stores: HashMap<String, TileStore>,
    textures: LruCache<(String, TileCoord), TextureHandle>,
    style: MapStyle,
    tile_cache_size: usize,
    interactive: bool,
    load_tiles: bool,
}

impl MapWidget {
    /// `tile_cache_size` bounds the downloaded tiles kept per base layer
    pub fn new(tile_cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(TEXTURE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            stores: HashMap::default(),
            textures: LruCache::new(capacity),
            style: MapStyle::default(),
            tile_cache_size,
            interactive: true,
            load_tiles: true,
        }
    }

    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// With loading off, missing tiles are painted as placeholders and never
    /// requested.
    pub fn load_tiles(mut self, load_tiles: bool) -> Self {
        self.load_tiles = load_tiles;
        self
    }

    /// Tile downloads still in flight across all base layers
    pub fn pending_tiles(&self) -> usize {
        self.stores.values().map(|store| store.loader.pending_count()).sum()
    }

    /// Paints `map` into all available space and applies pan, zoom and
    /// layer control interaction to it.
    pub fn show(&mut self, ui: &mut Ui, map: &mut Map) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        map.viewport_mut()
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        if self.interactive {
            self.handle_input(ui, &response, rect, map);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.style.background_color);

        self.paint_tiles(ui.ctx(), &painter, rect, map);
        self.paint_plates(&painter, rect, map);
        self.paint_earthquakes(&painter, rect, map);
        let response = self.show_popup(ui, response, rect, map);

        self.show_controls(ui, rect, map);
        self.paint_notices(&painter, rect, map);
        self.paint_attribution(&painter, rect, map);
        response
    }

    fn handle_input(&self, ui: &Ui, response: &Response, rect: Rect, map: &mut Map) {
        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                map.viewport_mut()
                    .pan(Point::new(-delta.x as f64, -delta.y as f64));
            }
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                let focus = ui.input(|i| i.pointer.hover_pos()).map(|pos| {
                    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
                });
                let viewport = map.viewport_mut();
                let zoom = viewport.zoom + scroll as f64 * SCROLL_ZOOM_RATE;
                viewport.zoom_around(zoom, focus);
            }
        }
    }

    fn paint_tiles(&mut self, ctx: &Context, painter: &Painter, rect: Rect, map: &Map) {
        let Some(layer) = map.active_base_layer() else {
            return;
        };
        let layer_id = layer.id().to_string();
        let cache_size = self.tile_cache_size;
        let store = self
            .stores
            .entry(layer_id.clone())
            .or_insert_with(|| TileStore {
                cache: TileCache::new(cache_size),
                loader: TileLoader::new(),
            });

        for result in store.loader.poll() {
            if let Ok(data) = result.data {
                store.cache.insert(result.coord, data);
            }
        }

        let viewport = map.viewport();
        let zoom = viewport.tile_zoom(layer.max_zoom());
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

        for (coord, corner, size) in viewport.visible_tiles(zoom) {
            let min = to_pos(rect, corner);
            let tile_rect = Rect::from_min_size(min, Vec2::splat(size as f32));
            let key = (layer_id.clone(), coord);

            if let Some(texture) = self.textures.get(&key) {
                painter.image(texture.id(), tile_rect, uv, Color32::WHITE);
                continue;
            }

            match store.cache.get(&coord).and_then(|bytes| decode_tile(&bytes)) {
                Some(image) => {
                    let name = format!("tile_{}_{}_{}_{}", layer_id, coord.z, coord.x, coord.y);
                    let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
                    painter.image(texture.id(), tile_rect, uv, Color32::WHITE);
                    self.textures.put(key, texture);
                }
                None => {
                    painter.rect_filled(tile_rect, 0.0, self.style.missing_tile_color);
                    if self.load_tiles && !store.cache.contains(&coord) {
                        store.loader.request(layer, coord);
                    }
                }
            }
        }

        if store.loader.pending_count() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn paint_plates(&self, painter: &Painter, rect: Rect, map: &Map) {
        let Some(plates) = map.plate_boundaries().filter(|layer| layer.is_visible()) else {
            return;
        };
        let style = plates.style();
        let color = Color32::from(style.color.with_alpha(style.opacity * plates.opacity()));
        let stroke = Stroke::new(style.width, color);
        let viewport = map.viewport();

        for line in plates.lines() {
            let points: Vec<Pos2> = line
                .iter()
                .map(|lat_lng| to_pos(rect, viewport.lat_lng_to_pixel(lat_lng)))
                .collect();
            painter.add(Shape::line(points, stroke));
        }
    }

    fn paint_earthquakes(&self, painter: &Painter, rect: Rect, map: &Map) {
        let Some(quakes) = map.earthquakes().filter(|layer| layer.is_visible()) else {
            return;
        };
        let viewport = map.viewport();

        // painted in feed order so later quakes sit on top, matching hit testing
        for marker in quakes.markers().iter().filter(|m| m.is_drawable()) {
            let center = to_pos(rect, viewport.lat_lng_to_pixel(&marker.position));
            let radius = marker.pixel_radius(viewport) as f32;
            painter.add(marker_shape(marker, center, radius, quakes.opacity()));
        }
    }

    fn show_popup(&self, ui: &Ui, response: Response, rect: Rect, map: &Map) -> Response {
        let Some(quakes) = map.earthquakes().filter(|layer| layer.is_visible()) else {
            return response;
        };
        let Some(pointer) = response.hover_pos() else {
            return response;
        };
        let pixel = Point::new((pointer.x - rect.min.x) as f64, (pointer.y - rect.min.y) as f64);
        let hit = quakes
            .marker_at(map.viewport(), pixel, self.style.hover_tolerance as f64)
            .and_then(|marker| marker.popup.clone());

        match hit {
            Some(popup) => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                response.on_hover_ui_at_pointer(|ui| {
                    ui.strong(popup.title);
                    ui.separator();
                    ui.label(popup.body);
                })
            }
            None => response,
        }
    }

    fn show_controls(&self, ui: &mut Ui, rect: Rect, map: &mut Map) {
        let mut control = map.layer_control();
        let control_rect = control.anchored_rect(rect);
        control.render(ui, control_rect);
        if let Some(action) = control.take_action() {
            if let Err(e) = map.apply(action) {
                log::warn!("layer control: {}", e);
            }
        }

        let mut legend = map.legend().clone();
        if legend.is_visible() {
            let legend_rect = legend.anchored_rect(rect);
            legend.render(ui, legend_rect);
        }
    }

    fn paint_notices(&self, painter: &Painter, rect: Rect, map: &Map) {
        let mut y = rect.min.y + 10.0;
        for notice in map.notices() {
            let galley = painter.layout_no_wrap(
                notice.to_string(),
                self.style.notice_font.clone(),
                Color32::WHITE,
            );
            let text_rect =
                Rect::from_min_size(Pos2::new(rect.min.x + 10.0, y), galley.size()).expand(4.0);
            painter.rect_filled(text_rect, 3.0, self.style.notice_color(notice.level));
            painter.galley(text_rect.min + Vec2::splat(4.0), galley, Color32::WHITE);
            y = text_rect.max.y + 6.0;
        }
    }

    fn paint_attribution(&self, painter: &Painter, rect: Rect, map: &Map) {
        let Some(layer) = map.active_base_layer() else {
            return;
        };
        let style = &self.style.attribution;
        let galley = painter.layout_no_wrap(
            layer.attribution().to_string(),
            style.font_id.clone(),
            style.text_color,
        );
        let min = Pos2::new(
            rect.min.x + style.padding,
            rect.max.y - galley.size().y - 2.0 * style.padding,
        );
        let background = Rect::from_min_size(min, galley.size() + Vec2::splat(2.0 * style.padding));
        painter.rect_filled(background, 0.0, style.background_color);
        painter.galley(min + Vec2::splat(style.padding), galley, style.text_color);
    }
}

impl Default for MapWidget {
    fn default() -> Self {
        Self::new(512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::style::palette;

    #[test]
    fn test_decode_tile_rejects_garbage() {
        assert!(decode_tile(&[]).is_none());
        assert!(decode_tile(&[0u8; 10]).is_none());
    }

    #[test]
    fn test_decode_tile_png() {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(4, 2))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = decode_tile(&bytes).unwrap();
        assert_eq!(decoded.size, [4, 2]);
    }

    #[test]
    fn test_marker_shape_uses_marker_colors() {
        let marker = crate::layers::earthquake::render_earthquake(&crate::Earthquake {
            id: None,
            place: "Ridgecrest, CA".to_string(),
            time: None,
            magnitude: 2.5,
            depth: 15.0,
            position: crate::LatLng::new(35.7, -117.6),
        });
        let shape = marker_shape(&marker, Pos2::new(5.0, 5.0), 8.0, 1.0);

        let depth_color = Color32::from(palette::DEPTH_10_20);
        assert_eq!(shape.stroke.color, depth_color);
        assert_eq!(shape.stroke.width, 3.0);
        assert_eq!(shape.fill, depth_color);
        assert_eq!(shape.radius, 8.0);
    }

    #[test]
    fn test_marker_shape_fades_with_layer_opacity() {
        let position = crate::LatLng::new(0.0, 0.0);
        let marker = CircleMarker::new(position, 10_000.0, palette::DEPTH_60_PLUS);
        let shape = marker_shape(&marker, Pos2::ZERO, 4.0, 0.5);
        assert_eq!(shape.stroke.color.a(), 128);
        assert_eq!(shape.fill.a(), 128);
    }

    #[test]
    fn test_to_pos_offsets_by_rect() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(100.0, 100.0));
        assert_eq!(to_pos(rect, Point::new(5.0, 5.0)), Pos2::new(15.0, 25.0));
    }
}
