#![cfg(feature = "egui")]

use egui::{Context, Pos2, RawInput, Rect, Vec2};
use quakemap::{
    compose_map, core::geo::LatLng, layers::earthquake::EarthquakeLayer, Earthquake, Map,
    MapProfile, MapWidget,
};

fn sample_map() -> Map {
    let quakes = vec![Earthquake {
        id: Some("ci1".to_string()),
        place: "Ridgecrest, CA".to_string(),
        time: Some(1_700_000_000_000),
        magnitude: 4.0,
        depth: 8.0,
        position: LatLng::new(35.7, -117.6),
    }];
    let layer = EarthquakeLayer::new("earthquakes".into(), "Earthquakes".into(), quakes);
    compose_map(MapProfile::Basic.resolve(), Some(layer), None, Vec::new()).unwrap()
}

fn input(events: Vec<egui::Event>) -> RawInput {
    RawInput {
        screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(640.0, 480.0))),
        events,
        ..Default::default()
    }
}

fn frame(ctx: &Context, widget: &mut MapWidget, map: &mut Map, raw: RawInput) -> Rect {
    let mut rect = Rect::NOTHING;
    let _ = ctx.run(raw, |ctx| {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                rect = widget.show(ui, map).rect;
            });
    });
    rect
}

#[test]
fn test_widget_sizes_viewport_to_available_space() {
    let ctx = Context::default();
    let mut widget = MapWidget::new(64).interactive(false).load_tiles(false);
    let mut map = sample_map();

    let rect = frame(&ctx, &mut widget, &mut map, input(Vec::new()));
    assert!(rect.width() > 0.0 && rect.height() > 0.0);
    assert_eq!(map.viewport().size.x, rect.width() as f64);
    assert_eq!(map.viewport().center, LatLng::new(37.09, -95.71));
}

#[test]
fn test_non_interactive_widget_ignores_scroll() {
    let ctx = Context::default();
    let mut widget = MapWidget::new(64).interactive(false).load_tiles(false);
    let mut map = sample_map();
    frame(&ctx, &mut widget, &mut map, input(Vec::new()));

    let scroll = egui::Event::Scroll(Vec2::new(0.0, 200.0));
    frame(&ctx, &mut widget, &mut map, input(vec![scroll]));
    assert_eq!(map.viewport().zoom, 5.0);
}

#[test]
fn test_widget_without_tile_loading_requests_nothing() {
    let ctx = Context::default();
    let mut widget = MapWidget::new(64).load_tiles(false);
    let mut map = sample_map();

    frame(&ctx, &mut widget, &mut map, input(Vec::new()));
    frame(&ctx, &mut widget, &mut map, input(Vec::new()));
    assert_eq!(widget.pending_tiles(), 0);
}
