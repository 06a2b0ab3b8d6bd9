use anyhow::{anyhow, Context as _};
use crossbeam_channel::{bounded, Receiver};
use quakemap::{load_map, HttpFeedSource, Map, MapConfig, MapWidget};
use std::time::Duration;

const LOADING_TEXT: &str = "Loading earthquake data...";

/// Earthquake map viewer. Configuration comes from the environment
/// (`QUAKEMAP_PROFILE`, `MAPBOX_ACCESS_TOKEN`, `QUAKEMAP_FEED_URL`,
/// `QUAKEMAP_PLATES_URL`); logging from `RUST_LOG`.
fn main() -> anyhow::Result<()> {
    quakemap::init_logging();

    let config = MapConfig::from_env().context("invalid map configuration")?;
    let tile_cache_size = config.tile_cache_size;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let (tx, rx) = bounded(1);
    runtime.spawn(async move {
        let source = HttpFeedSource::new();
        let result = load_map(config, &source).await;
        if let Err(e) = &result {
            log::error!("map load failed: {}", e);
        }
        let _ = tx.send(result);
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Earthquakes of the past week"),
        ..Default::default()
    };

    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(move |_cc| Box::new(QuakeMapApp::new(rx, runtime, tile_cache_size))),
    )
    .map_err(|e| anyhow!("viewer exited with an error: {}", e))
}

enum LoadState {
    Loading(Receiver<quakemap::Result<Map>>),
    Ready(Map),
    Failed(String),
}

struct QuakeMapApp {
    state: LoadState,
    widget: MapWidget,
    // keeps the feed fetch alive until it reports back
    _runtime: tokio::runtime::Runtime,
}

impl QuakeMapApp {
    fn new(
        rx: Receiver<quakemap::Result<Map>>,
        runtime: tokio::runtime::Runtime,
        tile_cache_size: usize,
    ) -> Self {
        Self {
            state: LoadState::Loading(rx),
            widget: MapWidget::new(tile_cache_size),
            _runtime: runtime,
        }
    }

    fn poll_load(&mut self) {
        let LoadState::Loading(rx) = &self.state else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(map)) => {
                log::info!(
                    "map ready: {} earthquakes, {} notices",
                    map.earthquakes().map_or(0, |layer| layer.len()),
                    map.notices().len()
                );
                self.state = LoadState::Ready(map);
            }
            Ok(Err(e)) => self.state = LoadState::Failed(e.to_string()),
            Err(crossbeam_channel::TryRecvError::Empty) => {}
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                self.state = LoadState::Failed("the loader stopped before finishing".to_string());
            }
        }
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| match &mut self.state {
                LoadState::Loading(_) => {
                    ui.centered_and_justified(|ui| {
                        ui.horizontal_centered(|ui| {
                            ui.spinner();
                            ui.label(LOADING_TEXT);
                        });
                    });
                    ctx.request_repaint_after(Duration::from_millis(100));
                }
                LoadState::Ready(map) => {
                    self.widget.show(ui, map);
                }
                LoadState::Failed(message) => {
                    ui.centered_and_justified(|ui| {
                        let text = format!("Could not build the map: {}", message);
                        ui.colored_label(egui::Color32::RED, text);
                    });
                }
            });
    }
}
