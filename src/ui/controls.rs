//! Layer control and depth legend.
//!
//! Both are plain data so they can be inspected without a UI; with the
//! `egui` feature they also render themselves through `UiRenderable`.

use crate::{
    data::style::{SerializableColor, DEPTH_BUCKETS},
    ui::elements::Position,
};
use serde::{Deserialize, Serialize};

pub const LEGEND_TITLE: &str = "Depth of the earthquake";

/// One row of the layer control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlEntry {
    pub id: String,
    pub name: String,
    /// Selected for base layers, checked for overlays
    pub active: bool,
}

/// A change requested through the layer control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    SelectBase(String),
    SetOverlay(String, bool),
    SetCollapsed(bool),
}

/// Snapshot of the map's base layers (radio) and overlays (checkboxes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerControl {
    pub base_layers: Vec<ControlEntry>,
    pub overlays: Vec<ControlEntry>,
    pub collapsed: bool,
    pub position: Position,
    #[serde(skip)]
    visible: bool,
    #[serde(skip)]
    action: Option<ControlAction>,
}

impl LayerControl {
    pub fn new(
        base_layers: Vec<ControlEntry>,
        overlays: Vec<ControlEntry>,
        collapsed: bool,
    ) -> Self {
        Self {
            base_layers,
            overlays,
            collapsed,
            position: Position::TopRight,
            visible: true,
            action: None,
        }
    }

    pub fn selected_base(&self) -> Option<&ControlEntry> {
        self.base_layers.iter().find(|entry| entry.active)
    }

    /// The change made during the last render, if any
    pub fn take_action(&mut self) -> Option<ControlAction> {
        self.action.take()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: SerializableColor,
}

/// Depth color key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
    pub position: Position,
    #[serde(skip)]
    visible: bool,
}

impl Legend {
    /// One entry per depth bucket, shallowest first
    pub fn depth(position: Position) -> Self {
        let entries = DEPTH_BUCKETS
            .iter()
            .map(|bucket| LegendEntry {
                label: bucket.label.to_string(),
                color: bucket.color,
            })
            .collect();
        Self {
            title: LEGEND_TITLE.to_string(),
            entries,
            position,
            visible: true,
        }
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::depth(Position::BottomRight)
    }
}

#[cfg(feature = "egui")]
mod render {
    use super::*;
    use crate::traits::UiRenderable;
    use egui::{Color32, Frame, Rect, Response, RichText, Rounding, Sense, Stroke, Ui, Vec2};

    const SWATCH: f32 = 14.0;
    const ROW_HEIGHT: f32 = 18.0;
    const MARGIN: f32 = 10.0;

    fn panel() -> Frame {
        Frame::none()
            .fill(Color32::from_rgba_unmultiplied(255, 255, 255, 230))
            .stroke(Stroke::new(1.0, Color32::from_gray(180)))
            .rounding(Rounding::same(4.0))
            .inner_margin(6.0)
    }

    impl LayerControl {
        /// Approximate on-screen size, used to anchor the control
        pub fn size_hint(&self) -> Vec2 {
            if self.collapsed {
                return Vec2::new(64.0, 36.0);
            }
            let rows = self.base_layers.len() + self.overlays.len() + 1;
            Vec2::new(170.0, 24.0 + rows as f32 * 22.0)
        }

        pub fn anchored_rect(&self, container: Rect) -> Rect {
            self.position.calculate_rect(container, self.size_hint(), MARGIN)
        }
    }

    impl UiRenderable for LayerControl {
        fn render(&mut self, ui: &mut Ui, rect: Rect) -> Response {
            let mut action = None;
            let response = ui
                .allocate_ui_at_rect(rect, |ui| {
                    panel().show(ui, |ui| {
                        if self.collapsed {
                            if ui.button("Layers").clicked() {
                                action = Some(ControlAction::SetCollapsed(false));
                            }
                            return;
                        }

                        for entry in &self.base_layers {
                            let clicked = ui.radio(entry.active, entry.name.as_str()).clicked();
                            if clicked && !entry.active {
                                action = Some(ControlAction::SelectBase(entry.id.clone()));
                            }
                        }
                        if !self.overlays.is_empty() {
                            ui.separator();
                        }
                        for entry in &self.overlays {
                            let mut checked = entry.active;
                            if ui.checkbox(&mut checked, entry.name.as_str()).changed() {
                                action = Some(ControlAction::SetOverlay(entry.id.clone(), checked));
                            }
                        }
                        if ui.small_button("collapse").clicked() {
                            action = Some(ControlAction::SetCollapsed(true));
                        }
                    });
                })
                .response;

            if action.is_some() {
                log::debug!("layer control action: {:?}", action);
                self.action = action;
            }
            response
        }

        fn is_visible(&self) -> bool {
            self.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }
    }

    impl Legend {
        pub fn size_hint(&self) -> Vec2 {
            Vec2::new(190.0, 34.0 + self.entries.len() as f32 * ROW_HEIGHT)
        }

        pub fn anchored_rect(&self, container: Rect) -> Rect {
            self.position.calculate_rect(container, self.size_hint(), MARGIN)
        }
    }

    impl UiRenderable for Legend {
        fn render(&mut self, ui: &mut Ui, rect: Rect) -> Response {
            ui.allocate_ui_at_rect(rect, |ui| {
                panel().show(ui, |ui| {
                    ui.label(RichText::new(&self.title).strong().color(Color32::BLACK));
                    for entry in &self.entries {
                        ui.horizontal(|ui| {
                            let (swatch, _) =
                                ui.allocate_exact_size(Vec2::splat(SWATCH), Sense::hover());
                            ui.painter().rect_filled(swatch, 0.0, Color32::from(entry.color));
                            ui.label(RichText::new(&entry.label).color(Color32::BLACK));
                        });
                    }
                });
            })
            .response
        }

        fn is_visible(&self) -> bool {
            self.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }
    }
}
