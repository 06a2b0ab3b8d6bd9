use crate::core::map::NoticeLevel;
use egui::{Color32, FontId};

/// Colors and fonts used by the map widget's own chrome
#[derive(Debug, Clone)]
pub struct MapStyle {
    /// Background painted where no tile is loaded yet
    pub background_color: Color32,
    /// Placeholder fill for tiles that failed to load
    pub missing_tile_color: Color32,
    pub attribution: AttributionStyle,
    pub notice_font: FontId,
    /// Pointer distance, in pixels, that still counts as hovering a tiny circle
    pub hover_tolerance: f32,
}

#[derive(Debug, Clone)]
pub struct AttributionStyle {
    pub text_color: Color32,
    pub background_color: Color32,
    pub font_id: FontId,
    pub padding: f32,
}

impl MapStyle {
    pub fn notice_color(&self, level: NoticeLevel) -> Color32 {
        match level {
            NoticeLevel::Info => Color32::from_rgb(0x1F, 0x4E, 0x79),
            NoticeLevel::Warning => Color32::from_rgb(0x9C, 0x6B, 0x00),
            NoticeLevel::Error => Color32::from_rgb(0xB0, 0x1E, 0x1E),
        }
    }
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgb(0xDD, 0xDD, 0xDD),
            missing_tile_color: Color32::from_rgb(0xE8, 0xE8, 0xE8),
            attribution: AttributionStyle::default(),
            notice_font: FontId::proportional(13.0),
            hover_tolerance: 4.0,
        }
    }
}

impl Default for AttributionStyle {
    fn default() -> Self {
        Self {
            text_color: Color32::from_gray(60),
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 200),
            font_id: FontId::proportional(10.0),
            padding: 3.0,
        }
    }
}
