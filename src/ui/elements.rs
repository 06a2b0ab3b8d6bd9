use serde::{Deserialize, Serialize};

/// Corner or edge of the map a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Position {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
    Custom { x: f32, y: f32 },
}

impl Position {
    /// Parses `top-left`, `top_right`, `bottomright` and similar spellings
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "topleft" => Some(Position::TopLeft),
            "topright" => Some(Position::TopRight),
            "bottomleft" => Some(Position::BottomLeft),
            "bottomright" => Some(Position::BottomRight),
            _ => None,
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Position::BottomLeft | Position::BottomRight)
    }
}

#[cfg(feature = "egui")]
impl Position {
    /// Rect of `size` anchored inside `container`, `margin` pixels from the edges
    pub fn calculate_rect(
        &self,
        container: egui::Rect,
        size: egui::Vec2,
        margin: f32,
    ) -> egui::Rect {
        use egui::{Pos2, Rect, Vec2};

        let pos = match self {
            Position::TopLeft => container.min + Vec2::new(margin, margin),
            Position::TopRight => {
                Pos2::new(container.max.x - margin - size.x, container.min.y + margin)
            }
            Position::BottomLeft => {
                Pos2::new(container.min.x + margin, container.max.y - margin - size.y)
            }
            Position::BottomRight => container.max - Vec2::new(margin + size.x, margin + size.y),
            Position::Custom { x, y } => container.min + Vec2::new(*x, *y),
        };
        Rect::from_min_size(pos, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positions() {
        assert_eq!(Position::parse("bottom-right"), Some(Position::BottomRight));
        assert_eq!(Position::parse("TOP_LEFT"), Some(Position::TopLeft));
        assert_eq!(Position::parse("middle"), None);
        assert!(Position::BottomLeft.is_bottom());
        assert!(!Position::default().is_bottom());
    }

    #[cfg(feature = "egui")]
    #[test]
    fn test_calculate_rect_corners() {
        let container = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0));
        let size = egui::vec2(100.0, 50.0);

        let rect = Position::BottomRight.calculate_rect(container, size, 10.0);
        assert_eq!(rect.min, egui::pos2(690.0, 540.0));

        let rect = Position::TopRight.calculate_rect(container, size, 10.0);
        assert_eq!(rect.min, egui::pos2(690.0, 10.0));
    }
}
