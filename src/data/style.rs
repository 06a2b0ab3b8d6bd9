//! Earthquake styling: magnitude to circle radius, depth to fill color.
//!
//! Depth colors come from [`DEPTH_BUCKETS`], an ordered table of inclusive
//! upper bounds. The first bucket whose bound is not exceeded wins; the last
//! bucket has no bound and catches everything else, NaN included.

use crate::core::constants::RADIUS_SCALE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serializable RGBA color that can convert to/from `egui::Color32`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Uppercase `#RRGGBB`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "egui")]
impl From<egui::Color32> for SerializableColor {
    fn from(color: egui::Color32) -> Self {
        Self {
            r: color.r(),
            g: color.g(),
            b: color.b(),
            a: color.a(),
        }
    }
}

#[cfg(feature = "egui")]
impl From<SerializableColor> for egui::Color32 {
    fn from(color: SerializableColor) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

/// Depth palette, shallow to deep.
pub mod palette {
    use super::SerializableColor;

    pub const DEPTH_0_5: SerializableColor = SerializableColor::rgb(0xDE, 0xF7, 0xBC);
    pub const DEPTH_5_10: SerializableColor = SerializableColor::rgb(0xC9, 0xDF, 0xAA);
    pub const DEPTH_10_20: SerializableColor = SerializableColor::rgb(0xAD, 0xBF, 0x93);
    pub const DEPTH_20_30: SerializableColor = SerializableColor::rgb(0x8C, 0x9B, 0x77);
    pub const DEPTH_30_40: SerializableColor = SerializableColor::rgb(0x75, 0x81, 0x64);
    pub const DEPTH_40_50: SerializableColor = SerializableColor::rgb(0x4C, 0x54, 0x42);
    pub const DEPTH_50_60: SerializableColor = SerializableColor::rgb(0x36, 0x3B, 0x2F);
    pub const DEPTH_60_PLUS: SerializableColor = SerializableColor::rgb(0x05, 0x05, 0x04);
}

/// One interval of the depth partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBucket {
    /// Inclusive upper bound in kilometers; `None` means unbounded.
    pub upper_inclusive: Option<f64>,
    pub color: SerializableColor,
    /// Legend text for this bucket.
    pub label: &'static str,
}

impl DepthBucket {
    pub fn contains(&self, depth: f64) -> bool {
        match self.upper_inclusive {
            Some(upper) => depth <= upper,
            None => true,
        }
    }
}

/// Ordered depth buckets. Contiguous, ascending, last entry unbounded.
pub const DEPTH_BUCKETS: [DepthBucket; 8] = [
    DepthBucket {
        upper_inclusive: Some(5.0),
        color: palette::DEPTH_0_5,
        label: "less than or equal to 5",
    },
    DepthBucket {
        upper_inclusive: Some(10.0),
        color: palette::DEPTH_5_10,
        label: "6-10",
    },
    DepthBucket {
        upper_inclusive: Some(20.0),
        color: palette::DEPTH_10_20,
        label: "11-20",
    },
    DepthBucket {
        upper_inclusive: Some(30.0),
        color: palette::DEPTH_20_30,
        label: "21-30",
    },
    DepthBucket {
        upper_inclusive: Some(40.0),
        color: palette::DEPTH_30_40,
        label: "31-40",
    },
    DepthBucket {
        upper_inclusive: Some(50.0),
        color: palette::DEPTH_40_50,
        label: "41-50",
    },
    DepthBucket {
        upper_inclusive: Some(60.0),
        color: palette::DEPTH_50_60,
        label: "51-60",
    },
    DepthBucket {
        upper_inclusive: None,
        color: palette::DEPTH_60_PLUS,
        label: "61 or greater",
    },
];

/// Visual parameters derived from one earthquake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleResult {
    /// Circle radius in meters
    pub radius: f64,
    pub color: SerializableColor,
}

/// Circle radius in meters for a magnitude. Not clamped: zero or negative
/// magnitudes yield zero or negative radii, which renderers must skip.
pub fn radius_for(magnitude: f64) -> f64 {
    magnitude * RADIUS_SCALE
}

/// The bucket a depth (km) falls into.
pub fn bucket_for(depth: f64) -> &'static DepthBucket {
    DEPTH_BUCKETS
        .iter()
        .find(|bucket| bucket.contains(depth))
        .unwrap_or(&DEPTH_BUCKETS[DEPTH_BUCKETS.len() - 1])
}

/// Fill color for a depth (km).
pub fn color_for(depth: f64) -> SerializableColor {
    bucket_for(depth).color
}

pub fn style_for(magnitude: f64, depth: f64) -> StyleResult {
    StyleResult {
        radius: radius_for(magnitude),
        color: color_for(depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_is_linear_without_clamping() {
        assert_eq!(radius_for(0.0), 0.0);
        assert_eq!(radius_for(1.0), 12_000.0);
        assert_eq!(radius_for(2.5), 30_000.0);
        assert_eq!(radius_for(-0.5), -6_000.0);
    }

    #[test]
    fn test_bucket_boundaries_are_inclusive() {
        assert_eq!(color_for(5.0), palette::DEPTH_0_5);
        assert_eq!(color_for(5.0001), palette::DEPTH_5_10);
        assert_eq!(color_for(10.0), palette::DEPTH_5_10);
        assert_eq!(color_for(20.0), palette::DEPTH_10_20);
        assert_eq!(color_for(30.0), palette::DEPTH_20_30);
        assert_eq!(color_for(40.0), palette::DEPTH_30_40);
        assert_eq!(color_for(50.0), palette::DEPTH_40_50);
        assert_eq!(color_for(60.0), palette::DEPTH_50_60);
        assert_eq!(color_for(60.1), palette::DEPTH_60_PLUS);
    }

    #[test]
    fn test_negative_and_non_finite_depths() {
        assert_eq!(color_for(-3.0), palette::DEPTH_0_5);
        assert_eq!(color_for(f64::NEG_INFINITY), palette::DEPTH_0_5);
        assert_eq!(color_for(f64::INFINITY), palette::DEPTH_60_PLUS);
        assert_eq!(color_for(f64::NAN), palette::DEPTH_60_PLUS);
    }

    #[test]
    fn test_table_is_ascending_with_unbounded_tail() {
        let bounds: Vec<f64> = DEPTH_BUCKETS
            .iter()
            .filter_map(|bucket| bucket.upper_inclusive)
            .collect();
        assert_eq!(bounds.len(), DEPTH_BUCKETS.len() - 1);
        assert!(bounds.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(DEPTH_BUCKETS.last().unwrap().upper_inclusive.is_none());
    }

    #[test]
    fn test_hex_round_trip_of_palette() {
        assert_eq!(palette::DEPTH_0_5.to_hex(), "#DEF7BC");
        assert_eq!(palette::DEPTH_60_PLUS.to_string(), "#050504");
        assert_eq!(
            SerializableColor::from_hex("#ADBF93"),
            Some(palette::DEPTH_10_20)
        );
        assert_eq!(SerializableColor::from_hex("ADBF9"), None);
        assert_eq!(SerializableColor::from_hex("#GGGGGG"), None);
    }
}
