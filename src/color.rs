use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Srgb, WithAlpha};

// ---------------------------------------------------------------------------
// Qualitative palette
// ---------------------------------------------------------------------------

/// Tableau10, in assignment order.
pub const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

/// Parse a `#rrggbb` string; malformed input falls back to gray.
pub fn hex_color(hex: &str) -> Color32 {
    match hex.parse::<Srgb<u8>>() {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(e) => {
            log::warn!("Bad palette color {hex:?}: {e}");
            Color32::GRAY
        }
    }
}

/// `color` with its alpha replaced, as straight (unmultiplied) RGBA.
pub fn translucent(color: Color32, alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    let rgba = Srgb::new(color.r(), color.g(), color.b()).with_alpha(alpha);
    Color32::from_rgba_unmultiplied(rgba.red, rgba.green, rgba.blue, rgba.alpha)
}

// ---------------------------------------------------------------------------
// Color mapping: origin → Color32
// ---------------------------------------------------------------------------

/// Maps the sorted distinct values of a categorical column to palette colours.
///
/// Value `i` (in sorted order) gets `palette[i % palette.len()]`, so colours
/// repeat once there are more values than palette entries.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(values: &BTreeSet<String>) -> Self {
        let palette: Vec<Color32> = TABLEAU10.iter().map(|h| hex_color(h)).collect();
        Self::with_palette(values, &palette)
    }

    pub fn with_palette(values: &BTreeSet<String>, palette: &[Color32]) -> Self {
        let mapping = if palette.is_empty() {
            BTreeMap::new()
        } else {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (v.clone(), palette[i % palette.len()]))
                .collect()
        };
        if values.len() > palette.len() {
            log::debug!(
                "{} categories for {} palette colours, colours repeat",
                values.len(),
                palette.len()
            );
        }

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Colour for a value; gray for values outside the mapped set.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (value → colour) in sorted order.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, Color32)> + '_ {
        self.mapping.iter().map(|(v, c)| (v.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
