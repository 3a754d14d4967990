use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: country → Color32
// ---------------------------------------------------------------------------

/// Maps each country to a distinct colour, shared by every chart so a
/// country keeps its colour across tabs.
#[derive(Debug, Clone)]
pub struct CountryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CountryColors {
    /// Build the map from the dataset's distinct countries.
    pub fn new(countries: &BTreeSet<String>) -> Self {
        let palette = generate_palette(countries.len());
        let mapping: BTreeMap<String, Color32> = countries
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        CountryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a country.
    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping
            .get(country)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Map a Pearson coefficient in [-1, 1] to a blue → white → red scale.
/// NaN (undefined cells) renders as neutral grey.
pub fn correlation_color(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::from_gray(90);
    }
    let v = value.clamp(-1.0, 1.0) as f32;

    let lerp = |a: u8, b: u8, t: f32| (a as f32 + (b as f32 - a as f32) * t) as u8;
    let (from, to, t) = if v < 0.0 {
        ((40u8, 90u8, 200u8), (235u8, 235u8, 235u8), 1.0 + v)
    } else {
        ((235u8, 235u8, 235u8), (200u8, 55u8, 45u8), v)
    };

    Color32::from_rgb(
        lerp(from.0, to.0, t),
        lerp(from.1, to.1, t),
        lerp(from.2, to.2, t),
    )
}
