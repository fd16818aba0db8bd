use eframe::egui::Color32;
use palette::{Hsl, IntoColor, ShiftHue, Srgb};

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Line colour of the first chart; later charts rotate away from it.
pub const BASE_COLOR: &str = "#17B897";

/// Hue step between consecutive chart colours, in degrees.
const HUE_STEP: f32 = 137.5;

/// Parse `#RRGGBB` (or `RRGGBB`).
pub fn parse_hex(hex: &str) -> Option<Srgb<u8>> {
    hex.trim().parse::<Srgb<u8>>().ok()
}

pub fn to_hex(c: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
}

/// Colour of the chart at `index`: the base colour, hue-rotated per index.
pub fn chart_color(index: usize) -> String {
    let Some(base) = parse_hex(BASE_COLOR) else {
        return BASE_COLOR.to_string();
    };
    if index == 0 {
        return to_hex(base);
    }
    let hsl: Hsl = base.into_format::<f32>().into_color();
    let shifted = hsl.shift_hue(HUE_STEP * index as f32);
    let rgb: Srgb = shifted.into_color();
    to_hex(rgb.into_format())
}

/// Convert a hex colour for egui, grey when unparseable.
pub fn to_color32(hex: &str) -> Color32 {
    parse_hex(hex)
        .map(|c| Color32::from_rgb(c.red, c.green, c.blue))
        .unwrap_or(Color32::GRAY)
}
