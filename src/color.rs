use image::Rgb;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Rgb([rgb.red, rgb.green, rgb.blue])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color names → Rgb
// ---------------------------------------------------------------------------

/// Resolve a CSS/SVG colour name (`"green"`) or `#rrggbb` hex string.
pub fn resolve_color(name: &str) -> Option<Rgb<u8>> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }
    palette::named::from_str(&name.to_ascii_lowercase())
        .map(|c: Srgb<u8>| Rgb([c.red, c.green, c.blue]))
}

/// Resolve `name`, falling back to slot `index` of an `n`-colour palette.
pub fn color_or_palette(name: Option<&str>, index: usize, n: usize) -> Rgb<u8> {
    if let Some(c) = name.and_then(resolve_color) {
        return c;
    }
    if let Some(name) = name {
        log::warn!("unknown colour '{name}', using generated palette");
    }
    generate_palette(n.max(index + 1))[index]
}

fn parse_hex(hex: &str) -> Option<Rgb<u8>> {
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}
