//! Color palette - Monochrome grayscale theme

use crate::color::Rgb;
use ratatui::style::Color;

/// Accents darker than this are lifted so lyrics stay readable on black.
const MIN_ACCENT_LUMA: f32 = 0.35;

/// Monochrome grayscale palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_dim: Color,
    pub accent: Color,
    pub border: Color,
    pub error: Color,
}

impl Palette {
    /// Monochrome palette - pure black, white, and grays
    pub const MONO: Self = Self {
        fg_primary: Color::Rgb(255, 255, 255),   // #ffffff white
        fg_secondary: Color::Rgb(136, 136, 136), // #888888 medium gray
        fg_dim: Color::Rgb(64, 64, 64),          // #404040 dark gray
        accent: Color::Rgb(255, 255, 255),       // #ffffff white (accent = white)
        border: Color::Rgb(64, 64, 64),          // #404040 dark gray
        error: Color::Rgb(255, 255, 255),        // #ffffff white (errors still visible via icon)
    };

    /// MONO with the accent replaced by the album color.
    pub fn tinted(accent: Option<Rgb>) -> Self {
        match accent {
            Some(rgb) => Self {
                accent: to_color(lift(rgb)),
                ..Self::MONO
            },
            None => Self::MONO,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::MONO
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Blend `rgb` toward white until it reaches [`MIN_ACCENT_LUMA`].
fn lift(rgb: Rgb) -> Rgb {
    let luma = rgb.luma();
    if luma >= MIN_ACCENT_LUMA {
        return rgb;
    }
    let t = (MIN_ACCENT_LUMA - luma) / (1.0 - luma);
    let mix = |c: u8| (c as f32 + (255.0 - c as f32) * t).round() as u8;
    Rgb::new(mix(rgb.r), mix(rgb.g), mix(rgb.b))
}

/// Linear blend from `from` to `to`; `t` is clamped to `[0, 1]`.
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    let (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) = (from, to) else {
        return if t >= 0.5 { to } else { from };
    };
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_accent_is_white() {
        assert_eq!(Palette::tinted(None), Palette::MONO);
        assert_eq!(Palette::tinted(None).accent, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_bright_accent_kept() {
        let p = Palette::tinted(Some(Rgb::new(240, 200, 40)));
        assert_eq!(p.accent, Color::Rgb(240, 200, 40));
    }

    #[test]
    fn test_dark_accent_lifted() {
        let lifted = lift(Rgb::BLACK);
        assert!(lifted.luma() >= MIN_ACCENT_LUMA - 0.01);
        assert_eq!(lifted.r, lifted.g);
    }

    #[test]
    fn test_blend_endpoints() {
        let a = Color::Rgb(0, 0, 0);
        let b = Color::Rgb(200, 100, 50);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(blend(a, b, 7.0), b);
    }
}
