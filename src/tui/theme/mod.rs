//! Theme configuration - monochrome grayscale tinted by the album art

pub mod icons;
pub mod palette;

pub use icons::{Icons, LoadingSpinner};
pub use palette::Palette;

use crate::color::Rgb;

/// Active theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Palette,
    pub icons: Icons,
}

impl Theme {
    /// Mono theme with the accent taken from the album art, if known.
    pub fn with_accent(accent: Option<Rgb>) -> Self {
        Self {
            palette: Palette::tinted(accent),
            icons: Icons::nerd(),
        }
    }

    pub fn border_set(&self) -> ratatui::symbols::border::Set<'static> {
        ratatui::symbols::border::ROUNDED
    }
}
