//! theme - Light/dark color adjustment

use crate::color::HexColor;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

// Known base colors and their light-theme replacements.
const LIGHT_THEME: [(HexColor, HexColor); 2] = [
    // primary blue
    (HexColor::new(0x3b, 0x82, 0xf6), HexColor::new(0x1d, 0x4e, 0xd8)),
    // white would vanish on a light page
    (HexColor::WHITE, HexColor::new(0x64, 0x74, 0x8b)),
];

/// Color to draw `color` with under `theme`. Dark passes everything through,
/// light swaps a few known colors and leaves the rest alone.
pub fn adjust(color: HexColor, theme: Theme) -> HexColor {
    match theme {
        Theme::Dark => color,
        Theme::Light => LIGHT_THEME
            .iter()
            .find(|(from, _)| *from == color)
            .map_or(color, |(_, to)| *to),
    }
}
