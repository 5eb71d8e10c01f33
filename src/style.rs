//! Depiction settings.
//!
//! All lengths are fractions of the average bond length of the molecule
//! being drawn, so the same `StyleConfig` works at any coordinate scale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Maps an atom to the color of its label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// CPK-style element colors, darkened where the Jmol palette is
    /// unreadable on white.
    #[default]
    Cpk,
    /// Every label in one color.
    Monochrome(Color),
    /// Explicit per-element colors keyed by atomic number.
    Custom {
        default: Color,
        overrides: BTreeMap<u8, Color>,
    },
}

impl ColorScheme {
    pub fn color_for(&self, atomic_num: u8) -> Color {
        match self {
            ColorScheme::Cpk => cpk_color(atomic_num),
            ColorScheme::Monochrome(color) => *color,
            ColorScheme::Custom { default, overrides } => {
                overrides.get(&atomic_num).copied().unwrap_or(*default)
            }
        }
    }
}

fn cpk_color(atomic_num: u8) -> Color {
    match atomic_num {
        1 => Color::from_hex(0x404040),
        5 => Color::from_hex(0xe07070),
        7 => Color::from_hex(0x3050f8),
        8 => Color::from_hex(0xff0d0d),
        9 => Color::from_hex(0x60c030),
        11 => Color::from_hex(0xab5cf2),
        12 => Color::from_hex(0x3a9e00),
        14 => Color::from_hex(0xb08a60),
        15 => Color::from_hex(0xff8000),
        16 => Color::from_hex(0xc8a000),
        17 => Color::from_hex(0x1fb01f),
        19 => Color::from_hex(0x8f40d4),
        26 => Color::from_hex(0xe06633),
        29 => Color::from_hex(0xc88033),
        35 => Color::from_hex(0xa62929),
        53 => Color::from_hex(0x940094),
        _ => Color::BLACK,
    }
}

/// Style settings consumed by the layout and render driver.
///
/// # Examples
///
/// ```
/// use chemcrab_depict::StyleConfig;
///
/// let style = StyleConfig {
///     line_spacing: 0.25,
///     ..StyleConfig::default()
/// };
/// assert!(style.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Atom label circle diameter.
    pub label_height: f64,
    /// Stroke width of bond lines.
    pub line_thickness: f64,
    /// Distance between parallel lines of a multiple bond.
    pub line_spacing: f64,
    pub antialiasing: bool,
    pub color_scheme: ColorScheme,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            label_height: 0.50,
            line_thickness: 0.07,
            line_spacing: 0.20,
            antialiasing: true,
            color_scheme: ColorScheme::Cpk,
        }
    }
}

impl StyleConfig {
    pub fn validate(&self) -> Result<(), StyleError> {
        let fractions = [
            ("label_height", self.label_height),
            ("line_thickness", self.line_thickness),
            ("line_spacing", self.line_spacing),
        ];
        for (field, value) in fractions {
            if !value.is_finite() || value < 0.0 {
                return Err(StyleError::InvalidFraction { field, value });
            }
        }
        Ok(())
    }
}
