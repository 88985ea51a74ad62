//! Color representation and resolution.
//!
//! Colors travel through the format as group code 62: `0` defers to the
//! owning block insertion, `256` defers to the owning layer, `1..=255` is an
//! explicit palette index and a negative value packs a 24-bit true color.
//! [`Color::resolve`] turns any of these into a concrete display [`Rgb`]
//! given the (optional) bound layer and block color.

use crate::tables::Layer;
use once_cell::sync::Lazy;
use std::fmt;

/// A resolved 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Unpack a 24-bit `0xRRGGBB` value
    pub const fn from_u32(value: u32) -> Self {
        Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Pack into a 24-bit `0xRRGGBB` value
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const DARK_GRAY: Rgb = Rgb::new(0x41, 0x41, 0x41);
    pub const LIGHT_GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// How an entity's color is determined.
///
/// The default for any newly constructed entity is `ByLayer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Inherit from the owning layer (code 256)
    #[default]
    ByLayer,
    /// Inherit from the block insertion drawing this entity (code 0)
    ByBlock,
    /// Explicit palette index (codes 1-255)
    Index(u8),
    /// True color with RGB values
    TrueColor(Rgb),
}

impl Color {
    /// Interpret a group code 62 value.
    ///
    /// Negative values carry a packed 24-bit true color; anything outside
    /// the defined ranges falls back to `ByLayer`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            1..=255 => Color::Index(code as u8),
            c if c < 0 => Color::TrueColor(Rgb::from_u32((-c) as u32 & 0xFF_FF_FF)),
            _ => Color::ByLayer,
        }
    }

    /// The group code 62 value for this color.
    pub fn to_code(&self) -> i32 {
        match self {
            Color::ByBlock => 0,
            Color::ByLayer => 256,
            Color::Index(i) => *i as i32,
            Color::TrueColor(rgb) => -(rgb.to_u32() as i32),
        }
    }

    /// Resolve to a concrete display color.
    ///
    /// Precedence is fixed: `ByBlock` takes the supplied block color,
    /// `ByLayer` looks up the bound layer's palette index, `Index` is a
    /// direct palette lookup and `TrueColor` is returned as-is.  Every
    /// unresolvable case (no block color, no bound layer) falls back to
    /// white.
    pub fn resolve(&self, layer: Option<&Layer>, block_color: Option<Rgb>) -> Rgb {
        match self {
            Color::ByBlock => block_color.unwrap_or(Rgb::WHITE),
            Color::ByLayer => layer
                .map(|l| aci_rgb(l.color_number))
                .unwrap_or(Rgb::WHITE),
            Color::Index(i) => aci_rgb(*i as i16),
            Color::TrueColor(rgb) => *rgb,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
            Color::TrueColor(rgb) => write!(f, "TrueColor({})", rgb),
        }
    }
}

/// The full 256-entry palette, built once.
///
/// Entry 0 is the white fallback (index 0 is "by block" on the wire and has
/// no color of its own).
static ACI_PALETTE: Lazy<[Rgb; 256]> = Lazy::new(|| {
    let mut table = [Rgb::WHITE; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = palette_entry(i as i16);
    }
    table
});

/// Resolve a palette index to its display color.
///
/// Indices 1-9 and 20 are the named standard colors, 11-19 are the
/// documented red shades, 250-255 are a six-step grayscale ramp and the
/// remaining 10-249 range is generated as an HSL rotation.  Anything
/// outside 0-255 resolves to white.
pub fn aci_rgb(index: i16) -> Rgb {
    if (0..=255).contains(&index) {
        ACI_PALETTE[index as usize]
    } else {
        Rgb::WHITE
    }
}

fn palette_entry(index: i16) -> Rgb {
    match index {
        1 => Rgb::RED,
        2 => Rgb::YELLOW,
        3 => Rgb::GREEN,
        4 => Rgb::CYAN,
        5 => Rgb::BLUE,
        6 => Rgb::MAGENTA,
        7 => Rgb::WHITE,
        8 => Rgb::DARK_GRAY,
        9 => Rgb::LIGHT_GRAY,
        11 => Rgb::new(0xFF, 0xAA, 0xAA),
        12 => Rgb::new(0xBD, 0x00, 0x00),
        13 => Rgb::new(0xBD, 0x7E, 0x7E),
        14 => Rgb::new(0x81, 0x00, 0x00),
        15 => Rgb::new(0x81, 0x00, 0x40),
        16 => Rgb::new(0xBD, 0x00, 0x40),
        17 => Rgb::new(0xFF, 0x00, 0x40),
        18 => Rgb::new(0xFF, 0xAA, 0xBD),
        19 => Rgb::new(0xBD, 0x7E, 0x7E),
        20 => Rgb::ORANGE,
        10..=249 => {
            let hue = (index - 10) as f64 * 360.0 / 240.0;
            hsl_full_saturation(hue)
        }
        250..=255 => {
            let gray = ((index - 250) * 255 / 5) as u8;
            Rgb::new(gray, gray, gray)
        }
        _ => Rgb::WHITE,
    }
}

/// HSL with S=100%, L=50% reduced to the hue sector formula.
fn hsl_full_saturation(hue: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Rgb::new(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

/// Best-effort inverse lookup from a display color to a palette index.
///
/// Only the named standard entries round-trip; any other color maps to 7
/// (white).  Exact recovery of arbitrary RGB is intentionally unsupported —
/// display resolution only ever goes forward.
pub fn aci_index(rgb: Rgb) -> i16 {
    match rgb {
        Rgb::RED => 1,
        Rgb::YELLOW => 2,
        Rgb::GREEN => 3,
        Rgb::CYAN => 4,
        Rgb::BLUE => 5,
        Rgb::MAGENTA => 6,
        Rgb::WHITE => 7,
        Rgb::DARK_GRAY => 8,
        Rgb::LIGHT_GRAY => 9,
        _ => 7,
    }
}
