// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The color table.  The built-in gradient (deep blue through white
//! and gold to black) lives in `assets/gradient.hex` as 512 six-digit
//! hex triples; it is decoded once per process and shared read-only
//! by every colorizing worker.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use error::RenderError;

/// Number of entries every palette must have.
pub const PALETTE_SIZE: usize = 512;

const GRADIENT: &str = include_str!("../assets/gradient.hex");

/// One output pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// A color from its three channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Decodes a `RRGGBB` hex triple, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self, RenderError> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RenderError::Palette(format!(
                "'{}' is not a six digit hex color",
                hex
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| RenderError::Palette(format!("'{}' is not valid hex", hex)))
        };
        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// The color as interleaved RGB bytes.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// An ordered, fixed-length table of colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// The built-in gradient.  Decoded on first use, then shared.
    pub fn gradient() -> &'static Palette {
        static GRADIENT_PALETTE: OnceLock<Palette> = OnceLock::new();
        GRADIENT_PALETTE
            .get_or_init(|| Palette::from_hex(GRADIENT).expect("built-in gradient is well formed"))
    }

    /// Parses a gradient from text: hex triples separated by
    /// whitespace, commas or quotes.  Exactly `PALETTE_SIZE` entries are
    /// required.
    pub fn from_hex(text: &str) -> Result<Palette, RenderError> {
        let colors = text
            .split(|c: char| c.is_whitespace() || c == ',' || c == '"')
            .filter(|token| !token.is_empty())
            .map(Color::from_hex)
            .collect::<Result<Vec<Color>, RenderError>>()?;
        if colors.len() != PALETTE_SIZE {
            return Err(RenderError::Palette(format!(
                "expected {} colors, found {}",
                PALETTE_SIZE,
                colors.len()
            )));
        }
        Ok(Palette { colors })
    }

    /// Reads a gradient file in the format accepted by `from_hex`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Palette, RenderError> {
        let text = fs::read_to_string(path)?;
        Palette::from_hex(&text)
    }

    /// The color at `index`, wrapping around the table.
    #[inline]
    pub fn get(&self, index: usize) -> Color {
        self.colors[index % PALETTE_SIZE]
    }

    /// Number of entries, always `PALETTE_SIZE`.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Never true; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
