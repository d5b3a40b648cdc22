use crossterm::style::Color;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

/// Colors cycled through in multicolor mode.
pub const PALETTE: [&str; 9] = [
    "midnightblue",
    "deepskyblue",
    "green",
    "seagreen",
    "yellow",
    "orangered",
    "red",
    "magenta",
    "violet",
];

const NAMED: [(&str, (u8, u8, u8)); 17] = [
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("gray", (190, 190, 190)),
    ("grey", (190, 190, 190)),
    ("red", (255, 0, 0)),
    ("green", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("cyan", (0, 255, 255)),
    ("orange", (255, 165, 0)),
    ("midnightblue", (25, 25, 112)),
    ("deepskyblue", (0, 191, 255)),
    ("seagreen", (46, 139, 87)),
    ("yellow", (255, 255, 0)),
    ("orangered", (255, 69, 0)),
    ("magenta", (255, 0, 255)),
    ("violet", (238, 130, 238)),
    ("purple", (128, 0, 128)),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Unknown color \"{name}\"")]
    Unknown { name: String },

    #[error("Invalid hex color \"{hex}\", expected #rrggbb")]
    InvalidHex { hex: String },
}

/// Parse a color name such as `seagreen`, or a hex triple such as `#2e8b57`.
pub fn parse_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        let invalid = || ColorError::InvalidHex { hex: s.to_string() };

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        return Ok(Color::Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }

    let lower = s.to_ascii_lowercase();

    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|&(_, (r, g, b))| Color::Rgb { r, g, b })
        .ok_or(ColorError::Unknown { name: lower })
}

/// How live cells are colored.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorPolicy {
    Fixed(Color),

    /// A color picked at random for every cell, every frame
    Random(Vec<Color>),
}

impl ColorPolicy {
    /// Random colors from [`PALETTE`].
    pub fn palette() -> Self {
        let colors = NAMED
            .iter()
            .filter(|(name, _)| PALETTE.contains(name))
            .map(|&(_, (r, g, b))| Color::Rgb { r, g, b })
            .collect();

        Self::Random(colors)
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        match self {
            Self::Fixed(color) => *color,
            Self::Random(colors) => colors.choose(rng).copied().unwrap_or(Color::Reset),
        }
    }
}

impl Default for ColorPolicy {
    fn default() -> Self {
        Self::Fixed(Color::Rgb { r: 255, g: 0, b: 0 })
    }
}
