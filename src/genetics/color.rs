//! Body colors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A snake's color. Hex strings parse to `Rgb`; anything else is kept
/// verbatim as `Named` and is not blendable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Color {
    Rgb(u8, u8, u8),
    Named(String),
}

impl Color {
    /// Parse `#rrggbb` (leading `#` optional); other strings become `Named`
    pub fn parse(s: &str) -> Self {
        let hex = s.trim_start_matches('#');
        if hex.len() == 6 && hex.is_ascii() {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::Named(s.to_string())
    }

    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match *self {
            Color::Rgb(r, g, b) => Some((r, g, b)),
            Color::Named(_) => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            Color::Named(name) => f.write_str(name),
        }
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
