use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `#rrggbb` or `#rgb` to a terminal colour; anything else is `Color::Reset`.
pub fn hex_to_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if !h.is_ascii() { return Color::Reset; }
    let expanded: String = match h.len() {
        3 => h.chars().flat_map(|c| [c, c]).collect(),
        6 => h.to_owned(),
        _ => return Color::Reset,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _                           => Color::Reset,
    }
}

/// Colours of one design, as CSS hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg:        &'static str,
    pub border:    &'static str,
    pub text:      &'static str,
    pub highlight: &'static str,
}

impl Palette {
    pub fn bg_color(&self)        -> Color { hex_to_color(self.bg) }
    pub fn border_color(&self)    -> Color { hex_to_color(self.border) }
    pub fn text_color(&self)      -> Color { hex_to_color(self.text) }
    pub fn highlight_color(&self) -> Color { hex_to_color(self.highlight) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Design {
    #[default]
    Academy,
    Minimal,
    Vibrant,
    Material,
}

impl Design {
    pub const ALL: [Design; 4] = [Design::Academy, Design::Minimal, Design::Vibrant, Design::Material];

    pub fn name(self) -> &'static str {
        match self {
            Design::Academy  => "academy",
            Design::Minimal  => "minimal",
            Design::Vibrant  => "vibrant",
            Design::Material => "material",
        }
    }

    /// Unknown names fall back to the default design.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|d| d.name() == name).unwrap_or_default()
    }

    pub fn palette(self) -> Palette {
        match self {
            Design::Academy => Palette {
                bg: "#f4f4f9", border: "#2c3e50", text: "#2c3e50", highlight: "#e74c3c",
            },
            Design::Minimal => Palette {
                bg: "#ffffff", border: "#ddd",    text: "#333",    highlight: "#007bff",
            },
            Design::Vibrant => Palette {
                bg: "#fffbf0", border: "#ff5722", text: "#333",    highlight: "#c2185b",
            },
            Design::Material => Palette {
                bg: "#f5f5f5", border: "#e0e0e0", text: "#424242", highlight: "#03dac5",
            },
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_design_is_academy() {
        assert_eq!(Design::from_name("neon"), Design::Academy);
        assert_eq!(Design::from_name(""), Design::Academy);
        assert_eq!(Design::from_name(" Vibrant "), Design::Vibrant);
        assert_eq!(Design::from_name("material"), Design::Material);
    }

    #[test]
    fn names_round_trip() {
        for d in Design::ALL {
            assert_eq!(Design::from_name(d.name()), d);
        }
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(Design::Material.next(), Design::Academy);
        assert_eq!(Design::Academy.prev(), Design::Material);
        assert_eq!(Design::Minimal.next().prev(), Design::Minimal);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_color("#2c3e50"), Color::Rgb(0x2c, 0x3e, 0x50));
        assert_eq!(hex_to_color("#ddd"), Color::Rgb(0xdd, 0xdd, 0xdd));
        assert_eq!(hex_to_color("#12"), Color::Reset);
        assert_eq!(hex_to_color("#zzzzzz"), Color::Reset);
    }

    #[test]
    fn palettes_are_distinct() {
        assert_eq!(Design::Minimal.palette().highlight, "#007bff");
        assert_ne!(Design::Academy.palette(), Design::Material.palette());
    }
}
