//! Theme settings and the terminal palette derived from them.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::consts::DEFAULT_THEME_COLOR;

/// Light or dark rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => bail!("unknown theme mode: {other} (expected light or dark)"),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RGB accent colour, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("invalid colour: {s} (expected #RRGGBB)");
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        // The constant is a valid literal; the fallback only guards edits to it.
        DEFAULT_THEME_COLOR.parse().unwrap_or(Color {
            r: 0x03,
            g: 0xC9,
            b: 0xD7,
        })
    }
}

/// User-chosen look of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Theme {
    pub color: Color,
    pub mode: ThemeMode,
}

/// Turns a theme into ANSI escapes. A plain palette emits no escapes at all.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    theme: Theme,
    enabled: bool,
}

const RESET: &str = "\x1b[0m";

impl Palette {
    pub fn new(theme: Theme, enabled: bool) -> Self {
        Self { theme, enabled }
    }

    /// No colours, for tests and non-terminal output.
    pub fn plain() -> Self {
        Self::new(Theme::default(), false)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Bold text in the accent colour.
    pub fn heading(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let Color { r, g, b } = self.theme.color;
        format!("\x1b[1;38;2;{r};{g};{b}m{text}{RESET}")
    }

    /// White on red, for rows and banners that need attention.
    pub fn danger(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("\x1b[1;97;41m{text}{RESET}")
    }

    /// Shade every other table row. Dark mode dims, light mode uses a grey band.
    pub fn stripe(&self, index: usize, text: &str) -> String {
        if !self.enabled || index % 2 == 0 {
            return text.to_string();
        }
        match self.theme.mode {
            ThemeMode::Light => format!("\x1b[48;5;254m{text}{RESET}"),
            ThemeMode::Dark => format!("\x1b[2m{text}{RESET}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colour() {
        let c: Color = "#1A97F5".parse().unwrap();
        assert_eq!(c, Color { r: 0x1A, g: 0x97, b: 0xF5 });
        assert_eq!(c.to_string(), "#1A97F5");
    }

    #[test]
    fn colour_without_hash_is_accepted() {
        let c: Color = "7352ff".parse().unwrap();
        assert_eq!(c.to_string(), "#7352FF");
    }

    #[test]
    fn rejects_bad_colour() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
    }

    #[test]
    fn default_colour_matches_constant() {
        assert_eq!(Color::default().to_string(), DEFAULT_THEME_COLOR);
    }

    #[test]
    fn parses_mode_case_insensitively() {
        assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert_eq!("light".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn plain_palette_emits_no_escapes() {
        let p = Palette::plain();
        assert_eq!(p.heading("Title"), "Title");
        assert_eq!(p.danger("Leak"), "Leak");
        assert_eq!(p.stripe(1, "row"), "row");
    }

    #[test]
    fn coloured_heading_uses_accent() {
        let theme = Theme {
            color: "#FF5C8E".parse().unwrap(),
            mode: ThemeMode::Dark,
        };
        let p = Palette::new(theme, true);
        assert!(p.heading("x").contains("38;2;255;92;142"));
    }

    #[test]
    fn stripe_leaves_even_rows_alone() {
        let p = Palette::new(Theme::default(), true);
        assert_eq!(p.stripe(0, "row"), "row");
        assert_ne!(p.stripe(1, "row"), "row");
    }
}
