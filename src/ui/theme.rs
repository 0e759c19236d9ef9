//! Color themes.
//!
//! Two palettes selected by a persisted [`ThemeMode`]; the preference
//! lives under its own storage key, independent of the state blob.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Persisted theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// Resolved palette for one mode.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub user: Color,
    pub model: Color,
    pub error: Color,
    pub loading: Color,
}

impl Theme {
    /// Palette for a mode.
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                border: Color::DarkGray,
                border_focused: Color::Cyan,
                text: Color::White,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                user: Color::LightGreen,
                model: Color::White,
                error: Color::Red,
                loading: Color::Yellow,
            },
            ThemeMode::Light => Self {
                border: Color::Gray,
                border_focused: Color::Blue,
                text: Color::Black,
                dim: Color::Gray,
                accent: Color::Blue,
                user: Color::Green,
                model: Color::Black,
                error: Color::Red,
                loading: Color::Magenta,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }

    #[test]
    fn test_theme_mode_serialization() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
        let mode: ThemeMode = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(mode, ThemeMode::Light);
    }
}
