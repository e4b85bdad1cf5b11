use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Visual theme preference. `System` leaves the terminal's own colors in
/// place; the other two force a palette. Persisted via the config store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    System,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::System
    }
}

impl ThemeMode {
    /// The cycle order used by the in-app theme key.
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::System,
            ThemeMode::System => ThemeMode::Light,
        }
    }
}

/// Resolved colors handed to the renderer. The calculator core never sees
/// this; it is passed explicitly from the app into drawing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Palette {
                background: Color::White,
                text: Color::Black,
                dim: Color::DarkGray,
                accent: Color::Blue,
                error: Color::Red,
            },
            ThemeMode::Dark => Palette {
                background: Color::Black,
                text: Color::White,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                error: Color::LightRed,
            },
            ThemeMode::System => Palette {
                background: Color::Reset,
                text: Color::Reset,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                error: Color::Red,
            },
        }
    }
}
