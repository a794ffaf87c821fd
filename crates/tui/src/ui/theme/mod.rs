//! Theme styling for the wizard.
//!
//! Two palettes are available: Dracula for truecolor terminals and an
//! ANSI 256-color approximation for everything else. Prefer the helpers in
//! [`theme_helpers`] over hard-coded colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod dracula;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::Ansi256Theme;
pub use dracula::DraculaTheme;
pub use roles::Theme;

/// Environment variable forcing a color mode (`truecolor` or `ansi256`).
pub const COLOR_MODE_ENV: &str = "ENROLL_COLOR_MODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme based on the terminal's color capability.
pub fn load() -> Box<dyn Theme> {
    match detect_color_capability() {
        ColorCapability::Truecolor => Box::new(DraculaTheme::new()),
        ColorCapability::Ansi256 => {
            debug!("ANSI-only terminal detected; using fallback palette");
            Box::new(Ansi256Theme::new())
        }
    }
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var(COLOR_MODE_ENV).ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_color_mode_wins() {
        temp_env::with_vars([(COLOR_MODE_ENV, Some("ansi256")), ("COLORTERM", Some("truecolor"))], || {
            assert_eq!(detect_color_capability(), ColorCapability::Ansi256);
        });
    }

    #[test]
    fn colorterm_enables_truecolor() {
        temp_env::with_vars([(COLOR_MODE_ENV, None), ("COLORTERM", Some("24bit"))], || {
            assert_eq!(detect_color_capability(), ColorCapability::Truecolor);
        });
    }

    #[test]
    fn plain_terminals_fall_back_to_ansi() {
        temp_env::with_vars(
            [(COLOR_MODE_ENV, None::<&str>), ("COLORTERM", None), ("TERM", Some("xterm-256color"))],
            || {
                assert_eq!(detect_color_capability(), ColorCapability::Ansi256);
            },
        );
    }
}
