//! Per-user preference values.

use crate::error::CoreError;

pub const THEME_SYSTEM: &str = "system";
pub const THEME_LIGHT: &str = "light";
pub const THEME_DARK: &str = "dark";

/// All valid theme preferences.
pub const VALID_THEMES: &[&str] = &[THEME_SYSTEM, THEME_LIGHT, THEME_DARK];

/// Validate that a theme string is one of the accepted values.
pub fn validate_theme(theme: &str) -> Result<(), CoreError> {
    if VALID_THEMES.contains(&theme) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid theme '{theme}'. Must be one of: {}",
            VALID_THEMES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes() {
        for theme in VALID_THEMES {
            assert!(validate_theme(theme).is_ok());
        }
        assert!(validate_theme("sepia").is_err());
    }
}
