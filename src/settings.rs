//! Session settings
//!
//! Persisted as JSON. Every field has a default so partial files work.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RevealError;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Text ===
    /// Lines of hidden text, top to bottom
    pub text_lines: Vec<String>,
    /// Glyph size in pixels
    pub font_size: f32,
    /// Distance between line centers in pixels
    pub line_spacing: f32,
    /// Outline stroke width in pixels
    pub stroke_width: f32,
    /// Font file to use instead of system fonts
    pub font_path: Option<PathBuf>,

    // === Particle engine ===
    /// Particles spawned at start
    pub particle_count: usize,
    /// Pull toward attraction surfaces (0 disables)
    pub attraction_strength: f32,
    /// Particles follow the pointer
    pub mouse_enabled: bool,
    /// Particle-particle collisions
    pub collisions_enabled: bool,

    // === Determinism ===
    /// Fixed RNG seed; wall clock when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text_lines: vec!["Vanessa".to_string(), "Will you be my Valentine?".to_string()],
            font_size: 120.0,
            line_spacing: 140.0,
            stroke_width: 4.0,
            font_path: None,

            // Gravity and mouse attraction are off; particles only bounce
            particle_count: 1500,
            attraction_strength: 0.0,
            mouse_enabled: false,
            collisions_enabled: true,

            seed: None,
        }
    }
}

impl Settings {
    /// Reject settings that cannot produce a session
    pub fn validate(&self) -> Result<(), RevealError> {
        if self.text_lines.is_empty() {
            return Err(RevealError::InvalidSettings("at least one text line is required".into()));
        }
        for (name, value) in [
            ("font_size", self.font_size),
            ("line_spacing", self.line_spacing),
            ("stroke_width", self.stroke_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RevealError::InvalidSettings(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !self.attraction_strength.is_finite() {
            return Err(RevealError::InvalidSettings(
                "attraction_strength must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from a JSON file.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, RevealError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(RevealError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| RevealError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), RevealError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| RevealError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| RevealError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glyph_reveal_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.text_lines.len(), 2);
        assert_eq!(settings.font_size, 120.0);
        assert_eq!(settings.line_spacing, 140.0);
    }

    #[test]
    fn test_validate_rejects_empty_text() {
        let settings = Settings {
            text_lines: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(RevealError::InvalidSettings(_))));
    }

    #[test]
    fn test_validate_rejects_bad_font_size() {
        for font_size in [0.0, -3.0, f32::NAN] {
            let settings = Settings {
                font_size,
                ..Default::default()
            };
            assert!(settings.validate().is_err(), "font_size {} accepted", font_size);
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"text_lines": ["Hi"]}"#).unwrap();
        assert_eq!(settings.text_lines, vec!["Hi".to_string()]);
        assert_eq!(settings.particle_count, 1500);
        assert!(!settings.mouse_enabled);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let settings = Settings {
            text_lines: vec!["Hello".into()],
            seed: Some(7),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{ not json").unwrap();
        let result = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(RevealError::SettingsParse { .. })));
    }
}
