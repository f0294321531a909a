//! Game settings and preferences
//!
//! Persisted separately from game saves in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Color scheme for the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Palette {
    /// Green monochrome LCD
    #[default]
    Nokia,
    /// Black and white
    HighContrast,
}

impl Palette {
    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Nokia => "Nokia",
            Palette::HighContrast => "High Contrast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nokia" | "classic" => Some(Palette::Nokia),
            "high contrast" | "high-contrast" | "contrast" => Some(Palette::HighContrast),
            _ => None,
        }
    }
}

/// Tick intervals per game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub snake_ms: u32,
    pub pong_ms: u32,
    /// Tetris drop interval at level 1
    pub tetris_base_ms: u32,
    /// Reduction per level
    pub tetris_step_ms: u32,
    /// Floor for the drop interval
    pub tetris_min_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            snake_ms: SNAKE_INTERVAL_MS,
            pong_ms: PONG_INTERVAL_MS,
            tetris_base_ms: TETRIS_BASE_INTERVAL_MS,
            tetris_step_ms: TETRIS_INTERVAL_STEP_MS,
            tetris_min_ms: TETRIS_MIN_INTERVAL_MS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: Timing,

    // === Visual ===
    /// Draw grid lines on the Snake board
    pub show_grid: bool,
    pub palette: Palette,

    // === Gameplay ===
    /// Snake food respawns only on free cells
    pub snake_food_avoids_body: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            show_grid: true,
            palette: Palette::Nokia,
            snake_food_avoids_body: true,
        }
    }
}

impl Settings {
    /// Reject intervals the scheduler cannot run
    pub fn validate(&self) -> Result<(), SettingsError> {
        let t = &self.timing;
        for (name, value) in [
            ("timing.snake_ms", t.snake_ms),
            ("timing.pong_ms", t.pong_ms),
            ("timing.tetris_base_ms", t.tetris_base_ms),
            ("timing.tetris_min_ms", t.tetris_min_ms),
        ] {
            if value == 0 {
                return Err(SettingsError::Invalid {
                    name,
                    reason: "interval must be at least 1 ms".to_string(),
                });
            }
        }
        if t.tetris_min_ms > t.tetris_base_ms {
            return Err(SettingsError::Invalid {
                name: "timing.tetris_min_ms",
                reason: format!(
                    "floor {} is above the base interval {}",
                    t.tetris_min_ms, t.tetris_base_ms
                ),
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "retro_arcade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(json) = crate::platform::storage::get_item(Self::STORAGE_KEY) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        match self.to_json() {
            Ok(json) => {
                if crate::platform::storage::set_item(Self::STORAGE_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.timing.snake_ms, 150);
        assert_eq!(settings.timing.pong_ms, 16);
        assert_eq!(settings.palette, Palette::Nokia);
        assert!(settings.snake_food_avoids_body);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"palette":"HighContrast","timing":{"snake_ms":90}}"#)
            .unwrap();
        assert_eq!(settings.palette, Palette::HighContrast);
        assert_eq!(settings.timing.snake_ms, 90);
        assert_eq!(settings.timing.pong_ms, 16);
        assert!(settings.show_grid);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = Settings::from_json(r#"{"timing":{"pong_ms":0}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { name: "timing.pong_ms", .. }));
    }

    #[test]
    fn test_floor_above_base_is_rejected() {
        let mut settings = Settings::default();
        settings.timing.tetris_min_ms = 2000;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Malformed(_))
        ));
    }

    #[test]
    fn test_palette_names() {
        for palette in [Palette::Nokia, Palette::HighContrast] {
            assert_eq!(Palette::from_str(palette.as_str()), Some(palette));
        }
        assert_eq!(Palette::from_str("sepia"), None);
    }
}
