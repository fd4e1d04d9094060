//! Runtime configuration
//!
//! Owned by the host and handed to the controller explicitly; changes made
//! from the Options screen come back through the same struct. Persisted as
//! JSON next to the executable (or wherever the host points it).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::Color;
use crate::sim::Resolution;

/// Resolutions offered in Options; anything else is clamped to the nearest
pub const SUPPORTED_RESOLUTIONS: [Resolution; 7] = [
    Resolution::new(800, 600),
    Resolution::new(1024, 768),
    Resolution::new(1280, 720),
    Resolution::new(1280, 800),
    Resolution::new(1366, 768),
    Resolution::new(1600, 900),
    Resolution::new(1920, 1080),
];

/// Nearest supported entry by |dw| + |dh|
pub fn nearest_supported(requested: Resolution) -> Resolution {
    let dist = |r: &Resolution| {
        (r.width as i64 - requested.width as i64).abs()
            + (r.height as i64 - requested.height as i64).abs()
    };
    SUPPORTED_RESOLUTIONS
        .iter()
        .copied()
        .min_by_key(dist)
        .unwrap_or(Resolution::reference())
}

/// The supported entry after `current` (wrapping); unsupported values restart the list
pub fn next_supported(current: Resolution) -> Resolution {
    match SUPPORTED_RESOLUTIONS.iter().position(|r| *r == current) {
        Some(i) => SUPPORTED_RESOLUTIONS[(i + 1) % SUPPORTED_RESOLUTIONS.len()],
        None => SUPPORTED_RESOLUTIONS[0],
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("config format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Color theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeName {
    #[default]
    Classic,
    Night,
    Pastel,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Classic, ThemeName::Night, ThemeName::Pastel];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Classic => "Classic",
            ThemeName::Night => "Night",
            ThemeName::Pastel => "Pastel",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn theme(self) -> Theme {
        match self {
            ThemeName::Classic => Theme {
                background: Color::rgb(24, 60, 110),
                text: Color::WHITE,
                accent: Color::rgb(255, 200, 40),
                button: Color::rgb(40, 90, 160),
            },
            ThemeName::Night => Theme {
                background: Color::rgb(12, 12, 20),
                text: Color::rgb(220, 220, 230),
                accent: Color::rgb(120, 200, 255),
                button: Color::rgb(40, 40, 60),
            },
            ThemeName::Pastel => Theme {
                background: Color::rgb(250, 232, 240),
                text: Color::rgb(60, 50, 70),
                accent: Color::rgb(240, 120, 160),
                button: Color::rgb(200, 220, 250),
            },
        }
    }
}

/// Colors every screen draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub button: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Output resolution (always one of `SUPPORTED_RESOLUTIONS` after `sanitize`)
    pub resolution: Resolution,
    pub theme: ThemeName,
    /// Font family name passed through to the host
    pub font: String,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Seed for problem generation and the bonus round
    pub seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::reference(),
            theme: ThemeName::Classic,
            font: "sans-serif".to_string(),
            music_volume: 0.7,
            seed: 0x5EED,
        }
    }
}

impl RuntimeConfig {
    /// Clamp every field into its valid range
    pub fn sanitize(mut self) -> Self {
        let res = nearest_supported(self.resolution);
        if res != self.resolution {
            log::warn!("Resolution {} unsupported, using {}", self.resolution, res);
            self.resolution = res;
        }
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    /// Load from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config.sanitize()
            }
            Err(e) => {
                log::info!("Using default config ({})", e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Config saved");
        Ok(())
    }
}
