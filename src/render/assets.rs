//! Image lookup with placeholder fallback
//!
//! Screens resolve their images once, on entry. A missing or broken image is
//! never fatal: it becomes a solid placeholder rectangle and is logged once.

use std::collections::HashMap;

use thiserror::Error;

use super::{Color, Drawable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset `{0}` not found")]
    NotFound(String),
    #[error("asset `{name}` failed to decode: {reason}")]
    Decode { name: String, reason: String },
}

/// Basic facts about a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Host-side image loader
pub trait AssetProvider {
    fn load_image(&mut self, name: &str) -> Result<ImageInfo, AssetError>;
}

/// Provider for hosts without an image backend; every lookup falls back
#[derive(Debug, Default)]
pub struct NoAssets;

impl AssetProvider for NoAssets {
    fn load_image(&mut self, name: &str) -> Result<ImageInfo, AssetError> {
        Err(AssetError::NotFound(name.to_string()))
    }
}

/// Memoizes lookups so each name hits the provider (and the log) once
pub struct AssetCache {
    provider: Box<dyn AssetProvider>,
    resolved: HashMap<String, Drawable>,
}

impl AssetCache {
    pub fn new(provider: Box<dyn AssetProvider>) -> Self {
        Self {
            provider,
            resolved: HashMap::new(),
        }
    }

    /// Drawable for `name`, or a `fallback`-colored placeholder if it can't be loaded
    pub fn drawable(&mut self, name: &str, fallback: Color) -> Drawable {
        if let Some(d) = self.resolved.get(name) {
            return d.clone();
        }
        let drawable = match self.provider.load_image(name) {
            Ok(info) => {
                log::debug!("Loaded image {} ({}x{})", name, info.width, info.height);
                Drawable::Image(name.to_string())
            }
            Err(e) => {
                log::warn!("{}; using placeholder", e);
                Drawable::Placeholder(fallback)
            }
        };
        self.resolved.insert(name.to_string(), drawable.clone());
        drawable
    }
}
