//! Render command list
//!
//! The core never draws. Each frame it hands the host an ordered list of
//! commands in output-pixel coordinates; the host replays them on whatever
//! backend it owns.

pub mod assets;

pub use assets::{AssetCache, AssetError, AssetProvider, ImageInfo, NoAssets};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Rect;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Something the host can blit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Drawable {
    /// A loaded image, by logical name
    Image(String),
    /// Solid rectangle standing in for an image that failed to load
    Placeholder(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    Sprite {
        drawable: Drawable,
        rect: Rect,
        /// Presentation-only rotation, degrees
        rotation_deg: f32,
        flip_x: bool,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
    },
    Point {
        pos: Vec2,
        radius: f32,
        color: Color,
    },
}

pub type RenderList = Vec<RenderCommand>;

/// Centered text helper used by every text screen
pub fn centered_text(text: impl Into<String>, pos: Vec2, size: f32, color: Color) -> RenderCommand {
    RenderCommand::Text {
        text: text.into(),
        pos,
        size,
        color,
        align: TextAlign::Center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alpha_keeps_rgb() {
        let c = Color::rgb(10, 20, 30).with_alpha(128);
        assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 128));
    }
}
