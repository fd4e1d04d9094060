//! Resolution-independent scaling
//!
//! All gameplay constants are authored against the reference resolution. The
//! scaler turns the active output resolution into a single `ScaleFactor`, and
//! `Tuning` is the only place reference constants are multiplied by it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// An output resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The design resolution every constant is authored against
    pub const fn reference() -> Self {
        Self::new(REFERENCE_WIDTH as u32, REFERENCE_HEIGHT as u32)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Uniform multiplier from reference pixels to active pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactor(pub f32);

impl ScaleFactor {
    pub const IDENTITY: ScaleFactor = ScaleFactor(1.0);

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn apply(self, v: f32) -> f32 {
        v * self.0
    }

    #[inline]
    pub fn apply_vec(self, v: Vec2) -> Vec2 {
        v * self.0
    }

    /// Top-left margin that centres the scaled play area inside `active`
    pub fn offset(self, reference: Resolution, active: Resolution) -> Vec2 {
        let play = reference.size() * self.0;
        ((active.size() - play) * 0.5).max(Vec2::ZERO)
    }
}

/// Scale factor that fits `reference` inside `active` without distorting it.
///
/// Uses the smaller axis ratio so the scaled canvas never overflows either
/// axis of the output.
pub fn compute_scale(reference: Resolution, active: Resolution) -> ScaleFactor {
    let sx = active.width as f32 / reference.width as f32;
    let sy = active.height as f32 / reference.height as f32;
    ScaleFactor(sx.min(sy))
}

/// Holds the current scale. Only `set_active` changes it.
#[derive(Debug, Clone)]
pub struct ResolutionScaler {
    reference: Resolution,
    active: Resolution,
    scale: ScaleFactor,
}

impl ResolutionScaler {
    pub fn new(reference: Resolution, active: Resolution) -> Self {
        let scale = compute_scale(reference, active);
        log::info!("Scale {} -> {}: {:.3}", reference, active, scale.0);
        Self {
            reference,
            active,
            scale,
        }
    }

    /// Recompute the factor for a new output resolution.
    /// Returns false (and does nothing) when the resolution is unchanged.
    pub fn set_active(&mut self, active: Resolution) -> bool {
        if active == self.active {
            return false;
        }
        self.active = active;
        self.scale = compute_scale(self.reference, active);
        log::info!("Rescaled for {}: {:.3}", active, self.scale.0);
        true
    }

    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    pub fn reference(&self) -> Resolution {
        self.reference
    }

    pub fn active(&self) -> Resolution {
        self.active
    }

    /// Letterbox margin for the current resolution
    pub fn offset(&self) -> Vec2 {
        self.scale.offset(self.reference, self.active)
    }

    pub fn tuning(&self) -> Tuning {
        Tuning::new(self.scale)
    }
}

/// Every pixel-valued gameplay constant, already multiplied by the scale factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub scale: ScaleFactor,
    /// Play area (scaled reference canvas)
    pub screen: Vec2,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub player_speed: f32,
    pub player_size: Vec2,
    pub platform_size: Vec2,
    pub platform_fall_speed: f32,
    pub hazard_size: Vec2,
    pub hazard_speed: f32,
    pub target_size: Vec2,
    pub target_speed: f32,
    pub particle_speed: f32,
}

impl Tuning {
    pub fn new(scale: ScaleFactor) -> Self {
        let s = |v: f32| scale.apply(v);
        let sv = |x: f32, y: f32| scale.apply_vec(Vec2::new(x, y));
        Self {
            scale,
            screen: sv(REFERENCE_WIDTH, REFERENCE_HEIGHT),
            gravity: s(GRAVITY),
            jump_impulse: s(JUMP_IMPULSE),
            player_speed: s(PLAYER_SPEED),
            player_size: sv(PLAYER_WIDTH, PLAYER_HEIGHT),
            platform_size: sv(PLATFORM_WIDTH, PLATFORM_HEIGHT),
            platform_fall_speed: s(PLATFORM_FALL_SPEED),
            hazard_size: sv(HAZARD_WIDTH, HAZARD_HEIGHT),
            hazard_speed: s(HAZARD_SPEED),
            target_size: sv(TARGET_WIDTH, TARGET_HEIGHT),
            target_speed: s(TARGET_SPEED),
            particle_speed: s(PARTICLE_SPEED),
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::new(ScaleFactor::IDENTITY)
    }
}
