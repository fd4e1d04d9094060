//! Number Cat - arithmetic flashcards with a platformer bonus round
//!
//! Core modules:
//! - `sim`: Deterministic bonus-game simulation (entities, collisions, spawning, effects)
//! - `flow`: Screen-to-screen state machine driven one frame at a time
//! - `platform`: Host input model
//! - `render`: Render command list and asset fallback
//! - `audio`, `persistence`: Collaborator interfaces invoked at state boundaries
//! - `settings`: Runtime configuration

pub mod audio;
pub mod flow;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use flow::{Collaborators, FrameOutput, GameFlowController, GameStateTag, Signal};
pub use settings::RuntimeConfig;

/// Reference design constants
///
/// Everything measured in pixels is authored against `REFERENCE_WIDTH` x
/// `REFERENCE_HEIGHT` and must go through `sim::Tuning` before use.
pub mod consts {
    /// Design canvas
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 600.0;

    /// Frame rate for menus and text screens
    pub const MENU_FPS: u32 = 30;
    /// Frame rate for the bonus round (physics constants are per frame at this rate)
    pub const MINIGAME_FPS: u32 = 60;

    /// Player physics (px/frame, px/frame²)
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_IMPULSE: f32 = -11.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    /// Cosmetic tilt while airborne (degrees)
    pub const JUMP_ANGLE_MAX: f32 = 45.0;
    pub const JUMP_ANGLE_RATE: f32 = 3.0;

    /// Falling platforms
    pub const PLATFORM_WIDTH: f32 = 120.0;
    pub const PLATFORM_HEIGHT: f32 = 16.0;
    pub const PLATFORM_FALL_SPEED: f32 = 2.0;

    /// Floor hazards
    pub const HAZARD_WIDTH: f32 = 36.0;
    pub const HAZARD_HEIGHT: f32 = 36.0;
    pub const HAZARD_SPEED: f32 = 4.0;

    /// The roaming target (a tuna) the player must catch
    pub const TARGET_WIDTH: f32 = 44.0;
    pub const TARGET_HEIGHT: f32 = 28.0;
    pub const TARGET_SPEED: f32 = 3.0;
    /// Fraction of the play area height the target roams in, measured from the top
    pub const TARGET_BAND: f32 = 0.4;

    /// Spawn timing (frames, unitless)
    pub const PLATFORM_MIN_INTERVAL: u32 = 40;
    pub const PLATFORM_SPAWN_CHANCE: f64 = 0.06;
    pub const HAZARD_INTERVAL: u32 = 600;

    /// Particle bursts
    pub const JUMP_PARTICLES: usize = 12;
    pub const PARTICLE_SPEED: f32 = 3.0;
    pub const PARTICLE_MIN_LIFETIME: i32 = 20;
    pub const PARTICLE_MAX_LIFETIME: i32 = 40;
    pub const MAX_PARTICLES: usize = 256;

    /// Fade timings (ms): in, hold, out
    pub const INTRO_FADE: (u64, u64, u64) = (1000, 2000, 1000);
    pub const SLIDE_FADE: (u64, u64, u64) = (600, 2500, 600);

    /// Questions per drill
    pub const DRILL_LENGTH: usize = 10;
}
