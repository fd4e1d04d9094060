//! Deterministic bonus-round simulation
//!
//! All mini-game logic lives here. This module must stay pure and deterministic:
//! - One fixed tick per frame, constants in per-frame units
//! - Seeded RNG only
//! - Every pixel constant routed through `Tuning`
//! - No platform dependencies; rendering only emits commands

pub mod bonus;
pub mod clock;
pub mod collision;
pub mod effects;
pub mod entity;
pub mod scale;
pub mod spawn;

pub use bonus::{BonusGame, BonusInput, BonusSprites};
pub use clock::{Clock, ClockMode, SimulationClock, SystemClock, VirtualClock};
pub use collision::{BonusOutcome, CollisionDetector, Rect, resolve_outcome};
pub use effects::{FadeEffect, Particle, ParticleEmitter};
pub use entity::{
    Entity, Facing, HazardEntity, JumpKind, PlatformEntity, PlayerEntity, ScriptedActor, Support,
    TickContext,
};
pub use scale::{Resolution, ResolutionScaler, ScaleFactor, Tuning, compute_scale};
pub use spawn::{SpawnManager, SpawnRules, Spawned};
