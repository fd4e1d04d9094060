//! Time- and chance-gated spawning for the bonus round
//!
//! Platforms: once the minimum interval has passed, every frame rolls a
//! Bernoulli trial until one succeeds. Hazards: one more every fixed interval.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{CollisionDetector, Rect};
use super::entity::{HazardEntity, PlatformEntity};
use super::scale::Tuning;
use crate::consts::{HAZARD_INTERVAL, PLATFORM_MIN_INTERVAL, PLATFORM_SPAWN_CHANCE};

/// Spawn timing knobs (frames, probability)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRules {
    pub platform_min_interval: u32,
    pub platform_chance: f64,
    pub hazard_interval: u32,
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            platform_min_interval: PLATFORM_MIN_INTERVAL,
            platform_chance: PLATFORM_SPAWN_CHANCE,
            hazard_interval: HAZARD_INTERVAL,
        }
    }
}

/// What a single frame produced
#[derive(Debug, Default)]
pub struct Spawned {
    pub platform: Option<PlatformEntity>,
    pub hazard: Option<HazardEntity>,
}

#[derive(Debug, Clone)]
pub struct SpawnManager {
    rules: SpawnRules,
    frames_since_platform: u32,
    frames_since_hazard: u32,
    hazards_spawned: u32,
}

impl SpawnManager {
    pub fn new(rules: SpawnRules) -> Self {
        Self {
            rules,
            frames_since_platform: 0,
            frames_since_hazard: 0,
            hazards_spawned: 0,
        }
    }

    /// Advance the timers by one frame and roll for new entities
    pub fn step(&mut self, tuning: &Tuning, player: &Rect, rng: &mut Pcg32) -> Spawned {
        let mut out = Spawned::default();

        self.frames_since_platform = self.frames_since_platform.saturating_add(1);
        if self.frames_since_platform >= self.rules.platform_min_interval
            && rng.random_bool(self.rules.platform_chance)
        {
            let max_x = (tuning.screen.x - tuning.platform_size.x).max(0.0);
            let x = rng.random::<f32>() * max_x;
            out.platform = Some(PlatformEntity::spawn_at(x, tuning));
            self.frames_since_platform = 0;
        }

        self.frames_since_hazard += 1;
        if self.frames_since_hazard >= self.rules.hazard_interval {
            out.hazard = Some(self.next_hazard(tuning, player));
            self.frames_since_hazard = 0;
        }

        out
    }

    /// Hazards alternate entering from the left and right walls. A wall the
    /// player stands within one hazard width of is skipped for the other one.
    pub fn next_hazard(&mut self, tuning: &Tuning, player: &Rect) -> HazardEntity {
        let mut from_left = self.hazards_spawned % 2 == 0;
        self.hazards_spawned += 1;
        if Self::entry_blocked(from_left, tuning, player) {
            from_left = !from_left;
        }
        log::debug!("Hazard #{} from the {}", self.hazards_spawned, if from_left { "left" } else { "right" });
        HazardEntity::spawn_on_floor(from_left, tuning)
    }

    /// Floor strip two hazard widths wide against the given wall
    fn entry_blocked(from_left: bool, tuning: &Tuning, player: &Rect) -> bool {
        let size = tuning.hazard_size;
        let x = if from_left { 0.0 } else { tuning.screen.x - 2.0 * size.x };
        let zone = Rect::new(x, tuning.screen.y - size.y, 2.0 * size.x, size.y);
        CollisionDetector::intersects(&zone, player)
    }
}
