//! Bonus round world
//!
//! Owns every mini-game entity and advances them one fixed tick per frame.
//! Update order within a tick is platforms, hazards, player, target; later
//! updates read what earlier ones wrote.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{BonusOutcome, CollisionDetector, resolve_outcome};
use super::effects::ParticleEmitter;
use super::entity::{
    Entity, HazardEntity, PlatformEntity, PlayerEntity, ScriptedActor, Support, TickContext,
};
use super::scale::Tuning;
use super::spawn::{SpawnManager, SpawnRules};
use crate::consts::JUMP_PARTICLES;
use crate::render::{Color, Drawable, RenderCommand};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BonusInput {
    /// -1 left, 0 none, 1 right
    pub steer: i8,
    /// Jump pressed this frame
    pub jump: bool,
}

/// Drawables for each entity kind, resolved when the round starts
#[derive(Debug, Clone)]
pub struct BonusSprites {
    pub player: Drawable,
    pub platform: Drawable,
    pub hazard: Drawable,
    pub target: Drawable,
}

impl Default for BonusSprites {
    fn default() -> Self {
        Self {
            player: Drawable::Placeholder(Color::rgb(240, 160, 60)),
            platform: Drawable::Placeholder(Color::rgb(120, 90, 60)),
            hazard: Drawable::Placeholder(Color::rgb(200, 40, 40)),
            target: Drawable::Placeholder(Color::rgb(90, 150, 220)),
        }
    }
}

const JUMP_DUST: Color = Color::rgb(230, 230, 230);
const CATCH_SPARKLE: Color = Color::rgb(255, 220, 80);

pub struct BonusGame {
    pub tuning: Tuning,
    pub player: PlayerEntity,
    pub platforms: Vec<PlatformEntity>,
    pub hazards: Vec<HazardEntity>,
    pub target: ScriptedActor,
    pub particles: ParticleEmitter,
    rng: Pcg32,
    spawner: SpawnManager,
    ticks: u64,
    outcome: Option<BonusOutcome>,
}

impl BonusGame {
    /// Fresh round: player on the floor, one hazard already roaming
    pub fn new(tuning: Tuning, seed: u64, rules: SpawnRules) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut spawner = SpawnManager::new(rules);
        let target = ScriptedActor::new(&tuning, &mut rng);
        let player = PlayerEntity::new(&tuning);
        let first_hazard = spawner.next_hazard(&tuning, &player.rect);
        log::info!(
            "Bonus round started (seed {}, play area {}x{})",
            seed,
            tuning.screen.x,
            tuning.screen.y
        );
        Self {
            player,
            platforms: Vec::new(),
            hazards: vec![first_hazard],
            target,
            particles: ParticleEmitter::new(),
            rng,
            spawner,
            ticks: 0,
            outcome: None,
            tuning,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn outcome(&self) -> Option<BonusOutcome> {
        self.outcome
    }

    /// Advance one frame. Once an outcome is reached the world stops moving
    /// and keeps returning it.
    pub fn tick(&mut self, input: &BonusInput) -> Option<BonusOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.ticks += 1;

        let spawned = self.spawner.step(&self.tuning, &self.player.rect, &mut self.rng);
        if let Some(p) = spawned.platform {
            self.platforms.push(p);
        }
        if let Some(h) = spawned.hazard {
            self.hazards.push(h);
        }

        if input.jump && self.player.jump(&self.tuning).is_some() {
            let feet = self.player.rect.feet();
            self.particles.burst(
                &mut self.rng,
                feet,
                JUMP_PARTICLES,
                self.tuning.particle_speed,
                JUMP_DUST,
            );
        }

        let screen_h = self.tuning.screen.y;
        {
            let mut ctx = TickContext {
                tuning: &self.tuning,
                steer: input.steer,
                supports: &[],
                rng: &mut self.rng,
            };
            self.platforms.retain_mut(|p| {
                p.update(&mut ctx);
                !p.is_off_screen(screen_h)
            });
            for h in self.hazards.iter_mut() {
                h.update(&mut ctx);
            }
        }

        let supports: Vec<Support> = self.platforms.iter().map(|p| p.as_support()).collect();
        let mut ctx = TickContext {
            tuning: &self.tuning,
            steer: input.steer,
            supports: &supports,
            rng: &mut self.rng,
        };
        self.player.update(&mut ctx);
        self.target.update(&mut ctx);
        self.particles.update();

        let player = self.player.rect();
        let caught = CollisionDetector::intersects(&player, &self.target.rect());
        let hit = self
            .hazards
            .iter()
            .any(|h| CollisionDetector::intersects(&player, &h.rect()));

        self.outcome = resolve_outcome(caught, hit);
        match self.outcome {
            Some(BonusOutcome::Caught) => {
                let at = self.target.rect().center();
                self.particles.burst(
                    &mut self.rng,
                    at,
                    JUMP_PARTICLES * 2,
                    self.tuning.particle_speed,
                    CATCH_SPARKLE,
                );
                log::info!("Caught the tuna after {} ticks", self.ticks);
            }
            Some(BonusOutcome::HitHazard) => {
                log::info!("Hit a hazard after {} ticks", self.ticks);
            }
            None => {}
        }
        self.outcome
    }

    pub fn render(&self, sprites: &BonusSprites, offset: Vec2, out: &mut Vec<RenderCommand>) {
        for p in &self.platforms {
            p.render(&sprites.platform, offset, out);
        }
        for h in &self.hazards {
            h.render(&sprites.hazard, offset, out);
        }
        self.target.render(&sprites.target, offset, out);
        self.player.render(&sprites.player, offset, out);
        self.particles
            .render(offset, self.tuning.scale.apply(2.0), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use crate::sim::scale::ScaleFactor;

    fn quiet_rules() -> SpawnRules {
        SpawnRules {
            platform_min_interval: u32::MAX,
            platform_chance: 0.0,
            hazard_interval: u32::MAX,
        }
    }

    #[test]
    fn test_idle_player_is_hit_by_first_hazard() {
        let mut game = BonusGame::new(Tuning::default(), 5, SpawnRules::default());
        let mut outcome = None;
        for _ in 0..2000 {
            outcome = game.tick(&BonusInput::default());
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome, Some(BonusOutcome::HitHazard));
        // Frozen afterwards
        let t = game.ticks();
        assert_eq!(game.tick(&BonusInput::default()), Some(BonusOutcome::HitHazard));
        assert_eq!(game.ticks(), t);
    }

    #[test]
    fn test_hazard_does_not_spawn_on_player_at_wall() {
        let rules = SpawnRules {
            hazard_interval: 1,
            ..quiet_rules()
        };
        let mut game = BonusGame::new(Tuning::default(), 5, rules);
        game.hazards.clear();
        // The right wall is next in turn
        game.player.rect.pos.x = game.tuning.screen.x - game.player.rect.size.x;
        assert_eq!(game.tick(&BonusInput::default()), None);
        let h = &game.hazards[0];
        assert!(h.speed > 0.0);
        assert!(h.rect.right() < game.player.rect.left());
    }

    #[test]
    fn test_catching_target_wins() {
        let mut game = BonusGame::new(Tuning::default(), 5, quiet_rules());
        game.hazards.clear();
        game.target.rect.pos = game.player.rect.pos;
        game.target.waypoint = game.player.rect.pos;
        assert_eq!(game.tick(&BonusInput::default()), Some(BonusOutcome::Caught));
        assert!(!game.particles.is_empty());
    }

    #[test]
    fn test_simultaneous_contact_is_a_loss() {
        let mut game = BonusGame::new(Tuning::default(), 5, quiet_rules());
        let p = game.player.rect.pos;
        game.target.rect.pos = p;
        game.target.waypoint = p;
        game.hazards[0].rect.pos = Vec2::new(p.x, game.hazards[0].rect.pos.y);
        assert_eq!(game.tick(&BonusInput::default()), Some(BonusOutcome::HitHazard));
    }

    #[test]
    fn test_jump_emits_particles() {
        let mut game = BonusGame::new(Tuning::default(), 5, quiet_rules());
        game.hazards.clear();
        game.tick(&BonusInput {
            steer: 0,
            jump: true,
        });
        assert!(game.player.is_airborne);
        assert_eq!(game.particles.len(), JUMP_PARTICLES);
    }

    #[test]
    fn test_fallen_platforms_are_dropped() {
        let mut game = BonusGame::new(Tuning::default(), 5, quiet_rules());
        game.hazards.clear();
        game.platforms.push(PlatformEntity {
            rect: Rect::new(0.0, game.tuning.screen.y - 1.0, 120.0, 16.0),
            fall_speed: 2.0,
        });
        game.tick(&BonusInput::default());
        assert!(game.platforms.is_empty());
    }

    #[test]
    fn test_world_scales_with_tuning() {
        let small = BonusGame::new(Tuning::default(), 1, quiet_rules());
        let big = BonusGame::new(Tuning::new(ScaleFactor(2.0)), 1, quiet_rules());
        assert_eq!(big.player.rect.size, small.player.rect.size * 2.0);
        assert_eq!(big.hazards[0].speed, small.hazards[0].speed * 2.0);
    }

    #[test]
    fn test_render_emits_every_entity() {
        let mut game = BonusGame::new(Tuning::default(), 5, quiet_rules());
        game.platforms.push(PlatformEntity::spawn_at(10.0, &game.tuning));
        let mut out = Vec::new();
        game.render(&BonusSprites::default(), Vec2::new(10.0, 0.0), &mut out);
        // platform, hazard, target, player
        assert_eq!(out.len(), 4);
    }
}
