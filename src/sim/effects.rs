//! Timed fades and decorative particles
//!
//! Neither affects gameplay. Fades gate automatic screen changes; particles
//! are pure decoration spawned on jumps and catches.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_PARTICLES, PARTICLE_MAX_LIFETIME, PARTICLE_MIN_LIFETIME};
use crate::render::{Color, RenderCommand};

/// Three-phase opacity timer: ramp up, hold, ramp down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeEffect {
    fade_in_ms: u64,
    hold_ms: u64,
    fade_out_ms: u64,
    start_ms: u64,
}

impl FadeEffect {
    pub fn new(fade_in_ms: u64, hold_ms: u64, fade_out_ms: u64, start_ms: u64) -> Self {
        Self {
            fade_in_ms,
            hold_ms,
            fade_out_ms,
            start_ms,
        }
    }

    pub fn from_timings((fade_in, hold, fade_out): (u64, u64, u64), start_ms: u64) -> Self {
        Self::new(fade_in, hold, fade_out, start_ms)
    }

    /// Replay the same timings from a new start (next slide, next credit line)
    pub fn restart(&mut self, start_ms: u64) {
        self.start_ms = start_ms;
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn total_ms(&self) -> u64 {
        self.fade_in_ms + self.hold_ms + self.fade_out_ms
    }

    /// Opacity at `now_ms`, 0..=255
    pub fn alpha(&self, now_ms: u64) -> u8 {
        if now_ms < self.start_ms {
            return 0;
        }
        let t = now_ms - self.start_ms;
        if t < self.fade_in_ms {
            return ramp(t, self.fade_in_ms);
        }
        let t = t - self.fade_in_ms;
        if t < self.hold_ms {
            return 255;
        }
        let t = t - self.hold_ms;
        if t < self.fade_out_ms {
            return 255 - ramp(t, self.fade_out_ms);
        }
        0
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        now_ms >= self.start_ms && now_ms - self.start_ms >= self.total_ms()
    }
}

/// Linear 0..255 over `span`, for `t < span`
#[inline]
fn ramp(t: u64, span: u64) -> u8 {
    ((t * 255) / span).min(255) as u8
}

/// A short-lived decorative point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Frames left
    pub lifetime: i32,
}

impl Particle {
    /// Integrate one frame. No gravity, no collision.
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.lifetime -= 1;
    }

    pub fn is_dead(&self) -> bool {
        self.lifetime <= 0
    }
}

/// Owns the live particles of one screen
#[derive(Debug, Clone, Default)]
pub struct ParticleEmitter {
    pub particles: Vec<Particle>,
}

impl ParticleEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spray `count` particles from `origin` in random directions
    pub fn burst<R: Rng>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        count: usize,
        max_speed: f32,
        color: Color,
    ) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(0.25..=1.0) * max_speed;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                lifetime: rng.random_range(PARTICLE_MIN_LIFETIME..=PARTICLE_MAX_LIFETIME),
            });
        }
    }

    pub fn update(&mut self) {
        for p in self.particles.iter_mut() {
            p.update();
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn render(&self, offset: Vec2, radius: f32, out: &mut Vec<RenderCommand>) {
        for p in &self.particles {
            // Fade out over the last 20 frames
            let a = (p.lifetime.clamp(0, 20) * 255 / 20) as u8;
            out.push(RenderCommand::Point {
                pos: p.pos + offset,
                radius,
                color: p.color.with_alpha(a),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_fade_phase_boundaries() {
        let fade = FadeEffect::new(1000, 2000, 500, 0);
        assert_eq!(fade.alpha(0), 0);
        assert_eq!(fade.alpha(500), 127);
        assert_eq!(fade.alpha(1000), 255);
        assert_eq!(fade.alpha(2000), 255);
        assert_eq!(fade.alpha(3000), 255);
        assert_eq!(fade.alpha(3250), 128);
        assert_eq!(fade.alpha(3500), 0);
        assert_eq!(fade.alpha(10_000), 0);
    }

    #[test]
    fn test_fade_before_start_is_transparent() {
        let fade = FadeEffect::new(100, 100, 100, 5000);
        assert_eq!(fade.alpha(0), 0);
        assert_eq!(fade.alpha(4999), 0);
        assert!(!fade.is_finished(4999));
    }

    #[test]
    fn test_fade_restart_replays() {
        let mut fade = FadeEffect::new(100, 100, 100, 0);
        assert!(fade.is_finished(300));
        fade.restart(300);
        assert!(!fade.is_finished(300));
        assert_eq!(fade.alpha(400), 255);
        assert!(fade.is_finished(600));
    }

    #[test]
    fn test_zero_length_phases() {
        let fade = FadeEffect::new(0, 100, 0, 0);
        assert_eq!(fade.alpha(0), 255);
        assert_eq!(fade.alpha(100), 0);
        assert!(fade.is_finished(100));
    }

    #[test]
    fn test_particle_dies_after_lifetime() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            color: Color::WHITE,
            lifetime: 3,
        };
        p.update();
        p.update();
        assert!(!p.is_dead());
        p.update();
        assert!(p.is_dead());
        assert_eq!(p.pos, Vec2::new(3.0, -6.0));
    }

    #[test]
    fn test_emitter_removes_dead_particles() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut emitter = ParticleEmitter::new();
        emitter.burst(&mut rng, Vec2::new(10.0, 10.0), 12, 3.0, Color::WHITE);
        assert_eq!(emitter.len(), 12);
        for _ in 0..PARTICLE_MAX_LIFETIME {
            emitter.update();
        }
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_emitter_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut emitter = ParticleEmitter::new();
        emitter.burst(&mut rng, Vec2::ZERO, MAX_PARTICLES + 50, 1.0, Color::WHITE);
        assert_eq!(emitter.len(), MAX_PARTICLES);
    }

    proptest! {
        #[test]
        fn fade_endpoints_hold(fade_in in 1u64..5000, hold in 0u64..5000, fade_out in 1u64..5000, now in 0u64..20_000) {
            let fade = FadeEffect::new(fade_in, hold, fade_out, 0);
            let total = fade_in + hold + fade_out;
            prop_assert_eq!(fade.alpha(0), 0);
            prop_assert_eq!(fade.alpha(fade_in), 255);
            prop_assert_eq!(fade.alpha(fade_in + hold), 255);
            prop_assert_eq!(fade.alpha(total), 0);
            prop_assert_eq!(fade.is_finished(now), now >= total);
        }
    }
}
