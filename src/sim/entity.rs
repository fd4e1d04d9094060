//! Bonus-round entities
//!
//! Every entity is an axis-aligned box with a velocity. Positions are in
//! play-area pixels (already scaled); the letterbox offset is applied only
//! when rendering.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{CollisionDetector, Rect};
use super::scale::Tuning;
use crate::consts::{JUMP_ANGLE_MAX, JUMP_ANGLE_RATE, TARGET_BAND};
use crate::render::{Drawable, RenderCommand};

/// Horizontal orientation (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Something a falling player can land on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    pub rect: Rect,
    /// Distance the surface moved down this tick
    pub fall_speed: f32,
}

/// Per-tick inputs shared by every entity update
pub struct TickContext<'a> {
    pub tuning: &'a Tuning,
    /// Horizontal steering: -1, 0 or 1
    pub steer: i8,
    /// Landing surfaces, already moved for this tick
    pub supports: &'a [Support],
    pub rng: &'a mut Pcg32,
}

/// Shared capability of everything in the bonus round
pub trait Entity {
    fn rect(&self) -> Rect;
    fn velocity(&self) -> Vec2;
    fn update(&mut self, ctx: &mut TickContext<'_>);

    fn render(&self, sprite: &Drawable, offset: Vec2, out: &mut Vec<RenderCommand>) {
        out.push(RenderCommand::Sprite {
            drawable: sprite.clone(),
            rect: self.rect().translated(offset),
            rotation_deg: 0.0,
            flip_x: false,
        });
    }
}

/// Which jump `PlayerEntity::jump` performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Air,
}

/// The cat
#[derive(Debug, Clone)]
pub struct PlayerEntity {
    pub rect: Rect,
    pub vertical_speed: f32,
    pub is_airborne: bool,
    pub can_double_jump: bool,
    /// Cosmetic tilt, degrees in [-45, 45]
    pub jump_angle: f32,
    pub facing: Facing,
    /// Last horizontal displacement
    dx: f32,
}

impl PlayerEntity {
    /// Standing on the floor, centred horizontally
    pub fn new(tuning: &Tuning) -> Self {
        let size = tuning.player_size;
        let pos = Vec2::new((tuning.screen.x - size.x) * 0.5, tuning.screen.y - size.y);
        Self::at(pos, tuning)
    }

    pub fn at(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            rect: Rect::from_pos_size(pos, tuning.player_size),
            vertical_speed: 0.0,
            is_airborne: false,
            can_double_jump: true,
            jump_angle: 0.0,
            facing: Facing::Right,
            dx: 0.0,
        }
    }

    /// Jump from the ground, or once more in the air.
    /// Returns `None` when no jump is available.
    pub fn jump(&mut self, tuning: &Tuning) -> Option<JumpKind> {
        if !self.is_airborne {
            self.vertical_speed = tuning.jump_impulse;
            self.is_airborne = true;
            self.can_double_jump = true;
            Some(JumpKind::Ground)
        } else if self.can_double_jump {
            self.vertical_speed = tuning.jump_impulse;
            self.can_double_jump = false;
            Some(JumpKind::Air)
        } else {
            None
        }
    }

    fn land_at(&mut self, bottom: f32) {
        self.rect.pos.y = bottom - self.rect.size.y;
        self.vertical_speed = 0.0;
        self.is_airborne = false;
        self.can_double_jump = true;
        self.jump_angle = 0.0;
    }

    fn steer(&mut self, steer: i8, speed: f32, screen_width: f32) {
        let x0 = self.rect.pos.x;
        if steer != 0 {
            let facing = if steer < 0 { Facing::Left } else { Facing::Right };
            if facing != self.facing {
                self.facing = facing;
            }
            let max_x = (screen_width - self.rect.size.x).max(0.0);
            self.rect.pos.x = (x0 + steer.signum() as f32 * speed).clamp(0.0, max_x);
        }
        self.dx = self.rect.pos.x - x0;
    }

    /// Support under the player this tick, if any. The player must have been
    /// at or above the surface before this tick's motion.
    fn find_landing(&self, supports: &[Support], slop: f32) -> Option<f32> {
        if self.vertical_speed <= 0.0 {
            return None;
        }
        let prev_bottom = self.rect.bottom() - self.vertical_speed;
        supports
            .iter()
            .filter(|s| {
                let prev_top = s.rect.top() - s.fall_speed;
                // The surface's swept area over this tick
                let swept = Rect::new(
                    s.rect.left(),
                    prev_top,
                    s.rect.size.x,
                    s.rect.size.y + s.fall_speed,
                );
                CollisionDetector::intersects(&self.rect, &swept) && prev_bottom <= prev_top + slop
            })
            .map(|s| s.rect.top())
            .reduce(f32::min)
    }
}

impl Entity for PlayerEntity {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn velocity(&self) -> Vec2 {
        Vec2::new(self.dx, self.vertical_speed)
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        self.steer(ctx.steer, tuning.player_speed, tuning.screen.x);

        self.vertical_speed += tuning.gravity;
        self.rect.pos.y += self.vertical_speed;

        let mut landed = false;
        if let Some(top) = self.find_landing(ctx.supports, tuning.gravity) {
            self.land_at(top);
            landed = true;
        }
        if self.rect.bottom() >= tuning.screen.y {
            self.land_at(tuning.screen.y);
            landed = true;
        }

        if !landed {
            // Walking off a ledge leaves the air jump available
            self.is_airborne = true;
            let dir = self.vertical_speed.signum();
            self.jump_angle = (self.jump_angle + JUMP_ANGLE_RATE * dir * self.facing.sign())
                .clamp(-JUMP_ANGLE_MAX, JUMP_ANGLE_MAX);
        }
    }

    fn render(&self, sprite: &Drawable, offset: Vec2, out: &mut Vec<RenderCommand>) {
        out.push(RenderCommand::Sprite {
            drawable: sprite.clone(),
            rect: self.rect.translated(offset),
            rotation_deg: self.jump_angle,
            flip_x: self.facing == Facing::Left,
        });
    }
}

/// A ledge that drifts down and is dropped once off the bottom
#[derive(Debug, Clone)]
pub struct PlatformEntity {
    pub rect: Rect,
    pub fall_speed: f32,
}

impl PlatformEntity {
    /// Just above the top edge at `x`
    pub fn spawn_at(x: f32, tuning: &Tuning) -> Self {
        let size = tuning.platform_size;
        Self {
            rect: Rect::from_pos_size(Vec2::new(x, -size.y), size),
            fall_speed: tuning.platform_fall_speed,
        }
    }

    pub fn is_off_screen(&self, screen_height: f32) -> bool {
        self.rect.top() >= screen_height
    }

    pub fn as_support(&self) -> Support {
        Support {
            rect: self.rect,
            fall_speed: self.fall_speed,
        }
    }
}

impl Entity for PlatformEntity {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn velocity(&self) -> Vec2 {
        Vec2::new(0.0, self.fall_speed)
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        self.rect.pos.y += self.fall_speed;
    }
}

/// Floor-level roamer that bounces between the side walls forever
#[derive(Debug, Clone)]
pub struct HazardEntity {
    pub rect: Rect,
    /// Signed horizontal speed
    pub speed: f32,
}

impl HazardEntity {
    /// On the floor at the left edge moving right, or at the right edge moving left
    pub fn spawn_on_floor(from_left: bool, tuning: &Tuning) -> Self {
        let size = tuning.hazard_size;
        let y = tuning.screen.y - size.y;
        let (x, speed) = if from_left {
            (0.0, tuning.hazard_speed)
        } else {
            (tuning.screen.x - size.x, -tuning.hazard_speed)
        };
        Self {
            rect: Rect::from_pos_size(Vec2::new(x, y), size),
            speed,
        }
    }
}

impl Entity for HazardEntity {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn velocity(&self) -> Vec2 {
        Vec2::new(self.speed, 0.0)
    }

    /// Moves by `speed`, clamping at either wall. The speed flips on the
    /// same update that reaches the wall, so the next update already moves
    /// back inward.
    fn update(&mut self, ctx: &mut TickContext<'_>) {
        let max_x = (ctx.tuning.screen.x - self.rect.size.x).max(0.0);
        self.rect.pos.x += self.speed;
        if self.rect.pos.x <= 0.0 {
            self.rect.pos.x = 0.0;
            self.speed = self.speed.abs();
        } else if self.rect.pos.x >= max_x {
            self.rect.pos.x = max_x;
            self.speed = -self.speed.abs();
        }
    }

    fn render(&self, sprite: &Drawable, offset: Vec2, out: &mut Vec<RenderCommand>) {
        out.push(RenderCommand::Sprite {
            drawable: sprite.clone(),
            rect: self.rect.translated(offset),
            rotation_deg: 0.0,
            flip_x: self.speed < 0.0,
        });
    }
}

/// The tuna: wanders between random waypoints in the upper band of the play area
#[derive(Debug, Clone)]
pub struct ScriptedActor {
    pub rect: Rect,
    pub speed: f32,
    pub waypoint: Vec2,
    pub facing: Facing,
    /// Region the top-left corner may visit
    band: Rect,
    last_step: Vec2,
}

impl ScriptedActor {
    pub fn new(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let size = tuning.target_size;
        let band = Rect::new(
            0.0,
            0.0,
            (tuning.screen.x - size.x).max(0.0),
            (tuning.screen.y * TARGET_BAND - size.y).max(0.0),
        );
        let start = Self::pick(&band, rng);
        let mut actor = Self {
            rect: Rect::from_pos_size(start, size),
            speed: tuning.target_speed,
            waypoint: start,
            facing: Facing::Right,
            band,
            last_step: Vec2::ZERO,
        };
        actor.waypoint = Self::pick(&actor.band, rng);
        actor
    }

    fn pick(band: &Rect, rng: &mut Pcg32) -> Vec2 {
        Vec2::new(
            band.left() + rng.random::<f32>() * band.size.x,
            band.top() + rng.random::<f32>() * band.size.y,
        )
    }
}

impl Entity for ScriptedActor {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn velocity(&self) -> Vec2 {
        self.last_step
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        let before = self.rect.pos;
        let to_target = self.waypoint - self.rect.pos;
        if to_target.length() <= self.speed {
            self.rect.pos = self.waypoint;
            self.waypoint = Self::pick(&self.band, ctx.rng);
        } else {
            self.rect.pos += to_target.normalize_or_zero() * self.speed;
        }
        self.last_step = self.rect.pos - before;
        if self.last_step.x < 0.0 {
            self.facing = Facing::Left;
        } else if self.last_step.x > 0.0 {
            self.facing = Facing::Right;
        }
    }

    fn render(&self, sprite: &Drawable, offset: Vec2, out: &mut Vec<RenderCommand>) {
        out.push(RenderCommand::Sprite {
            drawable: sprite.clone(),
            rect: self.rect.translated(offset),
            rotation_deg: 0.0,
            flip_x: self.facing == Facing::Left,
        });
    }
}
