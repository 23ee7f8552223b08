//! Enemy ships.
//!
//! An enemy sweeps along its row and periodically drops a bullet. It owns
//! every bullet it has fired: it moves them and retires them once they leave
//! the screen, while the collision engine only reads them.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::{Arena, Handle};
use crate::config::{ProjectileConfig, Viewport};
use crate::render::Sprite;
use crate::time::Cadence;

use super::components::Body;
use super::projectile::{Owner, Projectile};
use super::{Entity, EntityKind};

/// How an enemy moves.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum MotionPattern {
    /// Back and forth across the viewport at `speed` pixels/second
    Sweep {
        /// Horizontal speed
        speed: f32,
    },
    /// Stays where it was placed
    Hover,
}

/// A hostile ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    body: Body,
    pattern: MotionPattern,
    heading: f32,
    bullets: Arena<Projectile>,
    shoot_cadence: Cadence,
}

impl Enemy {
    /// Creates an enemy whose first volley comes `shoot_interval` after
    /// `now` on the wall clock.
    #[must_use]
    pub fn new(
        position: Vec2,
        half_extents: Vec2,
        pattern: MotionPattern,
        shoot_interval: Duration,
        now: Duration,
    ) -> Self {
        Self {
            body: Body::new(position, half_extents),
            pattern,
            heading: -1.0,
            bullets: Arena::new(),
            shoot_cadence: Cadence::new(shoot_interval, now),
        }
    }

    /// Motion pattern.
    #[must_use]
    pub const fn pattern(&self) -> MotionPattern {
        self.pattern
    }

    /// Bullets this enemy has fired that are still tracked.
    #[must_use]
    pub const fn bullets(&self) -> &Arena<Projectile> {
        &self.bullets
    }

    /// Mutable access to this enemy's bullets.
    #[must_use]
    pub fn bullets_mut(&mut self) -> &mut Arena<Projectile> {
        &mut self.bullets
    }

    /// Moves along the motion pattern, then advances every owned bullet.
    #[allow(clippy::cast_precision_loss)]
    pub fn update(&mut self, elapsed: f32, viewport: Viewport) {
        if let MotionPattern::Sweep { speed } = self.pattern {
            let half = self.body.half_extents.x;
            let right = (viewport.width as f32 - half).max(half);
            self.body.position.x += self.heading * speed * elapsed;
            if self.body.position.x <= half {
                self.body.position.x = half;
                self.heading = 1.0;
            } else if self.body.position.x >= right {
                self.body.position.x = right;
                self.heading = -1.0;
            }
        }

        for bullet in self.bullets.values_mut() {
            bullet.update(elapsed, viewport);
        }
    }

    /// Fires a bullet straight down from the enemy's position.
    pub fn shoot(&mut self, config: &ProjectileConfig) -> Handle<Projectile> {
        self.bullets.spawn(Projectile::new(
            self.body.position,
            Vec2::new(0.0, config.enemy_speed),
            config.half_extents,
            Owner::Enemy,
        ))
    }

    /// Fires if the shoot interval has elapsed on the wall clock.
    pub fn try_shoot(&mut self, now: Duration, config: &ProjectileConfig) -> Option<Handle<Projectile>> {
        self.shoot_cadence.ready(now).then(|| self.shoot(config))
    }

    /// Drops every bullet that has left the screen. Returns how many.
    pub fn retire_bullets(&mut self) -> usize {
        self.bullets.retain(|_, bullet| !bullet.outside_screen())
    }

    /// Moves to a random column in `[0, width)` on row `row_y`.
    #[allow(clippy::cast_precision_loss)]
    pub fn reposition(&mut self, width: u32, row_y: f32, rng: &mut impl Rng) {
        let x = rng.gen_range(0..width.max(1));
        self.body.position = Vec2::new(x as f32, row_y);
    }
}

impl Entity for Enemy {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn sprite(&self) -> Option<Sprite> {
        Some(Sprite::Enemy)
    }
}
