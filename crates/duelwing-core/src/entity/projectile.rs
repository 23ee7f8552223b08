//! Bullets.
//!
//! Projectiles fly in a straight line until they leave the viewport. Leaving
//! sets the terminal `outside_screen` flag; flagged projectiles are skipped by
//! the collision pass and removed from their arena at the end of the frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Viewport;
use crate::render::Sprite;

use super::components::Body;
use super::ship::ShipId;
use super::{Entity, EntityKind};

/// Who fired a projectile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Fired by a player ship; scores go to this ship
    Ship(ShipId),
    /// Fired by an enemy
    Enemy,
}

/// A bullet in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    body: Body,
    velocity: Vec2,
    owner: Owner,
    outside_screen: bool,
}

impl Projectile {
    /// Creates a projectile at `position` moving at `velocity` pixels/second.
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2, half_extents: Vec2, owner: Owner) -> Self {
        Self {
            body: Body::new(position, half_extents),
            velocity,
            owner,
            outside_screen: false,
        }
    }

    /// Velocity in pixels/second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Who fired it.
    #[must_use]
    pub const fn owner(&self) -> Owner {
        self.owner
    }

    /// `true` once the projectile has left the viewport.
    #[must_use]
    pub const fn outside_screen(&self) -> bool {
        self.outside_screen
    }

    /// Advances along the velocity and flags the projectile once its centre
    /// leaves `viewport`. A flagged projectile no longer moves.
    pub fn update(&mut self, elapsed: f32, viewport: Viewport) {
        if self.outside_screen {
            return;
        }
        self.body.position += self.velocity * elapsed;
        if !viewport.contains(self.body.position) {
            self.outside_screen = true;
        }
    }
}

impl Entity for Projectile {
    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn sprite(&self) -> Option<Sprite> {
        if self.outside_screen {
            return None;
        }
        Some(match self.owner {
            Owner::Ship(_) => Sprite::PlayerBullet,
            Owner::Enemy => Sprite::EnemyBullet,
        })
    }

    fn is_alive(&self) -> bool {
        !self.outside_screen
    }
}
