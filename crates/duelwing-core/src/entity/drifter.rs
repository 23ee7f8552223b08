//! Crates and bonus-life pickups.
//!
//! Both drift slowly down a fixed band and are never destroyed: a hit
//! repositions them to a random column at the top of the band instead.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::render::Sprite;

use super::components::Body;
use super::{Entity, EntityKind};

/// What a drifter does to a ship that touches it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrifterKind {
    /// Crate: explodes the ship
    Obstacle,
    /// Bonus life: grants the ship a life
    Pickup,
}

/// Rectangle `[0, width] x [0, height]` drifters live in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// Width in pixels; respawn columns are drawn from `[0, width)`
    pub width: u32,
    /// Height in pixels; drifters past it wrap back to the top
    pub height: u32,
}

/// A drifting crate or pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drifter {
    kind: DrifterKind,
    body: Body,
    velocity: Vec2,
}

impl Drifter {
    /// Creates a crate.
    #[must_use]
    pub const fn obstacle(position: Vec2, half_extents: Vec2, velocity: Vec2) -> Self {
        Self {
            kind: DrifterKind::Obstacle,
            body: Body::new(position, half_extents),
            velocity,
        }
    }

    /// Creates a bonus-life pickup.
    #[must_use]
    pub const fn pickup(position: Vec2, half_extents: Vec2, velocity: Vec2) -> Self {
        Self {
            kind: DrifterKind::Pickup,
            body: Body::new(position, half_extents),
            velocity,
        }
    }

    /// Crate or pickup.
    #[must_use]
    pub const fn drifter_kind(&self) -> DrifterKind {
        self.kind
    }

    /// Drift velocity in pixels/second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Drifts by `velocity × elapsed`, staying inside `band`.
    ///
    /// Past the bottom edge the drifter wraps to just above the top. At the
    /// side edges the horizontal velocity reflects.
    #[allow(clippy::cast_precision_loss)]
    pub fn update(&mut self, elapsed: f32, band: Band) {
        let half = self.body.half_extents;
        let width = band.width as f32;
        let height = band.height as f32;

        self.body.position += self.velocity * elapsed;

        if self.body.position.y - half.y > height {
            self.body.position.y = -half.y;
        }
        if self.body.position.x < 0.0 {
            self.body.position.x = 0.0;
            self.velocity.x = self.velocity.x.abs();
        } else if self.body.position.x > width {
            self.body.position.x = width;
            self.velocity.x = -self.velocity.x.abs();
        }
    }

    /// Moves to a random column in `[0, band.width)` at the top of the band.
    #[allow(clippy::cast_precision_loss)]
    pub fn reposition(&mut self, band: Band, rng: &mut impl Rng) {
        let x = rng.gen_range(0..band.width.max(1));
        self.body.position = Vec2::new(x as f32, self.body.half_extents.y);
    }
}

impl Entity for Drifter {
    fn kind(&self) -> EntityKind {
        match self.kind {
            DrifterKind::Obstacle => EntityKind::Obstacle,
            DrifterKind::Pickup => EntityKind::Pickup,
        }
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn sprite(&self) -> Option<Sprite> {
        Some(match self.kind {
            DrifterKind::Obstacle => Sprite::Crate,
            DrifterKind::Pickup => Sprite::BonusLife,
        })
    }
}
