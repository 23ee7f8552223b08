//! Entity types for the arcade simulation.
//!
//! This module provides the closed set of entity kinds and the capability
//! contract they share:
//! - [`EntityKind`]: Tag used by the collision policy table
//! - [`Body`] / [`Aabb`]: Position, half-extents and derived bounding box
//! - [`Entity`]: Position + bounding box + drawing capability
//!
//! Kind-specific state and per-frame update live in the submodules:
//! [`ship`], [`projectile`], [`drifter`] and [`enemy`].
//!
//! # Example
//!
//! ```
//! use duelwing_core::entity::{Entity, EntityKind};
//! use duelwing_core::entity::drifter::Drifter;
//! use glam::Vec2;
//!
//! let crate_box = Drifter::obstacle(Vec2::new(100.0, 16.0), Vec2::splat(16.0), Vec2::new(0.0, 60.0));
//! assert_eq!(crate_box.kind(), EntityKind::Obstacle);
//! assert_eq!(crate_box.aabb().top, 0.0);
//! ```

pub mod components;
pub mod drifter;
pub mod enemy;
pub mod projectile;
pub mod ship;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::render::Sprite;

pub use components::{Aabb, Body};
pub use drifter::{Drifter, DrifterKind};
pub use enemy::{Enemy, MotionPattern};
pub use projectile::{Owner, Projectile};
pub use ship::{Direction, ExplosionState, Facing, PlayerShip, ShipId};

/// Entity kind tag.
///
/// The collision engine dispatches on pairs of kinds rather than on concrete
/// types, so adding a kind means adding rows to the policy table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Player-controlled ship
    Ship,
    /// Hostile ship that sweeps and shoots
    Enemy,
    /// Bullet fired by a ship or an enemy
    Projectile,
    /// Crate that explodes ships on contact
    Obstacle,
    /// Bonus-life item
    Pickup,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ship => write!(f, "Ship"),
            Self::Enemy => write!(f, "Enemy"),
            Self::Projectile => write!(f, "Projectile"),
            Self::Obstacle => write!(f, "Obstacle"),
            Self::Pickup => write!(f, "Pickup"),
        }
    }
}

/// Capabilities shared by every entity: a body and a way to be drawn.
///
/// Per-frame update is kind-specific (ships move from input, drifters wrap
/// inside a band, projectiles retire off-screen), so it is not part of this
/// trait.
pub trait Entity {
    /// Kind tag used by the collision policy.
    fn kind(&self) -> EntityKind;

    /// Position and half-extents.
    fn body(&self) -> &Body;

    /// Mutable access to position and half-extents.
    fn body_mut(&mut self) -> &mut Body;

    /// Sprite to paint this frame, or `None` if nothing is drawn.
    fn sprite(&self) -> Option<Sprite>;

    /// Centre position.
    fn position(&self) -> Vec2 {
        self.body().position
    }

    /// Bounding box derived from the body.
    fn aabb(&self) -> Aabb {
        self.body().aabb()
    }

    /// Whether the entity still takes part in collisions.
    fn is_alive(&self) -> bool {
        true
    }
}
