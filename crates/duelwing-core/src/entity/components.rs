//! Shared spatial components for every entity kind.
//!
//! Every entity carries a [`Body`]: a centre position and half-extents. Its
//! bounding box ([`Aabb`]) is always derived from the body, so boxes are
//! symmetric around the position by construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position and size of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre of the entity in screen space (y grows downward)
    pub position: Vec2,
    /// Half-width and half-height of the bounding box
    pub half_extents: Vec2,
}

impl Body {
    /// Creates a body at `position` with the given half-extents.
    #[must_use]
    pub const fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
        }
    }

    /// Returns the axis-aligned bounding box around the position.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }
}

/// Axis-aligned bounding box in screen space.
///
/// `top < bottom` because screen y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Smallest x
    pub left: f32,
    /// Largest x
    pub right: f32,
    /// Smallest y
    pub top: f32,
    /// Largest y
    pub bottom: f32,
}

impl Aabb {
    /// Builds the box `center ± half_extents`.
    #[must_use]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            left: center.x - half_extents.x,
            right: center.x + half_extents.x,
            top: center.y - half_extents.y,
            bottom: center.y + half_extents.y,
        }
    }

    /// Rectangle-exclusion overlap test.
    ///
    /// Two boxes overlap unless one lies entirely above, below, left of or
    /// right of the other. Touching edges count as overlapping.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.bottom < other.top
            || self.top > other.bottom
            || self.left > other.right
            || self.right < other.left)
    }
}
