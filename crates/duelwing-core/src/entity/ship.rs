//! Player ships.
//!
//! A [`PlayerShip`] moves from a per-frame [`Direction`] set, fires bullets
//! along its [`Facing`], and runs a timed explosion sequence when hit:
//!
//! ```text
//!            explode()                advance_explosion() x N
//!   Alive ─────────────▶ Exploding(0) ───────────────────────▶ Alive  (lives > 0)
//!                                                         └──▶ Dead   (lives == 0)
//! ```
//!
//! The life is deducted when the sequence completes, not when it starts.
//! While exploding the ship ignores further hits; once dead it ignores
//! everything.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ProjectileConfig, ShipConfig, Viewport};
use crate::render::Sprite;

use super::components::Body;
use super::projectile::{Owner, Projectile};
use super::{Entity, EntityKind};

/// Identifies one of the two player ships.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipId {
    /// First player (arrow keys)
    Player1,
    /// Second player (WASD)
    Player2,
}

impl ShipId {
    /// Both ships in index order.
    pub const ALL: [Self; 2] = [Self::Player1, Self::Player2];

    /// Index into per-ship arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Player1 => 0,
            Self::Player2 => 1,
        }
    }

    /// The other ship.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player1 => write!(f, "player 1"),
            Self::Player2 => write!(f, "player 2"),
        }
    }
}

bitflags! {
    /// Movement intent for one frame.
    ///
    /// Flags combine additively: `FORWARD | LEFT` moves diagonally at the
    /// full speed on each axis (the diagonal is not normalized).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Direction: u8 {
        /// Up the screen
        const FORWARD = 1 << 0;
        /// Down the screen
        const BACKWARD = 1 << 1;
        /// Left
        const LEFT = 1 << 2;
        /// Right
        const RIGHT = 1 << 3;
    }
}

impl Direction {
    /// Sum of the unit vectors of every active flag.
    #[must_use]
    pub fn vector(self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.contains(Self::FORWARD) {
            v.y -= 1.0;
        }
        if self.contains(Self::BACKWARD) {
            v.y += 1.0;
        }
        if self.contains(Self::LEFT) {
            v.x -= 1.0;
        }
        if self.contains(Self::RIGHT) {
            v.x += 1.0;
        }
        v
    }
}

/// Which way the ship's nose points.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Nose up the screen
    #[default]
    Up,
    /// Nose left
    Left,
    /// Nose down the screen
    Down,
    /// Nose right
    Right,
}

impl Facing {
    /// Quarter turn counter-clockwise.
    #[must_use]
    pub const fn turned_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Quarter turn clockwise.
    #[must_use]
    pub const fn turned_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Unit vector along the nose, in screen space.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Damage state of a ship.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionState {
    /// Flying and vulnerable
    #[default]
    Alive,
    /// Playing the explosion animation; `frame` counts up from zero
    Exploding {
        /// Current animation frame
        frame: u32,
    },
    /// Out of lives; no longer drawn and no longer collides
    Dead,
}

/// A player-controlled ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerShip {
    id: ShipId,
    body: Body,
    facing: Facing,
    explosion: ExplosionState,
    score: u32,
    lives: u32,
    max_lives: u32,
    explosion_frames: u32,
    speed: f32,
    fire_cooldown: f32,
    cooldown_remaining: f32,
}

impl PlayerShip {
    /// Creates a ship at `position` tuned by `config`.
    #[must_use]
    pub fn new(id: ShipId, position: Vec2, config: &ShipConfig) -> Self {
        Self {
            id,
            body: Body::new(position, config.half_extents),
            facing: Facing::Up,
            explosion: ExplosionState::Alive,
            score: 0,
            lives: config.initial_lives.min(config.max_lives),
            max_lives: config.max_lives,
            explosion_frames: config.explosion_frames,
            speed: config.speed,
            fire_cooldown: config.fire_cooldown,
            cooldown_remaining: 0.0,
        }
    }

    /// Which player this is.
    #[must_use]
    pub const fn id(&self) -> ShipId {
        self.id
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Current damage state.
    #[must_use]
    pub const fn explosion(&self) -> ExplosionState {
        self.explosion
    }

    /// `false` once the ship has run out of lives.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !matches!(self.explosion, ExplosionState::Dead)
    }

    /// `true` while the explosion animation is playing.
    #[must_use]
    pub const fn currently_exploding(&self) -> bool {
        matches!(self.explosion, ExplosionState::Exploding { .. })
    }

    /// `true` if a hit right now would have an effect.
    #[must_use]
    pub const fn is_vulnerable(&self) -> bool {
        matches!(self.explosion, ExplosionState::Alive)
    }

    /// Translates the ship by `speed × elapsed` along every active flag.
    ///
    /// Ignored once the ship is dead.
    pub fn move_in(&mut self, directions: Direction, elapsed: f32) {
        if !self.is_alive() {
            return;
        }
        self.body.position += directions.vector() * self.speed * elapsed;
    }

    /// Keeps the ship's bounding box inside the viewport.
    pub fn clamp_to(&mut self, viewport: Viewport) {
        let min = self.body.half_extents;
        let max = (viewport.size() - self.body.half_extents).max(min);
        self.body.position = self.body.position.clamp(min, max);
    }

    /// Moves the ship without any checks (loading a saved game).
    pub fn set_position(&mut self, position: Vec2) {
        self.body.position = position;
    }

    /// Counts down the fire cooldown.
    pub fn update(&mut self, elapsed: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - elapsed).max(0.0);
    }

    /// Quarter turn counter-clockwise. Ignored once dead.
    pub fn rotate_left(&mut self) {
        if self.is_alive() {
            self.facing = self.facing.turned_left();
        }
    }

    /// Quarter turn clockwise. Ignored once dead.
    pub fn rotate_right(&mut self) {
        if self.is_alive() {
            self.facing = self.facing.turned_right();
        }
    }

    /// Spawns a bullet at the ship's position travelling along its facing.
    ///
    /// Returns `None` if the ship is dead or its fire cooldown is still
    /// running. With the default zero cooldown a held fire key shoots every
    /// frame.
    pub fn fire_bullet(&mut self, config: &ProjectileConfig) -> Option<Projectile> {
        if !self.is_alive() || self.cooldown_remaining > 0.0 {
            return None;
        }
        self.cooldown_remaining = self.fire_cooldown;
        Some(Projectile::new(
            self.body.position,
            self.facing.unit() * config.player_speed,
            config.half_extents,
            Owner::Ship(self.id),
        ))
    }

    /// Starts the explosion sequence.
    ///
    /// Returns `true` if the sequence started. Exploding and dead ships are
    /// unaffected.
    pub fn explode(&mut self) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.explosion = ExplosionState::Exploding { frame: 0 };
        tracing::debug!(ship = %self.id, lives = self.lives, "explosion started");
        true
    }

    /// Advances the explosion animation by one frame.
    ///
    /// Returns `false` when there is nothing left to animate: either the
    /// ship was not exploding, or this call completed the sequence. On
    /// completion one life is deducted and the ship returns to
    /// [`ExplosionState::Alive`], or becomes [`ExplosionState::Dead`] if no
    /// lives remain.
    pub fn advance_explosion(&mut self) -> bool {
        let ExplosionState::Exploding { frame } = self.explosion else {
            return false;
        };

        let next = frame + 1;
        if next < self.explosion_frames {
            self.explosion = ExplosionState::Exploding { frame: next };
            return true;
        }

        self.lives = self.lives.saturating_sub(1);
        self.explosion = if self.lives == 0 {
            tracing::info!(ship = %self.id, score = self.score, "ship destroyed");
            ExplosionState::Dead
        } else {
            tracing::debug!(ship = %self.id, lives = self.lives, "explosion finished");
            ExplosionState::Alive
        };
        false
    }

    /// Gains one life, up to the configured maximum.
    pub fn add_life(&mut self) {
        if self.is_alive() {
            self.lives = (self.lives + 1).min(self.max_lives);
        }
    }

    /// Adds `points` to the score.
    pub fn increment_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

impl Entity for PlayerShip {
    fn kind(&self) -> EntityKind {
        EntityKind::Ship
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn sprite(&self) -> Option<Sprite> {
        match self.explosion {
            ExplosionState::Alive => Some(Sprite::Ship {
                ship: self.id,
                facing: self.facing,
            }),
            ExplosionState::Exploding { frame } => Some(Sprite::Explosion { frame }),
            ExplosionState::Dead => None,
        }
    }

    fn is_alive(&self) -> bool {
        Self::is_alive(self)
    }
}
