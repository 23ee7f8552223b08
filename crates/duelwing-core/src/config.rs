//! Game configuration.
//!
//! Every tunable constant of the game lives in [`GameConfig`]. The defaults
//! reproduce the classic two-ship layout: an 800x600 viewport, six crates,
//! one bonus-life pickup and two enemies.
//!
//! Configurations are plain serde structs. Missing fields fall back to the
//! defaults, so a JSON file only needs the values it overrides:
//!
//! ```
//! use duelwing_core::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "seed": 7, "ship": { "max_lives": 9 } }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.ship.max_lives, 9);
//! assert_eq!(config.ship.initial_lives, 3);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::drifter::Band;
use crate::error::Result;

/// Width and height of the visible play area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport of the given size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if `point` lies inside `[0, width] x [0, height]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x <= self.width as f32
            && point.y <= self.height as f32
    }

    /// Returns the viewport size as a vector.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Player ship tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Half-width and half-height of the ship's bounding box
    pub half_extents: Vec2,
    /// Translation speed per active direction flag, pixels/second
    pub speed: f32,
    /// Lives at session start
    pub initial_lives: u32,
    /// Upper bound on lives gained from pickups
    pub max_lives: u32,
    /// Number of explosion animation frames
    pub explosion_frames: u32,
    /// Wall-clock time between explosion frames, milliseconds
    pub explosion_frame_ms: u64,
    /// Minimum seconds between player shots (0 = fire every frame)
    pub fire_cooldown: f32,
    /// Spawn positions of player 1 and player 2
    pub spawn: [Vec2; 2],
}

impl ShipConfig {
    /// Wall-clock interval between explosion frames.
    #[must_use]
    pub const fn explosion_interval(&self) -> Duration {
        Duration::from_millis(self.explosion_frame_ms)
    }
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(16.0, 16.0),
            speed: 200.0,
            initial_lives: 3,
            max_lives: 5,
            explosion_frames: 4,
            explosion_frame_ms: 100,
            fire_cooldown: 0.0,
            spawn: [Vec2::new(100.0, 400.0), Vec2::new(400.0, 300.0)],
        }
    }
}

/// Projectile tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Half-extents of every projectile
    pub half_extents: Vec2,
    /// Player bullet speed, pixels/second
    pub player_speed: f32,
    /// Enemy bullet speed, pixels/second
    pub enemy_speed: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(3.0, 6.0),
            player_speed: 400.0,
            enemy_speed: 250.0,
        }
    }
}

/// Crate and bonus-life tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrifterConfig {
    /// Number of crates placed at setup
    pub obstacle_count: usize,
    /// Number of bonus-life pickups placed at setup
    pub pickup_count: usize,
    /// Half-extents of a crate
    pub obstacle_half_extents: Vec2,
    /// Half-extents of a bonus-life pickup
    pub pickup_half_extents: Vec2,
    /// Drift velocity, pixels/second
    pub velocity: Vec2,
    /// Initial placement draws x from `[0, spawn_x_range)`
    pub spawn_x_range: u32,
    /// Horizontal band width; respawns draw x from `[0, band_width)`
    pub band_width: u32,
    /// Vertical band height; drifters wrap to the top once past it
    pub band_height: u32,
}

impl DrifterConfig {
    /// Band the drifters wrap and respawn inside.
    #[must_use]
    pub const fn band(&self) -> Band {
        Band {
            width: self.band_width,
            height: self.band_height,
        }
    }
}

impl Default for DrifterConfig {
    fn default() -> Self {
        Self {
            obstacle_count: 6,
            pickup_count: 1,
            obstacle_half_extents: Vec2::new(16.0, 16.0),
            pickup_half_extents: Vec2::new(12.0, 12.0),
            velocity: Vec2::new(0.0, 60.0),
            spawn_x_range: 400,
            band_width: 800,
            band_height: 600,
        }
    }
}

/// Enemy tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Number of enemies placed at setup
    pub count: usize,
    /// Half-extents of an enemy
    pub half_extents: Vec2,
    /// Horizontal sweep speed, pixels/second
    pub speed: f32,
    /// Row enemies start on and respawn to
    pub row_y: f32,
    /// Wall-clock time between volleys, milliseconds
    pub shoot_interval_ms: u64,
}

impl EnemyConfig {
    /// Wall-clock interval between volleys.
    #[must_use]
    pub const fn shoot_interval(&self) -> Duration {
        Duration::from_millis(self.shoot_interval_ms)
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            count: 2,
            half_extents: Vec2::new(20.0, 16.0),
            speed: 100.0,
            row_y: 100.0,
            shoot_interval_ms: 2000,
        }
    }
}

/// Collision policy switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Remove an enemy bullet once it has hit a ship.
    ///
    /// Off by default: the classic game leaves the bullet in flight.
    pub consume_enemy_bullet_on_hit: bool,
}

/// Rendering and asset configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory the sprite images are loaded from
    pub asset_dir: PathBuf,
    /// Wall-clock time between one-pixel background scroll steps, milliseconds
    pub scroll_step_ms: u64,
}

impl RenderConfig {
    /// Wall-clock interval between background scroll steps.
    #[must_use]
    pub const fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_step_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("data"),
            scroll_step_ms: 20,
        }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the world's random number generator
    pub seed: u64,
    /// Initial viewport size
    pub viewport: Viewport,
    /// Player ships
    pub ship: ShipConfig,
    /// Bullets
    pub projectile: ProjectileConfig,
    /// Crates and pickups
    pub drifter: DrifterConfig,
    /// Enemies
    pub enemy: EnemyConfig,
    /// Collision policy switches
    pub collision: CollisionConfig,
    /// Rendering
    pub render: RenderConfig,
    /// File the position save is written to
    pub save_path: PathBuf,
    /// Sleep between event polls while the window is inactive, milliseconds
    pub idle_wait_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            viewport: Viewport::default(),
            ship: ShipConfig::default(),
            projectile: ProjectileConfig::default(),
            drifter: DrifterConfig::default(),
            enemy: EnemyConfig::default(),
            collision: CollisionConfig::default(),
            render: RenderConfig::default(),
            save_path: PathBuf::from("SaveGame.txt"),
            idle_wait_ms: 50,
        }
    }
}

impl GameConfig {
    /// Parses a configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`](crate::error::GameError::Config) if the
    /// text is not valid JSON for this schema.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a config error if
    /// it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), seed = config.seed, "loaded configuration");
        Ok(config)
    }

    /// Sleep between event polls while the window is inactive.
    #[must_use]
    pub const fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.idle_wait_ms)
    }
}
