//! Frame rendering.
//!
//! Entities only say *what* they look like through [`Sprite`]; this module
//! maps sprites to loaded images and paints a frame in a fixed order:
//!
//! 1. Background, painted twice and scrolled one pixel per scroll step
//! 2. Crates, then bonus-life pickups
//! 3. Player bullets
//! 4. Enemies, each followed by its own bullets
//! 5. Ships (or their explosion frame)
//! 6. HUD text with each ship's score and lives

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::entity::{Entity, Facing, ShipId};
use crate::error::Result;
use crate::platform::{DrawTarget, ImageHandle, ImageLoader, Surface};
use crate::time::Cadence;
use crate::world::World;

/// Everything that can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    /// Scrolling backdrop
    Background,
    /// A player ship facing one way
    Ship {
        /// Which player
        ship: ShipId,
        /// Nose direction
        facing: Facing,
    },
    /// One frame of the ship explosion animation
    Explosion {
        /// Animation frame, counting from zero
        frame: u32,
    },
    /// Crate obstacle
    Crate,
    /// Bonus-life pickup
    BonusLife,
    /// Enemy ship
    Enemy,
    /// Bullet fired by a player
    PlayerBullet,
    /// Bullet fired by an enemy
    EnemyBullet,
}

impl Sprite {
    /// Every sprite the game can request, given the explosion length.
    #[must_use]
    pub fn catalogue(explosion_frames: u32) -> Vec<Self> {
        let mut sprites = vec![Self::Background];
        for ship in ShipId::ALL {
            for facing in [Facing::Up, Facing::Left, Facing::Down, Facing::Right] {
                sprites.push(Self::Ship { ship, facing });
            }
        }
        sprites.extend((0..explosion_frames.max(1)).map(|frame| Self::Explosion { frame }));
        sprites.extend([
            Self::Crate,
            Self::BonusLife,
            Self::Enemy,
            Self::PlayerBullet,
            Self::EnemyBullet,
        ]);
        sprites
    }

    /// Image file name inside the asset directory.
    #[must_use]
    pub fn file_name(self) -> String {
        match self {
            Self::Background => "background.bmp".into(),
            Self::Ship { ship, facing } => {
                let facing = match facing {
                    Facing::Up => "up",
                    Facing::Left => "left",
                    Facing::Down => "down",
                    Facing::Right => "right",
                };
                format!("ship{}_{facing}.bmp", ship.index() + 1)
            }
            Self::Explosion { frame } => format!("explosion_{frame}.bmp"),
            Self::Crate => "crate.bmp".into(),
            Self::BonusLife => "bonus_life.bmp".into(),
            Self::Enemy => "enemy.bmp".into(),
            Self::PlayerBullet => "bullet.bmp".into(),
            Self::EnemyBullet => "enemy_bullet.bmp".into(),
        }
    }
}

/// Loaded image for every sprite.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    images: HashMap<Sprite, ImageHandle>,
    explosion_frames: u32,
}

impl SpriteSheet {
    /// Loads every sprite in the catalogue from `asset_dir`.
    ///
    /// # Errors
    ///
    /// Returns the loader's error for the first image that fails. A missing
    /// asset is fatal to the session.
    pub fn load(
        loader: &mut dyn ImageLoader,
        asset_dir: &Path,
        explosion_frames: u32,
    ) -> Result<Self> {
        let explosion_frames = explosion_frames.max(1);
        let mut images = HashMap::new();
        for sprite in Sprite::catalogue(explosion_frames) {
            let path = asset_dir.join(sprite.file_name());
            let image = loader.load(&path).inspect_err(|err| {
                tracing::error!(path = %path.display(), error = %err, "failed to load sprite");
            })?;
            images.insert(sprite, image);
        }
        tracing::debug!(count = images.len(), dir = %asset_dir.display(), "sprites loaded");
        Ok(Self {
            images,
            explosion_frames,
        })
    }

    /// Image for `sprite`. Explosion frames past the last loaded one reuse
    /// the last frame.
    #[must_use]
    pub fn image(&self, sprite: Sprite) -> Option<ImageHandle> {
        let sprite = match sprite {
            Sprite::Explosion { frame } => Sprite::Explosion {
                frame: frame.min(self.explosion_frames - 1),
            },
            other => other,
        };
        self.images.get(&sprite).copied()
    }

    /// Number of images held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// `true` if no images are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Vertical scroll state of the background.
///
/// The offset stays in `[-height, 0)`. The background is painted at the
/// offset and again one viewport height below it, so the two copies always
/// cover the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundScroll {
    offset: i32,
    step: Cadence,
}

impl BackgroundScroll {
    /// Starts with the first copy one viewport above the screen.
    #[must_use]
    pub fn new(interval: Duration, now: Duration, height: u32) -> Self {
        Self {
            offset: -to_pixels(height),
            step: Cadence::new(interval, now),
        }
    }

    /// Scrolls one pixel down if a step is due at `now`. Returns `true` if it
    /// moved.
    pub fn advance(&mut self, now: Duration, height: u32) -> bool {
        let height = to_pixels(height);
        let moved = self.step.ready(now);
        if moved {
            self.offset += 1;
        }
        if self.offset >= 0 || self.offset < -height {
            self.offset = -height;
        }
        moved
    }

    /// Current vertical offset of the first copy.
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }
}

fn to_pixels(length: u32) -> i32 {
    i32::try_from(length).unwrap_or(i32::MAX)
}

/// Paints world frames onto a surface.
#[derive(Debug, Clone)]
pub struct Renderer {
    sheet: SpriteSheet,
    scroll: BackgroundScroll,
}

impl Renderer {
    /// Loads the sprite sheet described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if any sprite image cannot be loaded.
    pub fn new(loader: &mut dyn ImageLoader, config: &GameConfig, now: Duration) -> Result<Self> {
        let sheet = SpriteSheet::load(loader, &config.render.asset_dir, config.ship.explosion_frames)?;
        Ok(Self {
            sheet,
            scroll: BackgroundScroll::new(config.render.scroll_interval(), now, config.viewport.height),
        })
    }

    /// Loaded sprites.
    #[must_use]
    pub const fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    /// Background scroll state.
    #[must_use]
    pub const fn scroll(&self) -> BackgroundScroll {
        self.scroll
    }

    /// Clears, paints and presents one frame of `world`.
    ///
    /// # Errors
    ///
    /// Propagates surface failures from clearing or presenting.
    pub fn draw(
        &mut self,
        world: &World,
        surface: &mut dyn Surface,
        images: &dyn ImageLoader,
        now: Duration,
    ) -> Result<()> {
        let viewport = world.viewport();
        self.scroll.advance(now, viewport.height);

        surface.clear()?;
        let target = surface.draw_target();

        if let Some(background) = self.sheet.image(Sprite::Background) {
            let offset = self.scroll.offset();
            images.paint(background, target, 0, offset);
            images.paint(background, target, 0, offset + to_pixels(viewport.height));
        }

        for drifter in world.obstacles().values().chain(world.pickups().values()) {
            self.paint(images, target, drifter);
        }
        for bullet in world.bullets().values() {
            self.paint(images, target, bullet);
        }
        for enemy in world.enemies().values() {
            self.paint(images, target, enemy);
            for bullet in enemy.bullets().values() {
                self.paint(images, target, bullet);
            }
        }
        for ship in world.ships() {
            self.paint(images, target, ship);
        }

        for (row, ship) in (0..).zip(world.ships()) {
            let line = if ship.is_alive() {
                format!("P{}  score {}  lives {}", ship.id().index() + 1, ship.score(), ship.lives())
            } else {
                format!("P{}  score {}  destroyed", ship.id().index() + 1, ship.score())
            };
            target.text(8, 8 + row * 16, &line);
        }

        surface.present()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn paint(&self, images: &dyn ImageLoader, target: &mut dyn DrawTarget, entity: &impl Entity) {
        let Some(image) = entity.sprite().and_then(|sprite| self.sheet.image(sprite)) else {
            return;
        };
        let body = entity.body();
        let corner = (body.position - body.half_extents).floor();
        images.paint(image, target, corner.x as i32, corner.y as i32);
    }
}
