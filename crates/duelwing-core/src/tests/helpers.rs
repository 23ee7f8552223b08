//! Test helper functions for setting up worlds and games.
//!
//! Factories here keep scenario tests short: a classic world, a world with
//! only the two ships, a headless game with hand-driven clocks, and a
//! frame driver that advances both clocks together.

use std::time::Duration;

use glam::Vec2;

use crate::config::GameConfig;
use crate::entity::{Drifter, Owner, Projectile, ShipId};
use crate::game::{Clocks, Game, Platform};
use crate::input::{Controls, InputSnapshot, ScriptedInput};
use crate::platform::headless::{MemoryImages, MemorySaveStore, RecordingSurface};
use crate::time::ManualClock;
use crate::world::{StepReport, World};

/// Frame delta used by most scenarios: 16 ms.
pub const FRAME: Duration = Duration::from_millis(16);

/// A game wired to in-memory collaborators.
pub type HeadlessGame = Game<RecordingSurface, ScriptedInput, MemoryImages, MemorySaveStore>;

// =============================================================================
// World Setup
// =============================================================================

/// The default layout: two ships, six crates, one pickup, two enemies.
pub fn classic_world() -> World {
    World::new(GameConfig::default(), Duration::ZERO)
}

/// Configuration with nothing but the two ships.
pub fn bare_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.drifter.obstacle_count = 0;
    config.drifter.pickup_count = 0;
    config.enemy.count = 0;
    config
}

/// A world with nothing but the two ships.
pub fn bare_world() -> World {
    World::new(bare_config(), Duration::ZERO)
}

/// A stationary crate with the default 16x16 half-extents.
pub fn still_crate(position: Vec2) -> Drifter {
    Drifter::obstacle(position, Vec2::splat(16.0), Vec2::ZERO)
}

/// A player bullet flying up the screen.
pub fn upward_bullet(position: Vec2, shooter: ShipId) -> Projectile {
    Projectile::new(position, Vec2::new(0.0, -400.0), Vec2::new(3.0, 6.0), Owner::Ship(shooter))
}

// =============================================================================
// Frame Drivers
// =============================================================================

/// Steps `world` for `frames` frames of `dt` with both ships fed `snapshot`.
///
/// The wall clock starts at `start` and advances by `dt` per frame.
/// Returns one report per frame.
pub fn run_frames(
    world: &mut World,
    frames: u32,
    dt: Duration,
    start: Duration,
    snapshot: &InputSnapshot,
) -> Vec<StepReport> {
    let mut now = start;
    (0..frames)
        .map(|_| {
            now += dt;
            for id in ShipId::ALL {
                let intent = Controls::for_ship(id).intent(snapshot);
                world.apply_intent(id, &intent, dt.as_secs_f32());
            }
            world.step(dt.as_secs_f32(), now)
        })
        .collect()
}

// =============================================================================
// Game Setup
// =============================================================================

/// A headless game plus handles on its frame and wall clocks.
pub struct GameHarness {
    /// The game under test
    pub game: HeadlessGame,
    /// Frame clock handle
    pub frame_clock: ManualClock,
    /// Wall clock handle
    pub wall_clock: ManualClock,
}

impl GameHarness {
    /// Builds a game from `config` with an empty save store.
    pub fn new(config: GameConfig) -> Self {
        Self::with_saves(config, MemorySaveStore::new())
    }

    /// Builds a game from `config` around an existing save store.
    pub fn with_saves(config: GameConfig, saves: MemorySaveStore) -> Self {
        let frame_clock = ManualClock::new();
        let wall_clock = ManualClock::new();
        let platform = Platform {
            surface: RecordingSurface::new(config.viewport),
            input: ScriptedInput::new(),
            images: MemoryImages::new(),
            saves,
        };
        let game = Game::new(
            config,
            platform,
            Clocks::manual(frame_clock.clone(), wall_clock.clone()),
        )
        .expect("headless setup cannot fail");
        Self {
            game,
            frame_clock,
            wall_clock,
        }
    }

    /// Advances both clocks by `by`.
    pub fn advance(&self, by: Duration) {
        self.frame_clock.advance(by);
        self.wall_clock.advance(by);
    }

    /// Queues `snapshot`, advances the clocks by `dt` and runs one frame.
    pub fn frame_with(&mut self, snapshot: InputSnapshot, dt: Duration) -> Option<StepReport> {
        self.game.platform_mut().input.push_snapshot(snapshot);
        self.advance(dt);
        self.game.frame().expect("headless frame cannot fail")
    }
}
