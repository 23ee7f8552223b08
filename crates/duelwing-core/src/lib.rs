//! # Duelwing Core
//!
//! Platform-independent core of a two-ship top-down arcade shooter.
//!
//! Two player ships share the screen with drifting crates, a bonus-life
//! pickup and sweeping enemies that shoot on a wall-clock cadence. The core
//! owns the simulation and the loop; a frontend supplies a display surface,
//! input, image loading and save storage through the traits in
//! [`platform`] and [`input`].
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): ships, projectiles, drifters and enemies,
//!   stored in generational [`arena`]s
//! - **World** ([`world`]): every collection plus the per-frame step
//! - **Collision** ([`collision`]): AABB overlap and the interaction policy
//!   table
//! - **Loop** ([`game`]): Idle/Running state machine over two injected
//!   clocks ([`time`])
//!
//! ## Usage
//!
//! ```
//! use duelwing_core::config::GameConfig;
//! use duelwing_core::game::{Clocks, Game, Platform};
//! use duelwing_core::input::ScriptedInput;
//! use duelwing_core::platform::headless::{MemoryImages, MemorySaveStore, RecordingSurface};
//!
//! let platform = Platform {
//!     surface: RecordingSurface::default(),
//!     input: ScriptedInput::new(),
//!     images: MemoryImages::new(),
//!     saves: MemorySaveStore::new(),
//! };
//! let mut game = Game::new(GameConfig::default(), platform, Clocks::system())?;
//! let report = game.frame()?.expect("loop starts running");
//! assert!(report.collisions.is_empty());
//! # Ok::<(), duelwing_core::error::GameError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod input;
pub mod platform;
pub mod render;
pub mod save;
pub mod time;
pub mod world;

pub use config::GameConfig;
pub use error::{GameError, Result};
pub use game::{Clocks, Game, LoopState, Platform};
pub use world::World;

#[cfg(test)]
mod tests;
