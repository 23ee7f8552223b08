//! The cooperative game loop.
//!
//! [`Game`] owns the [`World`], the [`Renderer`] and every platform
//! collaborator. [`Game::run`] alternates between draining pending
//! [`PlatformEvent`]s and running one frame:
//!
//! ```text
//!             Deactivated
//!   Running ──────────────▶ Idle
//!      ▲                     │
//!      └─────────────────────┘
//!          Restored{viewport}
//! ```
//!
//! A running frame ticks the frame timer, polls input, applies both ships'
//! intents, steps the world and renders. An idle frame only ticks the timer
//! (so the first frame after a restore does not see the idle gap as its
//! delta) and then sleeps for the configured idle wait.

use std::time::Duration;

use glam::Vec2;

use crate::config::GameConfig;
use crate::entity::ShipId;
use crate::error::Result;
use crate::input::{Controls, InputSnapshot, InputSource, Keys, PlatformEvent};
use crate::platform::{ImageLoader, SaveStore, Surface};
use crate::render::Renderer;
use crate::save::SavedPositions;
use crate::time::{FrameTimer, ManualClock, SystemClock, TimeSource};
use crate::world::{StepReport, World};

/// Whether frames are being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Window inactive: no update, no render
    Idle,
    /// Simulating and rendering every frame
    Running,
}

/// Platform collaborators the loop drives.
#[derive(Debug, Clone, Default)]
pub struct Platform<S, I, L, St> {
    /// Display surface
    pub surface: S,
    /// Events and key state
    pub input: I,
    /// Image loading and painting
    pub images: L,
    /// Position save storage
    pub saves: St,
}

/// The two independent time sources.
pub struct Clocks {
    /// Feeds the frame timer; movement scales with its deltas
    pub frame: Box<dyn TimeSource>,
    /// Times enemy volleys, explosion frames and background scrolling
    pub wall: Box<dyn TimeSource>,
}

impl Clocks {
    /// Both clocks on real monotonic time.
    #[must_use]
    pub fn system() -> Self {
        Self {
            frame: Box::new(SystemClock::new()),
            wall: Box::new(SystemClock::new()),
        }
    }

    /// Hand-driven clocks; keep clones of the arguments to advance them.
    #[must_use]
    pub fn manual(frame: ManualClock, wall: ManualClock) -> Self {
        Self {
            frame: Box::new(frame),
            wall: Box::new(wall),
        }
    }
}

/// A game session.
pub struct Game<S, I, L, St> {
    world: World,
    renderer: Renderer,
    platform: Platform<S, I, L, St>,
    clocks: Clocks,
    timer: FrameTimer,
    state: LoopState,
    controls: [Controls; 2],
    shown_frame_rate: Option<u32>,
    pointer_delta: Option<Vec2>,
    idle_wait: Duration,
    quit: bool,
}

impl<S, I, L, St> Game<S, I, L, St>
where
    S: Surface,
    I: InputSource,
    L: ImageLoader,
    St: SaveStore,
{
    /// Loads the sprites and sets up the world.
    ///
    /// The world adopts the surface's viewport.
    ///
    /// # Errors
    ///
    /// Fails if a sprite image cannot be loaded. Such errors are fatal.
    pub fn new(mut config: GameConfig, mut platform: Platform<S, I, L, St>, clocks: Clocks) -> Result<Self> {
        config.viewport = platform.surface.viewport();
        let now = clocks.wall.now();
        let renderer = Renderer::new(&mut platform.images, &config, now)?;
        let idle_wait = config.idle_wait();
        let world = World::new(config, now);
        tracing::info!("game session created");

        Ok(Self {
            world,
            renderer,
            platform,
            clocks,
            timer: FrameTimer::new(),
            state: LoopState::Running,
            controls: ShipId::ALL.map(Controls::for_ship),
            shown_frame_rate: None,
            pointer_delta: None,
            idle_wait,
            quit: false,
        })
    }

    /// Simulation state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable simulation state.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Platform collaborators.
    #[must_use]
    pub const fn platform(&self) -> &Platform<S, I, L, St> {
        &self.platform
    }

    /// Mutable platform collaborators.
    pub fn platform_mut(&mut self) -> &mut Platform<S, I, L, St> {
        &mut self.platform
    }

    /// Current loop state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// `true` once quit has been requested.
    #[must_use]
    pub const fn is_quit(&self) -> bool {
        self.quit
    }

    /// Pointer delta reported by the last running frame, while captured.
    #[must_use]
    pub const fn pointer_delta(&self) -> Option<Vec2> {
        self.pointer_delta
    }

    /// Frames per second measured by the frame timer.
    #[must_use]
    pub const fn frame_rate(&self) -> u32 {
        self.timer.frame_rate()
    }

    /// Runs until quit.
    ///
    /// # Errors
    ///
    /// Propagates surface failures while presenting a frame.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("game loop started");
        loop {
            self.pump_events();
            if self.quit {
                break;
            }
            self.frame()?;
            if self.state == LoopState::Idle {
                std::thread::sleep(self.idle_wait);
            }
            if self.quit {
                break;
            }
        }
        tracing::info!(frames = self.world.frame(), "game loop finished");
        Ok(())
    }

    /// Handles every pending platform event.
    pub fn pump_events(&mut self) {
        while let Some(event) = self.platform.input.poll_event() {
            match event {
                PlatformEvent::Quit => {
                    tracing::info!("quit requested");
                    self.quit = true;
                }
                PlatformEvent::Deactivated => self.set_state(LoopState::Idle),
                PlatformEvent::Restored { viewport } => {
                    self.world.set_viewport(viewport);
                    self.set_state(LoopState::Running);
                }
            }
        }
    }

    fn set_state(&mut self, state: LoopState) {
        if self.state != state {
            tracing::info!(from = ?self.state, to = ?state, "loop state changed");
            self.state = state;
        }
    }

    /// Runs one frame.
    ///
    /// Returns `None` if the loop is idle or the frame's input requested
    /// quit.
    ///
    /// # Errors
    ///
    /// Propagates surface failures while presenting.
    pub fn frame(&mut self) -> Result<Option<StepReport>> {
        let elapsed = self.timer.tick(self.clocks.frame.now());
        if self.state == LoopState::Idle {
            return Ok(None);
        }
        self.refresh_title();

        let snapshot = self.platform.input.snapshot();
        self.handle_commands(&snapshot);
        if self.quit {
            return Ok(None);
        }

        for id in ShipId::ALL {
            let intent = self.controls[id.index()].intent(&snapshot);
            self.world.apply_intent(id, &intent, elapsed);
        }

        let wall_now = self.clocks.wall.now();
        let report = self.world.step(elapsed, wall_now);
        self.renderer.draw(
            &self.world,
            &mut self.platform.surface,
            &self.platform.images,
            wall_now,
        )?;
        Ok(Some(report))
    }

    fn refresh_title(&mut self) {
        let rate = self.timer.frame_rate();
        if self.shown_frame_rate != Some(rate) {
            self.platform.surface.set_title(&format!("Game : {rate} FPS"));
            self.shown_frame_rate = Some(rate);
        }
    }

    fn handle_commands(&mut self, snapshot: &InputSnapshot) {
        if snapshot.was_pressed(Keys::ESCAPE) {
            tracing::info!("quit requested from keyboard");
            self.quit = true;
            return;
        }
        if snapshot.was_pressed(Keys::K) {
            if let Err(err) = self.save_game() {
                tracing::warn!(error = %err, "save failed");
            }
        }
        if snapshot.was_pressed(Keys::L) {
            if let Err(err) = self.load_game() {
                tracing::warn!(error = %err, "load failed");
            }
        }
        self.pointer_delta = snapshot.pointer_delta;
        if let Some(delta) = self.pointer_delta {
            tracing::trace!(dx = delta.x, dy = delta.y, "pointer moved");
        }
    }

    /// Writes both ship positions to the save store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    pub fn save_game(&mut self) -> Result<()> {
        let saved = self.world.save_positions();
        self.platform.saves.write(&saved.encode())?;
        tracing::info!(%saved, "game saved");
        Ok(())
    }

    /// Moves both ships to the positions in the save store.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or [`GameError::SaveFormat`] if the save
    /// is malformed. Positions are unchanged on error.
    ///
    /// [`GameError::SaveFormat`]: crate::error::GameError::SaveFormat
    pub fn load_game(&mut self) -> Result<()> {
        let text = self.platform.saves.read()?;
        let saved = SavedPositions::parse(&text)?;
        self.world.load_positions(&saved);
        tracing::info!(%saved, "game loaded");
        Ok(())
    }
}
