//! Terminal frontend for Duelwing.
//!
//! Draws the arena as character art, reads both players from one keyboard
//! and keeps the position save in a text file. Logs go to a file so they do
//! not tear the display; set `RUST_LOG` to change the level.

mod glyphs;
mod input;
mod storage;
mod surface;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, terminal, ExecutableCommand};
use duelwing_core::game::{Clocks, Game, LoopState, Platform};
use duelwing_core::GameConfig;
use tracing_subscriber::filter::EnvFilter;

use crate::glyphs::{GlyphImages, GlyphTable};
use crate::input::TerminalInput;
use crate::storage::FileSaveStore;
use crate::surface::{CellSize, TerminalSurface};

/// Frame budget, about 60 frames per second.
const FRAME_BUDGET: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "duelwing")]
#[command(about = "Two-ship arcade shooter in the terminal")]
struct Cli {
    /// JSON configuration file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the world layout, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,
    /// Position save file, overriding the configuration
    #[arg(long)]
    save: Option<PathBuf>,
    /// Log file
    #[arg(long, default_value = "duelwing.log")]
    log: PathBuf,
    /// Pixels per terminal column
    #[arg(long, default_value_t = 8)]
    cell_width: u32,
    /// Pixels per terminal row
    #[arg(long, default_value_t = 16)]
    cell_height: u32,
}

impl Cli {
    fn cell(&self) -> CellSize {
        CellSize {
            width: self.cell_width.max(1),
            height: self.cell_height.max(1),
        }
    }

    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(save) = &self.save {
            config.save_path.clone_from(save);
        }
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log)?;
    let config = cli.game_config()?;

    let mut out = stdout();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;
    out.execute(EnableFocusChange)?;
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();
    tracing::info!(keyboard_enhanced, "terminal ready");

    // Blocking reads live on their own thread so the loop never waits on input.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(event) = event::read() {
            if tx.send(event).is_err() {
                break;
            }
        }
    });

    let result = play(config, cli.cell(), rx);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableFocusChange);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();

    if let Err(err) = &result {
        tracing::error!(error = %err, "session failed");
    }
    result
}

fn play(config: GameConfig, cell: CellSize, events: mpsc::Receiver<Event>) -> Result<()> {
    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let glyphs = GlyphTable::new();
    let platform = Platform {
        surface: TerminalSurface::new(BufWriter::new(stdout()), cols, rows, cell, glyphs.clone())
            .following_terminal(),
        input: TerminalInput::new(events, cell, (cols, rows)),
        images: GlyphImages::new(glyphs),
        saves: FileSaveStore::new(config.save_path.clone()),
    };
    tracing::info!(save = %platform.saves.path().display(), cols, rows, "terminal platform ready");
    let idle_wait = config.idle_wait();
    let mut game = Game::new(config, platform, Clocks::system()).context("failed to start game")?;

    while !game.is_quit() {
        let started = Instant::now();
        game.pump_events();
        if game.is_quit() {
            break;
        }
        game.frame().context("failed to present frame")?;

        if game.state() == LoopState::Idle {
            thread::sleep(idle_wait);
        } else if let Some(rest) = FRAME_BUDGET.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    for ship in game.world().ships() {
        tracing::info!(ship = %ship.id(), score = ship.score(), lives = ship.lives(), "final standing");
    }
    Ok(())
}
