//! In-memory platform implementations.
//!
//! Nothing here touches a real display or file system. The recording surface
//! keeps the draw commands of the last presented frame so tests can assert
//! on what was painted and in which order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Viewport;
use crate::error::{GameError, Result};

use super::{DrawTarget, ImageHandle, ImageLoader, SaveStore, Surface};

/// One recorded paint operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// An image painted with its top-left corner at `(x, y)`
    Blit {
        /// Image painted
        image: ImageHandle,
        /// Left edge
        x: i32,
        /// Top edge
        y: i32,
    },
    /// A line of HUD text
    Text {
        /// Left edge
        x: i32,
        /// Top edge
        y: i32,
        /// Text written
        text: String,
    },
}

/// Draw target that appends every command to a list.
#[derive(Debug, Default, Clone)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    /// Recorded commands in paint order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl DrawTarget for CommandBuffer {
    fn blit(&mut self, image: ImageHandle, x: i32, y: i32) {
        self.commands.push(DrawCommand::Blit { image, x, y });
    }

    fn text(&mut self, x: i32, y: i32, text: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_owned(),
        });
    }
}

/// Surface that records frames instead of showing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    back: CommandBuffer,
    front: CommandBuffer,
    presented: u64,
    title: Option<String>,
}

impl RecordingSurface {
    /// Creates a surface of the given size.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            back: CommandBuffer::default(),
            front: CommandBuffer::default(),
            presented: 0,
            title: None,
        }
    }

    /// Changes the reported size, as a window resize would.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Commands of the most recently presented frame.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawCommand] {
        self.front.commands()
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Last title set, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) -> Result<()> {
        self.back = CommandBuffer::default();
        Ok(())
    }

    fn draw_target(&mut self) -> &mut dyn DrawTarget {
        &mut self.back
    }

    fn present(&mut self) -> Result<()> {
        self.front = std::mem::take(&mut self.back);
        self.presented += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }
}

/// Image loader that hands out sequential handles without reading files.
///
/// Paths can be marked missing to exercise asset failures.
#[derive(Debug, Default, Clone)]
pub struct MemoryImages {
    loaded: BTreeMap<PathBuf, ImageHandle>,
    missing: Vec<PathBuf>,
    next: u32,
}

impl MemoryImages {
    /// Creates a loader that accepts every path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes loading `path` fail.
    #[must_use]
    pub fn with_missing(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing.push(path.into());
        self
    }

    /// Handle previously returned for `path`.
    #[must_use]
    pub fn handle_for(&self, path: &Path) -> Option<ImageHandle> {
        self.loaded.get(path).copied()
    }

    /// Number of distinct images loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// `true` if nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

impl ImageLoader for MemoryImages {
    fn load(&mut self, path: &Path) -> Result<ImageHandle> {
        if self.missing.iter().any(|missing| missing == path) {
            return Err(GameError::Asset {
                path: path.display().to_string(),
                reason: "no such image".into(),
            });
        }
        if let Some(handle) = self.loaded.get(path) {
            return Ok(*handle);
        }
        let handle = ImageHandle::new(self.next);
        self.next += 1;
        self.loaded.insert(path.to_path_buf(), handle);
        Ok(handle)
    }
}

/// Save store backed by a string.
#[derive(Debug, Default, Clone)]
pub struct MemorySaveStore {
    contents: Option<String>,
    writes: usize,
}

impl MemorySaveStore {
    /// Creates an empty store; reading it fails until something is written.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `contents`.
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            writes: 0,
        }
    }

    /// Current contents.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of successful writes.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl SaveStore for MemorySaveStore {
    fn read(&self) -> Result<String> {
        self.contents.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no saved game").into()
        })
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        self.contents = Some(contents.to_owned());
        self.writes += 1;
        Ok(())
    }
}
