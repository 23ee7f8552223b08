//! Platform collaborator interfaces.
//!
//! The core never touches a window, a keyboard, an image file or the file
//! system directly. It calls these narrow traits instead:
//!
//! - [`Surface`]: clear / draw target / present, sized by a [`Viewport`]
//! - [`DrawTarget`]: where images and HUD text are painted
//! - [`ImageLoader`]: turns an asset path into an [`ImageHandle`]
//! - [`SaveStore`]: reads and writes the flat-text position save
//!
//! Input lives in [`crate::input::InputSource`].
//!
//! The [`headless`] module provides in-memory implementations that record
//! what was drawn, for tests and for running the simulation without a
//! display.

pub mod headless;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Viewport;
use crate::error::Result;

/// Opaque reference to an image owned by an [`ImageLoader`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageHandle(u32);

impl ImageHandle {
    /// Wraps a loader-specific image number.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the loader-specific image number.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({})", self.0)
    }
}

/// Something images and text can be painted onto.
///
/// Coordinates are pixels from the top-left corner of the viewport and may
/// lie partly or wholly outside it; implementations clip.
pub trait DrawTarget {
    /// Paints `image` with its top-left corner at `(x, y)`.
    fn blit(&mut self, image: ImageHandle, x: i32, y: i32);

    /// Writes a line of HUD text starting at `(x, y)`.
    fn text(&mut self, x: i32, y: i32, text: &str);
}

/// Display surface the game presents frames on.
pub trait Surface {
    /// Current size of the drawable area.
    fn viewport(&self) -> Viewport;

    /// Clears the back buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is no longer usable.
    fn clear(&mut self) -> Result<()>;

    /// Back buffer to paint the frame onto.
    fn draw_target(&mut self) -> &mut dyn DrawTarget;

    /// Shows the back buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame could not be presented.
    fn present(&mut self) -> Result<()>;

    /// Sets the window title. Surfaces without a title ignore it.
    fn set_title(&mut self, _title: &str) {}
}

/// Loads images and paints them.
pub trait ImageLoader {
    /// Loads the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Asset`](crate::error::GameError::Asset) if the
    /// image cannot be loaded.
    fn load(&mut self, path: &Path) -> Result<ImageHandle>;

    /// Paints `image` onto `target` with its top-left corner at `(x, y)`.
    fn paint(&self, image: ImageHandle, target: &mut dyn DrawTarget, x: i32, y: i32) {
        target.blit(image, x, y);
    }
}

/// Storage for the position save.
pub trait SaveStore {
    /// Reads the whole save.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no save or it cannot be read.
    fn read(&self) -> Result<String>;

    /// Replaces the save with `contents`.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be written.
    fn write(&mut self, contents: &str) -> Result<()>;
}
