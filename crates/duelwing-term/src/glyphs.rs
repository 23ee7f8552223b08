//! Character art standing in for the sprite images.
//!
//! The terminal has no bitmaps, so [`GlyphImages`] resolves each sprite file
//! name to a piece of [`Art`] instead of reading the file. Loaded glyphs live
//! in a [`GlyphTable`] shared with the surface, which looks them up again
//! when an image handle is blitted.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crossterm::style::Color;
use duelwing_core::platform::{ImageHandle, ImageLoader};
use duelwing_core::{GameError, Result};

/// How a glyph covers the cells under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Art {
    /// Rows of characters; spaces are transparent.
    Rows(&'static [&'static str]),
    /// Sparse stars across a whole screen's worth of rows.
    Starfield,
}

/// One drawable piece of character art.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Shape
    pub art: Art,
    /// Foreground colour
    pub color: Color,
}

impl Glyph {
    const fn rows(art: &'static [&'static str], color: Color) -> Self {
        Self {
            art: Art::Rows(art),
            color,
        }
    }
}

const SHIP_UP: &[&str] = &[" /\\ ", "/__\\"];
const SHIP_DOWN: &[&str] = &["\\--/", " \\/ "];
const SHIP_LEFT: &[&str] = &[" <==", "<== "];
const SHIP_RIGHT: &[&str] = &["==> ", " ==>"];
const EXPLOSION: [&[&str]; 4] = [
    &[" .. ", " .. "],
    &[".**.", ".**."],
    &["*##*", "*##*"],
    &["+  +", "+  +"],
];

/// Glyph for a sprite file name, or `None` if the name is unknown.
#[must_use]
pub fn glyph_for(file_name: &str) -> Option<Glyph> {
    let stem = file_name.strip_suffix(".bmp")?;
    let glyph = match stem {
        "background" => Glyph {
            art: Art::Starfield,
            color: Color::DarkGrey,
        },
        "crate" => Glyph::rows(&["[##]", "[##]"], Color::DarkYellow),
        "bonus_life" => Glyph::rows(&["<3"], Color::Magenta),
        "enemy" => Glyph::rows(&["}-o-{", " \\ / "], Color::Green),
        "bullet" => Glyph::rows(&["|"], Color::Cyan),
        "enemy_bullet" => Glyph::rows(&["o"], Color::Red),
        _ => return ship_glyph(stem).or_else(|| explosion_glyph(stem)),
    };
    Some(glyph)
}

fn ship_glyph(stem: &str) -> Option<Glyph> {
    let (ship, facing) = stem.strip_prefix("ship")?.split_once('_')?;
    let color = match ship {
        "1" => Color::White,
        "2" => Color::Yellow,
        _ => return None,
    };
    let art = match facing {
        "up" => SHIP_UP,
        "down" => SHIP_DOWN,
        "left" => SHIP_LEFT,
        "right" => SHIP_RIGHT,
        _ => return None,
    };
    Some(Glyph::rows(art, color))
}

fn explosion_glyph(stem: &str) -> Option<Glyph> {
    let frame: usize = stem.strip_prefix("explosion_")?.parse().ok()?;
    Some(Glyph::rows(EXPLOSION[frame % EXPLOSION.len()], Color::Red))
}

/// Loaded glyphs indexed by image handle.
#[derive(Debug, Clone, Default)]
pub struct GlyphTable(Rc<RefCell<Vec<Glyph>>>);

impl GlyphTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, glyph: Glyph) -> ImageHandle {
        let mut glyphs = self.0.borrow_mut();
        let handle = ImageHandle::new(u32::try_from(glyphs.len()).unwrap_or(u32::MAX));
        glyphs.push(glyph);
        handle
    }

    /// Glyph behind `handle`, if it was loaded through this table.
    #[must_use]
    pub fn get(&self, handle: ImageHandle) -> Option<Glyph> {
        let index = usize::try_from(handle.as_u32()).ok()?;
        self.0.borrow().get(index).copied()
    }

    /// Number of loaded glyphs.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Image loader that maps sprite file names to glyphs.
#[derive(Debug, Default)]
pub struct GlyphImages {
    table: GlyphTable,
    loaded: HashMap<PathBuf, ImageHandle>,
}

impl GlyphImages {
    /// Creates a loader that registers glyphs in `table`.
    #[must_use]
    pub fn new(table: GlyphTable) -> Self {
        Self {
            table,
            loaded: HashMap::new(),
        }
    }
}

impl ImageLoader for GlyphImages {
    fn load(&mut self, path: &Path) -> Result<ImageHandle> {
        if let Some(&handle) = self.loaded.get(path) {
            return Ok(handle);
        }
        let glyph = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(glyph_for)
            .ok_or_else(|| GameError::Asset {
                path: path.display().to_string(),
                reason: "no glyph for this sprite".into(),
            })?;
        let handle = self.table.push(glyph);
        self.loaded.insert(path.to_path_buf(), handle);
        tracing::trace!(path = %path.display(), ?handle, "glyph loaded");
        Ok(handle)
    }
}
