//! Terminal display surface.
//!
//! The game thinks in pixels. The surface divides the terminal into cells of
//! a fixed pixel size, paints glyphs into a back grid of cells and writes
//! the whole grid to the terminal on present.

use std::io::Write;

use crossterm::style::{self, Color, Print};
use crossterm::{cursor, terminal, ExecutableCommand, QueueableCommand};
use duelwing_core::config::Viewport;
use duelwing_core::platform::{DrawTarget, ImageHandle, Surface};
use duelwing_core::Result;

use crate::glyphs::{Art, GlyphTable};

const HUD_COLOR: Color = Color::White;

/// Pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    /// Pixels per column
    pub width: u32,
    /// Pixels per row
    pub height: u32,
}

impl CellSize {
    /// Pixel viewport covered by `cols` x `rows` cells.
    #[must_use]
    pub fn viewport(self, cols: u16, rows: u16) -> Viewport {
        Viewport::new(u32::from(cols) * self.width, u32::from(rows) * self.height)
    }

    fn col(self, x: i32) -> i32 {
        x.div_euclid(i32::try_from(self.width).unwrap_or(i32::MAX).max(1))
    }

    fn row(self, y: i32) -> i32 {
        y.div_euclid(i32::try_from(self.height).unwrap_or(i32::MAX).max(1))
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self { width: 8, height: 16 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

fn is_star(col: i32, row: i32) -> bool {
    (col * 7 + row * 13).rem_euclid(29) == 0
}

/// Back buffer of character cells.
#[derive(Debug, Clone)]
pub struct Grid {
    cols: u16,
    rows: u16,
    cell: CellSize,
    cells: Vec<Cell>,
    glyphs: GlyphTable,
}

impl Grid {
    fn new(cols: u16, rows: u16, cell: CellSize, glyphs: GlyphTable) -> Self {
        Self {
            cols,
            rows,
            cell,
            cells: vec![BLANK; usize::from(cols) * usize::from(rows)],
            glyphs,
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![BLANK; usize::from(cols) * usize::from(rows)];
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        (col < usize::from(self.cols) && row < usize::from(self.rows))
            .then(|| row * usize::from(self.cols) + col)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if let Some(index) = self.index(col, row) {
            self.cells[index] = Cell { ch, color };
        }
    }

    /// Character at a cell, or `None` outside the grid.
    #[must_use]
    #[cfg(test)]
    pub fn char_at(&self, col: u16, row: u16) -> Option<char> {
        self.index(i32::from(col), i32::from(row)).map(|index| self.cells[index].ch)
    }

    /// One row of the grid as a string.
    #[must_use]
    #[cfg(test)]
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols).filter_map(|col| self.char_at(col, row)).collect()
    }

    fn starfield(&mut self, top: i32, color: Color) {
        let rows = i32::from(self.rows);
        for row in 0..rows {
            let local = row - top;
            if !(0..rows).contains(&local) {
                continue;
            }
            for col in 0..i32::from(self.cols) {
                if is_star(col, local) {
                    self.put(col, row, '.', color);
                }
            }
        }
    }
}

impl DrawTarget for Grid {
    fn blit(&mut self, image: ImageHandle, x: i32, y: i32) {
        let Some(glyph) = self.glyphs.get(image) else {
            tracing::warn!(?image, "blit of unknown image");
            return;
        };
        let (col, row) = (self.cell.col(x), self.cell.row(y));
        match glyph.art {
            Art::Starfield => self.starfield(row, glyph.color),
            Art::Rows(lines) => {
                for (dy, line) in (0i32..).zip(lines) {
                    for (dx, ch) in (0i32..).zip(line.chars()) {
                        if ch != ' ' {
                            self.put(col + dx, row + dy, ch, glyph.color);
                        }
                    }
                }
            }
        }
    }

    fn text(&mut self, x: i32, y: i32, text: &str) {
        let (col, row) = (self.cell.col(x), self.cell.row(y));
        for (dx, ch) in (0i32..).zip(text.chars()) {
            self.put(col + dx, row, ch, HUD_COLOR);
        }
    }
}

/// Surface that writes frames to a terminal.
pub struct TerminalSurface<W: Write> {
    out: W,
    grid: Grid,
    follow_terminal: bool,
}

impl<W: Write> TerminalSurface<W> {
    /// Creates a surface of `cols` x `rows` cells writing to `out`.
    pub fn new(out: W, cols: u16, rows: u16, cell: CellSize, glyphs: GlyphTable) -> Self {
        Self {
            out,
            grid: Grid::new(cols, rows, cell, glyphs),
            follow_terminal: false,
        }
    }

    /// Resizes the grid to the real terminal before every frame.
    #[must_use]
    pub fn following_terminal(mut self) -> Self {
        self.follow_terminal = true;
        self
    }

    /// Back grid as last painted.
    #[cfg(test)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Underlying writer.
    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Changes the grid size.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) != (self.grid.cols, self.grid.rows) {
            tracing::debug!(cols, rows, "terminal surface resized");
            self.grid.resize(cols, rows);
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn viewport(&self) -> Viewport {
        self.grid.cell.viewport(self.grid.cols, self.grid.rows)
    }

    fn clear(&mut self) -> Result<()> {
        if self.follow_terminal {
            let (cols, rows) = terminal::size()?;
            self.resize(cols, rows);
        }
        self.grid.clear();
        Ok(())
    }

    fn draw_target(&mut self) -> &mut dyn DrawTarget {
        &mut self.grid
    }

    fn present(&mut self) -> Result<()> {
        let cols = usize::from(self.grid.cols);
        for (row, line) in (0u16..).zip(self.grid.cells.chunks(cols.max(1))) {
            self.out.queue(cursor::MoveTo(0, row))?;
            let mut color = None;
            for cell in line {
                if color != Some(cell.color) {
                    self.out.queue(style::SetForegroundColor(cell.color))?;
                    color = Some(cell.color);
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        if let Err(err) = self.out.execute(terminal::SetTitle(title)) {
            tracing::warn!(error = %err, "could not set terminal title");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::GlyphImages;
    use duelwing_core::platform::ImageLoader;
    use std::path::Path;

    fn surface_with(sprites: &[&str]) -> (TerminalSurface<Vec<u8>>, Vec<ImageHandle>) {
        let table = GlyphTable::new();
        let mut images = GlyphImages::new(table.clone());
        let handles = sprites
            .iter()
            .map(|name| images.load(Path::new(name)).unwrap())
            .collect();
        (
            TerminalSurface::new(Vec::new(), 20, 6, CellSize::default(), table),
            handles,
        )
    }

    mod cell_size_tests {
        use super::*;

        #[test]
        fn viewport_in_pixels() {
            assert_eq!(CellSize::default().viewport(100, 37), Viewport::new(800, 592));
        }

        #[test]
        fn negative_pixels_floor_to_previous_cell() {
            let cell = CellSize::default();
            assert_eq!(cell.col(-1), -1);
            assert_eq!(cell.col(15), 1);
            assert_eq!(cell.row(-16), -1);
            assert_eq!(cell.row(-17), -2);
        }
    }

    mod grid_tests {
        use super::*;

        #[test]
        fn blit_paints_rows_at_cell_of_pixel() {
            let (mut surface, handles) = surface_with(&["crate.bmp"]);
            surface.draw_target().blit(handles[0], 16, 32);
            assert_eq!(surface.grid().row_text(2), format!("{:<20}", "  [##]"));
            assert_eq!(surface.grid().row_text(3), format!("{:<20}", "  [##]"));
        }

        #[test]
        fn blit_clips_at_edges() {
            let (mut surface, handles) = surface_with(&["crate.bmp"]);
            surface.draw_target().blit(handles[0], -16, -16);
            assert_eq!(surface.grid().row_text(0), format!("{:<20}", "#]"));
        }

        #[test]
        fn spaces_are_transparent() {
            let (mut surface, handles) = surface_with(&["crate.bmp", "ship1_up.bmp"]);
            surface.draw_target().blit(handles[0], 0, 0);
            surface.draw_target().blit(handles[1], 0, 0);
            assert_eq!(surface.grid().char_at(0, 0), Some('['));
            assert_eq!(surface.grid().char_at(1, 0), Some('/'));
        }

        #[test]
        fn text_writes_hud_line() {
            let (mut surface, _) = surface_with(&[]);
            surface.draw_target().text(8, 8, "P1");
            assert_eq!(surface.grid().row_text(0), format!("{:<20}", " P1"));
        }

        #[test]
        fn starfield_scrolls_with_offset() {
            let (mut surface, handles) = surface_with(&["background.bmp"]);
            surface.draw_target().blit(handles[0], 0, 0);
            let top = surface.grid().row_text(0);
            assert_eq!(surface.grid().char_at(0, 0), Some('.'));

            surface.clear().unwrap();
            surface.draw_target().blit(handles[0], 0, 16);
            assert_eq!(surface.grid().row_text(1), top);
            assert_eq!(surface.grid().row_text(0).trim(), "");
        }

        #[test]
        fn clear_blanks_every_cell() {
            let (mut surface, handles) = surface_with(&["crate.bmp"]);
            surface.draw_target().blit(handles[0], 0, 0);
            surface.clear().unwrap();
            assert_eq!(surface.grid().row_text(0).trim(), "");
        }
    }

    mod present_tests {
        use super::*;

        #[test]
        fn present_writes_grid_characters() {
            let (mut surface, handles) = surface_with(&["bonus_life.bmp"]);
            surface.draw_target().blit(handles[0], 0, 0);
            surface.present().unwrap();
            let written = String::from_utf8_lossy(surface.writer());
            assert!(written.contains("<3"));
        }

        #[test]
        fn resize_changes_viewport() {
            let (mut surface, _) = surface_with(&[]);
            surface.resize(40, 10);
            assert_eq!(surface.viewport(), Viewport::new(320, 160));
        }
    }
}
