//! Terminal rasterizer for the logical canvas.
//!
//! The game draws in logical pixels on a fixed-size canvas.  A [`Canvas`]
//! holds one [`Cell`] per terminal character; each cell covers a block of
//! logical pixels.  Nothing here touches the terminal.

use crate::assets::{Font, Sprite};
use crate::entities::Rect;

/// Fonts at or above this size are drawn bold.
pub const BOLD_FONT_SIZE: u16 = 60;

pub type Rgb = [u8; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

impl Cell {
    pub fn blank(bg: Rgb) -> Self {
        Cell { glyph: ' ', fg: [255, 255, 255], bg, bold: false }
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Where the canvas sits inside the terminal.  Terminal cells are about
/// twice as tall as wide, so a square canvas uses twice as many columns as
/// rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub left: u16,
    pub top: u16,
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    /// Largest square-looking viewport that fits, centred.
    pub fn fit(term_cols: u16, term_rows: u16) -> Self {
        let rows = term_rows.min(term_cols / 2).max(1);
        let cols = rows * 2;
        Viewport {
            left: term_cols.saturating_sub(cols) / 2,
            top: term_rows.saturating_sub(rows) / 2,
            cols,
            rows,
        }
    }

    /// Terminal position → viewport cell, `None` outside the viewport.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        let col = column.checked_sub(self.left)?;
        let row = row.checked_sub(self.top)?;
        (col < self.cols && row < self.rows).then_some((col, row))
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    logical_width: u32,
    logical_height: u32,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, logical_width: u32, logical_height: u32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Canvas {
            cols,
            rows,
            logical_width,
            logical_height,
            cells: vec![Cell::blank([0, 0, 0]); cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell_width(&self) -> f32 {
        self.logical_width as f32 / self.cols as f32
    }

    pub fn cell_height(&self) -> f32 {
        self.logical_height as f32 / self.rows as f32
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    pub fn row(&self, row: u16) -> &[Cell] {
        let start = row.min(self.rows - 1) as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    fn cell_mut(&mut self, col: usize, row: usize) -> &mut Cell {
        &mut self.cells[row * self.cols as usize + col]
    }

    /// Logical block a cell covers.  `fill_rect` paints exactly the cells
    /// whose block overlaps the rectangle.
    pub fn cell_rect(&self, col: u16, row: u16) -> Rect {
        let (cw, ch) = (self.cell_width(), self.cell_height());
        Rect::new(col as f32 * cw, row as f32 * ch, cw, ch)
    }

    /// Columns and rows touched by a logical rectangle, clipped.
    fn cell_span(&self, x: f32, y: f32, w: f32, h: f32) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let (cw, ch) = (self.cell_width(), self.cell_height());
        let clip = |lo: f32, hi: f32, size: f32, count: u16| {
            let start = (lo / size).floor().max(0.0) as usize;
            let end = ((hi / size).ceil().max(0.0) as usize).min(count as usize);
            start..end.max(start)
        };
        (clip(x, x + w, cw, self.cols), clip(y, y + h, ch, self.rows))
    }

    pub fn clear(&mut self, color: Rgb) {
        self.cells.fill(Cell::blank(color));
    }

    /// Paint every cell the rectangle touches.  Empty rectangles paint
    /// nothing.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        let (cols, rows) = self.cell_span(rect.x, rect.y, rect.w, rect.h);
        for row in rows {
            for col in cols.clone() {
                *self.cell_mut(col, row) = Cell::blank(color);
            }
        }
    }

    /// Draw a sprite with its top-left corner at `(x, y)`.  Each cell takes
    /// the colour of the first opaque pixel in its block.  A null sprite
    /// draws nothing.
    pub fn blit(&mut self, sprite: Option<&Sprite>, x: f32, y: f32) {
        let Some(sprite) = sprite else {
            return;
        };
        let (sw, sh) = (sprite.width() as f32, sprite.height() as f32);
        let (cw, ch) = (self.cell_width(), self.cell_height());
        let (cols, rows) = self.cell_span(x, y, sw, sh);

        for row in rows {
            let py0 = (row as f32 * ch - y).floor().max(0.0) as u32;
            let py1 = ((row as f32 + 1.0) * ch - y).ceil().min(sh) as u32;
            for col in cols.clone() {
                let px0 = (col as f32 * cw - x).floor().max(0.0) as u32;
                let px1 = ((col as f32 + 1.0) * cw - x).ceil().min(sw) as u32;
                let color = (py0..py1)
                    .flat_map(|py| (px0..px1).map(move |px| (px, py)))
                    .find_map(|(px, py)| sprite.pixel(px, py));
                if let Some(color) = color {
                    *self.cell_mut(col, row) = Cell::blank(color);
                }
            }
        }
    }

    /// Logical width a string occupies (one cell per character).
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.cell_width()
    }

    /// Write text starting at the cell holding `(x, y)`.  Characters that
    /// fall off the right edge are dropped; the background is kept.
    pub fn text(&mut self, x: f32, y: f32, text: &str, color: Rgb, font: &Font) {
        if y < 0.0 {
            return;
        }
        let row = (y / self.cell_height()) as usize;
        if row >= self.rows as usize {
            return;
        }
        let first = (x / self.cell_width()).floor() as i64;
        for (i, glyph) in text.chars().enumerate() {
            let col = first + i as i64;
            if col < 0 {
                continue;
            }
            if col >= self.cols as i64 {
                break;
            }
            let cell = self.cell_mut(col as usize, row);
            cell.glyph = glyph;
            cell.fg = color;
            cell.bold = font.size >= BOLD_FONT_SIZE;
        }
    }
}
