// Copyright (c) 2026 rezky_nightky

use std::ops::Range;

use crate::cell::Cell;
use crate::color::{background, Rgba};
use crate::render::{GlyphFont, Point, Rect, Size, Surface};
use crate::runtime::ColorMode;

/// Terminal-sized cell buffer that remembers which cells were written with
/// a new value since the last flush. A cell rewritten back to its flushed
/// content still counts; the terminal writer skips those.
///
/// Exposed to the renderer as a [`Surface`] where every cell is
/// `cell_size` units square and `y` grows upward from the bottom line.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cell_size: f32,
    color_mode: ColorMode,
    cells: Vec<Cell>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, cell_size: f32, color_mode: ColorMode) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cell_size,
            color_mode,
            cells: vec![Cell::blank(background(color_mode)); len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
        } else {
            for &i in &self.dirty {
                self.dirty_map[i] = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells[i]
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// A `cols`-wide vertical strip starting at column `start`, clipped to
    /// the frame.
    pub fn region(&mut self, start: u16, cols: u16) -> FrameRegion<'_> {
        let start = start.min(self.width);
        let cols = cols.min(self.width - start);
        FrameRegion {
            frame: self,
            start,
            cols,
        }
    }
}

/// Cells overlapped by `lo..hi` along one axis, clipped to `0..limit`.
fn cell_span(lo: f32, hi: f32, cell_size: f32, limit: u16) -> Range<u16> {
    if !lo.is_finite() || !hi.is_finite() || !cell_size.is_finite() {
        return 0..0;
    }
    if cell_size <= 0.0 || hi <= lo {
        return 0..0;
    }
    let first = (lo / cell_size).floor().max(0.0);
    let last = (hi / cell_size).ceil().min(limit as f32);
    if last <= first {
        return 0..0;
    }
    first as u16..last as u16
}

/// Cell index nearest to a glyph origin coordinate.
fn cell_at(v: f32, cell_size: f32, limit: u16) -> Option<u16> {
    if !v.is_finite() || !cell_size.is_finite() || cell_size <= 0.0 {
        return None;
    }
    let c = (v / cell_size).round();
    if c < 0.0 || c >= limit as f32 {
        return None;
    }
    Some(c as u16)
}

/// A vertical strip of a [`Frame`] that acts as an independent surface.
pub struct FrameRegion<'a> {
    frame: &'a mut Frame,
    start: u16,
    cols: u16,
}

impl FrameRegion<'_> {
    /// Converts a bottom-up cell row into a frame line.
    fn line(&self, from_bottom: u16) -> u16 {
        self.frame.height - 1 - from_bottom
    }
}

impl Surface for FrameRegion<'_> {
    fn bounds(&self) -> Size {
        Size {
            width: self.cols as f32 * self.frame.cell_size,
            height: self.frame.height as f32 * self.frame.cell_size,
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let cs = self.frame.cell_size;
        let cols = cell_span(
            rect.origin.x,
            rect.origin.x + rect.size.width,
            cs,
            self.cols,
        );
        let rows = cell_span(
            rect.origin.y,
            rect.origin.y + rect.size.height,
            cs,
            self.frame.height,
        );
        let blank = Cell::blank(color.to_terminal(self.frame.color_mode));
        for from_bottom in rows {
            let line = self.line(from_bottom);
            for col in cols.clone() {
                self.frame.set(self.start + col, line, blank);
            }
        }
    }

    fn draw_glyph(&mut self, ch: char, at: Point, font: &GlyphFont, color: Rgba) {
        let cs = self.frame.cell_size;
        // one terminal cell per glyph; the font cannot be scaled
        debug_assert!((font.size - cs).abs() <= f32::EPSILON * cs.max(1.0));
        let (Some(col), Some(from_bottom)) = (
            cell_at(at.x, cs, self.cols),
            cell_at(at.y, cs, self.frame.height),
        ) else {
            return;
        };
        let x = self.start + col;
        let y = self.line(from_bottom);
        let bg = self.frame.get(x, y).and_then(|c| c.bg);
        let fg = color.to_terminal(self.frame.color_mode);
        self.frame.set(x, y, Cell { ch, fg, bg });
    }
}

impl Surface for Frame {
    fn bounds(&self) -> Size {
        Size {
            width: self.width as f32 * self.cell_size,
            height: self.height as f32 * self.cell_size,
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let w = self.width;
        self.region(0, w).fill_rect(rect, color);
    }

    fn draw_glyph(&mut self, ch: char, at: Point, font: &GlyphFont, color: Rgba) {
        let w = self.width;
        self.region(0, w).draw_glyph(ch, at, font, color);
    }
}
