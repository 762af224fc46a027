// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

/// One terminal cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    pub fn blank(bg: Option<Color>) -> Self {
        Self { ch: ' ', fg: None, bg }
    }
}
