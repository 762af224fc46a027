// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::error::Result;
use crate::frame::Frame;

/// What was last written to the screen, so unchanged cells can be skipped.
struct Shown {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

/// Tracks the colors and cursor position the terminal currently has, so
/// escape sequences are only emitted on change.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn put(&mut self, out: &mut Stdout, x: u16, y: u16, cell: Cell, width: u16) -> Result<()> {
        if self.pos != Some((x, y)) {
            out.queue(cursor::MoveTo(x, y))?;
        }
        if cell.fg != self.fg {
            out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = cell.fg;
        }
        if cell.bg != self.bg {
            out.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.bg = cell.bg;
        }
        out.queue(Print(cell.ch))?;
        self.pos = (x + 1 < width).then_some((x + 1, y));
        Ok(())
    }
}

/// Full-screen terminal session: alternate screen, raw mode, hidden cursor.
/// Everything is restored on drop.
pub struct Terminal {
    stdout: Stdout,
    shown: Option<Shown>,
    order: Vec<usize>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: std::io::Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = init {
            restore_terminal_best_effort();
            return Err(e.into());
        }
        Ok(Self {
            stdout: out,
            shown: None,
            order: Vec::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }

    pub fn read_event() -> Result<event::Event> {
        Ok(event::read()?)
    }

    /// Writes the frame: everything on the first draw or after a size
    /// change, otherwise only cells that differ from what is on screen.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let same_size = self
            .shown
            .as_ref()
            .is_some_and(|s| s.width == frame.width && s.height == frame.height);
        let mut pen = Pen::default();

        if !same_size || frame.is_dirty_all() {
            self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
            let mut cells = Vec::with_capacity(frame.width as usize * frame.height as usize);
            for y in 0..frame.height {
                for x in 0..frame.width {
                    let cell = frame.cell_at_index(cells.len());
                    pen.put(&mut self.stdout, x, y, cell, frame.width)?;
                    cells.push(cell);
                }
            }
            self.shown = Some(Shown {
                width: frame.width,
                height: frame.height,
                cells,
            });
        } else if let Some(shown) = self.shown.as_mut() {
            self.order.clear();
            self.order.extend_from_slice(frame.dirty_indices());
            self.order.sort_unstable();

            let width = frame.width as usize;
            for &i in &self.order {
                let cell = frame.cell_at_index(i);
                if shown.cells[i] == cell {
                    continue;
                }
                shown.cells[i] = cell;
                let (x, y) = ((i % width) as u16, (i / width) as u16);
                pen.put(&mut self.stdout, x, y, cell, frame.width)?;
            }
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
