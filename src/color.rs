// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

/// A straight-alpha color with channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Composites over opaque black and scales to 8-bit channels.
    pub fn over_black(self) -> (u8, u8, u8) {
        let a = self.a.clamp(0.0, 1.0);
        let q = |c: f32| ((c.clamp(0.0, 1.0) * a) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    /// Maps to the closest color the terminal can show. `None` in mono mode.
    pub fn to_terminal(self, mode: ColorMode) -> Option<Color> {
        let (r, g, b) = self.over_black();
        match mode {
            ColorMode::Mono => None,
            ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
            ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
            ColorMode::Color16 => Some(rgb_to_color16(r, g, b)),
        }
    }
}

fn dist2((r0, g0, b0): (u8, u8, u8), (r1, g1, b1): (u8, u8, u8)) -> i32 {
    let d = |a: u8, b: u8| (a as i32) - (b as i32);
    d(r0, r1).pow(2) + d(g0, g1).pow(2) + d(b0, b1).pow(2)
}

/// Nearest entry of the xterm 6x6x6 cube or the 24-step gray ramp.
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let step = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;

    let (r6, g6, b6) = (step(r), step(g), step(b));
    let cube = (
        LEVELS[r6 as usize],
        LEVELS[g6 as usize],
        LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, (0, 0, 0)),
        239..=255 => (231, (255, 255, 255)),
        _ => {
            let i = (avg - 8) / 10;
            let v = 8 + 10 * i;
            (232 + i, (v, v, v))
        }
    };

    if dist2((r, g, b), gray) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

/// Nearest of the 16 standard ANSI colors.
pub fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2((r, g, b), *rgb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

/// The background every surface is cleared to.
pub fn background(mode: ColorMode) -> Option<Color> {
    Rgba::BLACK.to_terminal(mode)
}
