// Copyright (c) 2026 rezky_nightky

/// How many distinct colors the terminal can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
            ColorMode::Mono => "mono",
        }
    }
}

// Animation defaults shared by every pane.
pub const DEFAULT_CELL_SIZE: f32 = 18.0;
pub const DEFAULT_FPS: f64 = 24.0;
pub const DEFAULT_MAX_TRAIL: u16 = 22;
pub const MIN_TRAIL: u16 = 6;
