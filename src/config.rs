// Copyright (c) 2026 rezky_nightky

use std::env;
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Color, Effects, Style};
use clap::builder::Styles;
use clap::Parser;

use crate::error::{Error, Result};
use crate::runtime::{ColorMode, DEFAULT_CELL_SIZE, DEFAULT_FPS, DEFAULT_MAX_TRAIL, MIN_TRAIL};

pub const MAX_TRAIL_LIMIT: u16 = 64;
pub const MAX_PANES: u8 = 4;

pub fn color_enabled_stdout() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn clap_styles() -> Styles {
    Styles::styled()
        .header(
            Style::new()
                .effects(Effects::BOLD)
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .usage(
            Style::new()
                .effects(Effects::BOLD)
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Magenta))))
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "glyphfall",
    about = "Full-screen digital rain. Ctrl-C, q or Esc to stop.",
    disable_version_flag = true
)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = DEFAULT_FPS,
        help_heading = "ANIMATION",
        help = "Ticks per second (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "cell-size",
        default_value_t = DEFAULT_CELL_SIZE,
        help_heading = "ANIMATION",
        help = "Surface units per glyph cell (min 1 max 256)"
    )]
    pub cell_size: f32,

    #[arg(
        short = 't',
        long = "max-trail",
        default_value_t = DEFAULT_MAX_TRAIL,
        help_heading = "ANIMATION",
        help = "Longest trail in cells (min 6 max 64)"
    )]
    pub max_trail: u16,

    #[arg(
        long = "seed",
        help_heading = "ANIMATION",
        help = "Seed for reproducible rain; pane N uses SEED+N"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'p',
        long = "panes",
        default_value_t = 1,
        help_heading = "ANIMATION",
        help = "Independent side-by-side surfaces (min 1 max 4)"
    )]
    pub panes: u8,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "perf-stats",
        help_heading = "GENERAL",
        help = "Print frame timing summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "GENERAL",
        help = "Write logs to PATH (filter with RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Validated run parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub fps: f64,
    pub cell_size: f32,
    pub max_trail: u16,
    pub seed: Option<u64>,
    pub panes: u8,
    pub color_mode: ColorMode,
    pub duration: Option<f64>,
    pub perf_stats: bool,
}

fn require_range<T>(name: &'static str, v: T, min: T, max: T) -> Result<T>
where
    T: PartialOrd + Display,
{
    if v < min || v > max {
        return Err(Error::OutOfRange {
            name,
            value: v.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(v)
}

fn require_finite(name: &'static str, v: f64) -> Result<f64> {
    if !v.is_finite() {
        return Err(Error::NotFinite { name, value: v });
    }
    Ok(v)
}

pub fn detect_color_mode_auto() -> ColorMode {
    color_mode_from_env(
        &env::var("COLORTERM").unwrap_or_default(),
        &env::var("TERM").unwrap_or_default(),
    )
}

fn color_mode_from_env(colorterm: &str, term: &str) -> ColorMode {
    let colorterm = colorterm.to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    let term = term.to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }
    ColorMode::Color16
}

pub fn color_mode_from_flag(v: u16) -> Result<ColorMode> {
    match v {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        other => Err(Error::InvalidColorMode(other)),
    }
}

pub fn detect_color_mode(args: &Args) -> Result<ColorMode> {
    match args.colormode {
        Some(v) => color_mode_from_flag(v),
        None => Ok(detect_color_mode_auto()),
    }
}

impl Args {
    pub fn settings(&self) -> Result<Settings> {
        let fps = require_range("--fps", require_finite("--fps", self.fps)?, 1.0, 240.0)?;
        let cell_size = require_finite("--cell-size", self.cell_size as f64)?;
        let cell_size = require_range("--cell-size", cell_size as f32, 1.0, 256.0)?;
        let max_trail = require_range("--max-trail", self.max_trail, MIN_TRAIL, MAX_TRAIL_LIMIT)?;
        let panes = require_range("--panes", self.panes, 1, MAX_PANES)?;

        let duration = match self.duration {
            Some(s) => {
                let s = require_finite("--duration", s)?;
                if s > 0.0 {
                    Some(require_range("--duration", s, 0.1, 86400.0)?)
                } else {
                    None
                }
            }
            None => None,
        };

        Ok(Settings {
            fps,
            cell_size,
            max_trail,
            seed: self.seed,
            panes,
            color_mode: detect_color_mode(self)?,
            duration,
            perf_stats: self.perf_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("glyphfall").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_the_classic_rain() {
        let s = parse(&["--colormode", "24"]).settings().unwrap();
        assert_eq!(s.fps, 24.0);
        assert_eq!(s.cell_size, 18.0);
        assert_eq!(s.max_trail, 22);
        assert_eq!(s.panes, 1);
        assert_eq!(s.color_mode, ColorMode::TrueColor);
        assert_eq!(s.duration, None);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases: [&[&str]; 7] = [
            &["--fps", "0"],
            &["--fps", "241"],
            &["--max-trail", "5"],
            &["--max-trail", "65"],
            &["--panes", "5"],
            &["--cell-size", "0.5"],
            &["--duration", "0.05"],
        ];
        for argv in cases {
            let err = parse(argv).settings().unwrap_err();
            assert!(matches!(err, Error::OutOfRange { .. }), "{argv:?}: {err}");
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = parse(&["--fps", "NaN"]).settings().unwrap_err();
        assert!(matches!(err, Error::NotFinite { name: "--fps", .. }));
    }

    #[test]
    fn non_positive_duration_disables_the_timer() {
        let s = parse(&["--duration", "0", "--colormode", "0"]).settings().unwrap();
        assert_eq!(s.duration, None);
        let s = parse(&["--duration", "2.5", "--colormode", "0"]).settings().unwrap();
        assert_eq!(s.duration, Some(2.5));
    }

    #[test]
    fn colormode_flag_values() {
        assert_eq!(color_mode_from_flag(8).unwrap(), ColorMode::Color256);
        assert_eq!(color_mode_from_flag(256).unwrap(), ColorMode::Color256);
        assert_eq!(color_mode_from_flag(32).unwrap(), ColorMode::TrueColor);
        assert!(matches!(
            color_mode_from_flag(7),
            Err(Error::InvalidColorMode(7))
        ));
    }

    #[test]
    fn color_mode_detection_from_env() {
        assert_eq!(color_mode_from_env("truecolor", "xterm"), ColorMode::TrueColor);
        assert_eq!(color_mode_from_env("", "xterm-256color"), ColorMode::Color256);
        assert_eq!(color_mode_from_env("", "dumb"), ColorMode::Mono);
        assert_eq!(color_mode_from_env("", "linux"), ColorMode::Color16);
    }

    #[test]
    fn error_messages_name_the_flag() {
        let err = parse(&["--panes", "9"]).settings().unwrap_err();
        assert_eq!(err.to_string(), "failed to apply --panes 9 (min 1 max 4)");
    }
}
