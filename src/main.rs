// Copyright (c) 2026 rezky_nightky

mod cell;
mod color;
mod column;
mod config;
mod droplet;
mod error;
mod frame;
mod glyphs;
mod grid;
mod pane;
mod perf;
mod ramp;
mod render;
mod runtime;
mod terminal;

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{clap_styles, color_enabled_stdout, detect_color_mode_auto, Args, Settings};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::glyphs::GlyphTable;
use crate::pane::{build_panes, Pane, PaneLayout};
use crate::perf::PerfStats;
use crate::ramp::ColorRamp;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn install_stop_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    tracing::info!(signal = sig, "stopping on signal");
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Raw mode turns the interrupt character into a key event, so Ctrl-C is
/// matched here along with `q` and Esc.
fn is_stop(ev: &Event) -> bool {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Esc | KeyCode::Char('q') => true,
            KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        },
        _ => false,
    }
}

fn print_check_bitcolor(args: &Args) -> Result<()> {
    let colorterm = std::env::var("COLORTERM").unwrap_or_default();
    let term = std::env::var("TERM").unwrap_or_default();
    let or_unset = |v: &str| {
        if v.is_empty() {
            "(unset)".to_string()
        } else {
            v.to_string()
        }
    };
    let effective = config::detect_color_mode(args)?;

    println!("BITCOLOR CHECK:");
    println!("  COLORTERM: {}", or_unset(&colorterm));
    println!("  TERM: {}", or_unset(&term));
    println!("  auto_detected: {}", detect_color_mode_auto().label());
    if args.colormode.is_some() {
        println!("  forced: {}", effective.label());
    }
    println!("  effective: {}", effective.label());
    Ok(())
}

/// Waits until the next frame is due. Returns `false` once a stop was
/// requested or the deadline passed.
fn wait_for_frame(next_frame: Instant, end: Option<Instant>) -> Result<bool> {
    loop {
        while Terminal::poll_event(Duration::ZERO)? {
            if is_stop(&Terminal::read_event()?) {
                return Ok(false);
            }
        }

        let now = Instant::now();
        if end.is_some_and(|e| now >= e) {
            return Ok(false);
        }
        if now >= next_frame {
            return Ok(true);
        }

        let mut timeout = next_frame - now;
        if let Some(e) = end {
            timeout = timeout.min(e - now);
        }
        let _ = Terminal::poll_event(timeout)?;
    }
}

fn rain(
    settings: &Settings,
    term: &mut Terminal,
    frame: &mut Frame,
    panes: &mut [Pane],
) -> Result<PerfStats> {
    let period = Duration::from_secs_f64(1.0 / settings.fps);
    let start = Instant::now();
    let end = settings
        .duration
        .map(|s| start + Duration::from_secs_f64(s));
    let mut next_frame = start;
    let mut perf = PerfStats::default();

    while wait_for_frame(next_frame, end)? {
        let work_start = Instant::now();
        let recycled: usize = panes.iter_mut().map(|p| p.tick().recycled).sum();
        for p in panes.iter() {
            p.render(frame);
        }
        term.draw(frame)?;

        let work = work_start.elapsed();
        perf.record(work, period);
        if work > period {
            tracing::debug!(
                work_ms = work.as_secs_f64() * 1000.0,
                recycled,
                "frame over budget"
            );
        }

        next_frame += period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    tracing::info!(frames = perf.frames, "rain stopped");
    Ok(perf)
}

fn run(args: Args) -> Result<()> {
    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    if args.check_bitcolor {
        return print_check_bitcolor(&args);
    }

    let settings = args.settings()?;
    init_logging(args.log_file.as_deref())?;
    tracing::info!(?settings, "starting");

    let ramp = Arc::new(ColorRamp::new(settings.max_trail));
    let glyphs = Arc::new(GlyphTable::rain());
    tracing::debug!(glyphs = glyphs.len(), ramp = ramp.len(), "tables built");

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let mut frame = Frame::new(w, h, settings.cell_size, settings.color_mode);
    let mut panes = build_panes(
        &PaneLayout {
            width: w,
            height: h,
            cell_size: settings.cell_size,
            max_trail: settings.max_trail,
            count: settings.panes,
            seed: settings.seed,
        },
        &ramp,
        &glyphs,
    );

    let started = Instant::now();
    let perf = rain(&settings, &mut term, &mut frame, &mut panes)?;
    drop(term);

    if settings.perf_stats {
        println!("{}", perf.summary(started.elapsed(), settings.fps));
    }
    Ok(())
}

fn main() -> ExitCode {
    install_stop_handlers();

    let mut cmd = Args::command().styles(clap_styles());
    cmd = cmd.help_template(if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    });
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            restore_terminal_best_effort();
            tracing::error!(error = %e, "exiting");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
