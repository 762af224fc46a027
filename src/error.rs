// Copyright (c) 2026 rezky_nightky

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("failed to apply {name} {value} (must be a finite number)")]
    NotFinite { name: &'static str, value: f64 },

    #[error("invalid --colormode: {0} (allowed: 0,16,8,256,24,32)")]
    InvalidColorMode(u16),

    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
