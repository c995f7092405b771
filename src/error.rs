use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can stop the game from starting or running.
///
/// The simulation itself never fails; everything here comes from the
/// terminal, the filesystem or the config file.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to open log file {}: {source}", .path.display())]
    LogFile { path: PathBuf, source: io::Error },

    #[error("a {width}x{height} screen has no room for the alien fleet")]
    ScreenTooSmall { width: i32, height: i32 },
}

/// Why a high score could not be loaded or saved.
///
/// None of these are fatal: the stats layer logs them and carries on with
/// a record of zero.
#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high score file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("high score file {} contains {content:?}, not an integer", .path.display())]
    Malformed { path: PathBuf, content: String },

    #[error("failed to read high score file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write high score file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}
