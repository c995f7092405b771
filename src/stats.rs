//! Score, level and lives tracking, plus the persisted high score.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::HighScoreError;

// ── Persistence collaborator ──────────────────────────────────────────────────

/// Somewhere a single high-score integer can be read from and written to.
pub trait HighScoreStore {
    fn load(&mut self) -> Result<u32, HighScoreError>;
    fn save(&mut self, score: u32) -> Result<(), HighScoreError>;
}

/// High score kept as plain decimal text in a file.
#[derive(Clone, Debug)]
pub struct FileHighScore {
    path: PathBuf,
}

impl FileHighScore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileHighScore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScore {
    /// An empty file counts as no record yet and loads as zero.
    fn load(&mut self) -> Result<u32, HighScoreError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                HighScoreError::NotFound(self.path.clone())
            } else {
                HighScoreError::Read {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed.parse().map_err(|_| HighScoreError::Malformed {
            path: self.path.clone(),
            content: trimmed.to_string(),
        })
    }

    fn save(&mut self, score: u32) -> Result<(), HighScoreError> {
        std::fs::write(&self.path, score.to_string()).map_err(|source| HighScoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

// ── Stats ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GameStats {
    pub ships_left: u32,
    pub score: u32,
    /// Starts at 1 and goes up by one per cleared fleet.
    pub level: u32,
    pub high_score: u32,
    pub game_active: bool,
    ship_limit: u32,
}

impl GameStats {
    /// Fresh stats for an inactive game. The high score starts at zero until
    /// [`GameStats::update_high_score`] reads the stored record.
    pub fn new(ship_limit: u32) -> Self {
        GameStats {
            ships_left: ship_limit,
            score: 0,
            level: 1,
            high_score: 0,
            game_active: false,
            ship_limit,
        }
    }

    pub fn reset_stats(&mut self) {
        self.ships_left = self.ship_limit;
        self.score = 0;
        self.level = 1;
    }

    /// Read the stored record. A missing or unreadable record leaves the
    /// high score at zero and is only logged.
    pub fn update_high_score<S: HighScoreStore + ?Sized>(&mut self, store: &mut S) {
        match store.load() {
            Ok(score) => self.high_score = score,
            Err(HighScoreError::NotFound(path)) => {
                self.high_score = 0;
                info!(
                    "high score file {} not found; starting with a high score of 0",
                    path.display()
                );
            }
            Err(e) => {
                self.high_score = 0;
                warn!("{e}; starting with a high score of 0");
            }
        }
    }

    /// Credit `kills` destroyed enemies at `points` each.
    pub fn add_kills(&mut self, kills: usize, points: u32) {
        let gained = points.saturating_mul(kills as u32);
        self.score = self.score.saturating_add(gained);
    }

    /// Raise the high score to the current score if it has been beaten.
    /// Returns whether a new record was set.
    pub fn check_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

/// Round to the nearest ten for the scoreboard.
pub fn rounded_score(score: u32) -> u32 {
    score.saturating_add(5) / 10 * 10
}
