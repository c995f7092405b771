//! Game settings, split into the part fixed for a session and the part that
//! difficulty scaling rewrites.
//!
//! [`FixedSettings`] is loaded from `alien_invasion.toml` (every key is
//! optional; missing keys keep the compiled defaults below). Screen size is
//! never part of the file: it is measured from the render surface at startup
//! and handed to [`Settings::new`].
//!
//! [`DynamicSettings`] is only ever produced from the fixed values, either by
//! [`Settings::initialize_dynamic_settings`] or by scaling the current values
//! in [`Settings::increase_speed`].

use std::io::ErrorKind;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::entities::Direction;
use crate::error::GameError;

// ── Defaults (terminal cells, cells per tick) ─────────────────────────────────

pub const SCREEN_WIDTH: i32 = 80;
pub const SCREEN_HEIGHT: i32 = 24;
pub const BG_COLOR: [u8; 3] = [8, 8, 24];

pub const SHIP_SPEED: f32 = 0.8;
pub const SHIP_WIDTH: i32 = 3;
pub const SHIP_HEIGHT: i32 = 2;
pub const SHIP_LIMIT: u32 = 3;

pub const BULLET_SPEED: f32 = 0.6;
pub const BULLET_WIDTH: i32 = 1;
pub const BULLET_HEIGHT: i32 = 1;
pub const BULLET_COLOR: [u8; 3] = [0, 220, 255];
pub const BULLETS_ALLOWED: usize = 3;

pub const ALIEN_SPEED: f32 = 0.15;
pub const ALIEN_WIDTH: i32 = 3;
pub const ALIEN_HEIGHT: i32 = 2;
pub const FLEET_DROP_SPEED: i32 = 1;
pub const FLEET_DIRECTION: Direction = Direction::Right;
pub const ALIEN_POINTS: u32 = 50;

pub const SPEEDUP_SCALE: f32 = 1.1;
pub const SCORE_SCALE: f32 = 1.5;

pub const LEVEL_CLEAR_PAUSE_MS: u64 = 2000;
pub const SHIP_HIT_PAUSE_MS: u64 = 500;

pub const PLAY_BUTTON_WIDTH: i32 = 12;
pub const PLAY_BUTTON_HEIGHT: i32 = 3;

pub const DEFAULT_CONFIG_PATH: &str = "alien_invasion.toml";

/// Settings that stay put for the whole session.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FixedSettings {
    // ── Screen ───────────────────────────────────────────────────────────────
    #[serde(skip)]
    pub screen_width: i32,
    #[serde(skip)]
    pub screen_height: i32,
    pub bg_color: [u8; 3],

    // ── Ship ─────────────────────────────────────────────────────────────────
    pub ship_speed: f32,
    pub ship_width: i32,
    pub ship_height: i32,
    pub ship_limit: u32,

    // ── Projectiles ──────────────────────────────────────────────────────────
    pub bullet_speed: f32,
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_color: [u8; 3],
    pub bullets_allowed: usize,

    // ── Fleet ────────────────────────────────────────────────────────────────
    pub alien_speed: f32,
    pub alien_width: i32,
    pub alien_height: i32,
    pub fleet_drop_speed: i32,
    pub fleet_direction: Direction,
    pub alien_points: u32,

    // ── Difficulty ───────────────────────────────────────────────────────────
    pub speedup_scale: f32,
    pub score_scale: f32,

    // ── Pauses ───────────────────────────────────────────────────────────────
    pub level_clear_pause_ms: u64,
    pub ship_hit_pause_ms: u64,

    // ── Play control ─────────────────────────────────────────────────────────
    pub play_button_width: i32,
    pub play_button_height: i32,
}

impl Default for FixedSettings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            bg_color: BG_COLOR,
            ship_speed: SHIP_SPEED,
            ship_width: SHIP_WIDTH,
            ship_height: SHIP_HEIGHT,
            ship_limit: SHIP_LIMIT,
            bullet_speed: BULLET_SPEED,
            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
            bullet_color: BULLET_COLOR,
            bullets_allowed: BULLETS_ALLOWED,
            alien_speed: ALIEN_SPEED,
            alien_width: ALIEN_WIDTH,
            alien_height: ALIEN_HEIGHT,
            fleet_drop_speed: FLEET_DROP_SPEED,
            fleet_direction: FLEET_DIRECTION,
            alien_points: ALIEN_POINTS,
            speedup_scale: SPEEDUP_SCALE,
            score_scale: SCORE_SCALE,
            level_clear_pause_ms: LEVEL_CLEAR_PAUSE_MS,
            ship_hit_pause_ms: SHIP_HIT_PAUSE_MS,
            play_button_width: PLAY_BUTTON_WIDTH,
            play_button_height: PLAY_BUTTON_HEIGHT,
        }
    }
}

impl FixedSettings {
    /// Parse settings from TOML text. Keys left out keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load settings from `path`.
    ///
    /// A missing file is only an error when `required` is set (the user named
    /// it explicitly); otherwise the compiled defaults are used. A file that
    /// exists but does not parse is always an error.
    pub fn load(path: &Path, required: bool) -> Result<Self, GameError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound && !required => {
                info!("no config at {}; using compiled defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(GameError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let settings = Self::from_toml(&text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loaded config from {}", path.display());
        Ok(settings)
    }
}

/// Difficulty parameters that reset on a new game and scale on level-up.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicSettings {
    ship_speed: f32,
    bullet_speed: f32,
    alien_speed: f32,
    fleet_direction: Direction,
    alien_points: u32,
}

impl DynamicSettings {
    fn initial(fixed: &FixedSettings) -> Self {
        DynamicSettings {
            ship_speed: fixed.ship_speed,
            bullet_speed: fixed.bullet_speed,
            alien_speed: fixed.alien_speed,
            fleet_direction: fixed.fleet_direction,
            alien_points: fixed.alien_points,
        }
    }

    pub fn ship_speed(&self) -> f32 {
        self.ship_speed
    }

    pub fn bullet_speed(&self) -> f32 {
        self.bullet_speed
    }

    pub fn alien_speed(&self) -> f32 {
        self.alien_speed
    }

    pub fn fleet_direction(&self) -> Direction {
        self.fleet_direction
    }

    /// Points awarded per enemy destroyed at the current level.
    pub fn alien_points(&self) -> u32 {
        self.alien_points
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub fixed: FixedSettings,
    dynamic: DynamicSettings,
}

impl Settings {
    /// Combine loaded settings with the measured screen size.
    pub fn new(mut fixed: FixedSettings, screen_width: i32, screen_height: i32) -> Self {
        fixed.screen_width = screen_width;
        fixed.screen_height = screen_height;
        let dynamic = DynamicSettings::initial(&fixed);
        Settings { fixed, dynamic }
    }

    pub fn dynamic(&self) -> &DynamicSettings {
        &self.dynamic
    }

    pub fn initialize_dynamic_settings(&mut self) {
        self.dynamic = DynamicSettings::initial(&self.fixed);
    }

    /// Scale speeds and per-kill points up for the next level.
    pub fn increase_speed(&mut self) {
        let speedup = self.fixed.speedup_scale;
        self.dynamic.ship_speed *= speedup;
        self.dynamic.bullet_speed *= speedup;
        self.dynamic.alien_speed *= speedup;
        self.dynamic.alien_points =
            (self.dynamic.alien_points as f32 * self.fixed.score_scale) as u32;
    }

    pub fn change_fleet_direction(&mut self) {
        self.dynamic.fleet_direction = self.dynamic.fleet_direction.flipped();
    }
}
