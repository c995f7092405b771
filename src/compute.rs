//! Pure game-logic functions.
//!
//! Nothing in here mutates engine state: each function takes the current
//! collections and returns what the engine should do with them, so every
//! rule can be tested on hand-built fixtures.

use crate::entities::{Enemy, Entity, Fleet, Projectile};
use crate::error::GameError;
use crate::settings::FixedSettings;

// ── Fleet population ──────────────────────────────────────────────────────────

/// How many enemies fit across and down the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FleetLayout {
    pub columns: i32,
    pub rows: i32,
}

impl FleetLayout {
    pub fn len(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One enemy-width gap between columns and a one-enemy margin at each side;
/// one enemy-height gap between rows, leaving three enemy-heights plus the
/// ship's height clear at the bottom.
pub fn fleet_layout(
    screen_width: i32,
    screen_height: i32,
    ship_height: i32,
    alien_width: i32,
    alien_height: i32,
) -> FleetLayout {
    if alien_width <= 0 || alien_height <= 0 {
        return FleetLayout { columns: 0, rows: 0 };
    }
    let available_x = screen_width - 2 * alien_width;
    let columns = available_x.div_euclid(2 * alien_width).max(0);

    let available_y = screen_height - 3 * alien_height - ship_height;
    let rows = available_y.div_euclid(2 * alien_height).max(0);

    FleetLayout { columns, rows }
}

/// Top-left corner of the enemy at grid cell (`column`, `row`).
pub fn alien_position(column: i32, row: i32, alien_width: i32, alien_height: i32) -> (i32, i32) {
    (
        alien_width + 2 * alien_width * column,
        alien_height + 2 * alien_height * row,
    )
}

/// The layout [`populate_fleet`] will use for these settings.
pub fn layout_for(settings: &FixedSettings) -> FleetLayout {
    fleet_layout(
        settings.screen_width,
        settings.screen_height,
        settings.ship_height,
        settings.alien_width,
        settings.alien_height,
    )
}

/// Refuse a screen on which not even one enemy fits. Every tick of such a
/// game would find the fleet already gone.
pub fn check_fleet_fits(settings: &FixedSettings) -> Result<FleetLayout, GameError> {
    let layout = layout_for(settings);
    if layout.is_empty() {
        return Err(GameError::ScreenTooSmall {
            width: settings.screen_width,
            height: settings.screen_height,
        });
    }
    Ok(layout)
}

/// A full fleet laid out for the current screen, row by row.
pub fn populate_fleet(settings: &FixedSettings) -> Fleet {
    let (w, h) = (settings.alien_width, settings.alien_height);
    let layout = layout_for(settings);
    let enemies = (0..layout.rows)
        .flat_map(|row| (0..layout.columns).map(move |column| (column, row)))
        .map(|(column, row)| {
            let (x, y) = alien_position(column, row, w, h);
            Enemy::new(x, y, w, h)
        })
        .collect();
    Fleet { enemies }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Move every projectile one tick and drop those that have left the top of
/// the screen.
pub fn advance_projectiles(projectiles: Vec<Projectile>, speed: f32) -> Vec<Projectile> {
    projectiles
        .into_iter()
        .filter_map(|mut p| {
            p.update(speed);
            if p.is_off_screen() {
                None
            } else {
                Some(p)
            }
        })
        .collect()
}

// ── Collisions ────────────────────────────────────────────────────────────────

/// One projectile and every enemy it destroyed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectileHit {
    pub projectile: usize,
    pub enemies: Vec<usize>,
}

/// Pair projectiles with the enemies they strike this tick.
///
/// Projectiles are taken in order. Each one destroys every still-live enemy
/// its box overlaps, and an enemy destroyed by an earlier projectile is not
/// available to a later one; a projectile whose only targets were already
/// taken survives. Indices in the result refer to the input slices.
pub fn find_projectile_hits(projectiles: &[Projectile], enemies: &[Enemy]) -> Vec<ProjectileHit> {
    let mut destroyed = vec![false; enemies.len()];
    let mut hits = Vec::new();

    for (pi, projectile) in projectiles.iter().enumerate() {
        let struck: Vec<usize> = enemies
            .iter()
            .enumerate()
            .filter(|(ei, enemy)| !destroyed[*ei] && projectile.collides_with(*enemy))
            .map(|(ei, _)| ei)
            .collect();
        if struck.is_empty() {
            continue;
        }
        for &ei in &struck {
            destroyed[ei] = true;
        }
        hits.push(ProjectileHit {
            projectile: pi,
            enemies: struck,
        });
    }

    hits
}

/// Total enemies destroyed across a set of hits.
pub fn enemies_destroyed(hits: &[ProjectileHit]) -> usize {
    hits.iter().map(|h| h.enemies.len()).sum()
}

/// Remove every projectile and enemy named in `hits`.
pub fn remove_hits(
    projectiles: Vec<Projectile>,
    enemies: Vec<Enemy>,
    hits: &[ProjectileHit],
) -> (Vec<Projectile>, Vec<Enemy>) {
    let mut spent = vec![false; projectiles.len()];
    let mut killed = vec![false; enemies.len()];
    for hit in hits {
        spent[hit.projectile] = true;
        for &ei in &hit.enemies {
            killed[ei] = true;
        }
    }

    let projectiles = projectiles
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !spent[*i])
        .map(|(_, p)| p)
        .collect();
    let enemies = enemies
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !killed[*i])
        .map(|(_, e)| e)
        .collect();
    (projectiles, enemies)
}

// ── Fleet boundaries ──────────────────────────────────────────────────────────

/// Whether any enemy's lower edge has reached the bottom of the screen.
pub fn fleet_reached_bottom(fleet: &Fleet, screen_height: i32) -> bool {
    fleet.iter().any(|e| e.rect.bottom() >= screen_height)
}
