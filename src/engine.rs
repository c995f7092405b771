//! The orchestrator: owns every entity, consumes input, advances the
//! simulation one tick at a time and hands a [`Scene`] to the renderer.
//!
//! Time only enters through the `now` argument of [`Engine::tick`], and only
//! to decide when a pause ends. Movement is per tick, so a run is fully
//! determined by its input sequence.

use std::io;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::compute::{
    advance_projectiles, enemies_destroyed, find_projectile_hits, fleet_reached_bottom,
    populate_fleet, remove_hits,
};
use crate::entities::{Fleet, Projectile, Rect, Ship};
use crate::error::GameError;
use crate::settings::Settings;
use crate::stats::{GameStats, HighScoreStore};

// ── Input collaborator ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Play,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed or interrupt received.
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x: i32, y: i32 },
}

/// Yields whatever input arrived since the previous tick. Never blocks.
pub trait InputSource {
    fn poll(&mut self) -> Vec<InputEvent>;
}

// ── Render collaborator ───────────────────────────────────────────────────────

/// Read-only view of everything a frame needs to draw.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    pub settings: &'a Settings,
    pub ship: &'a Ship,
    pub projectiles: &'a [Projectile],
    pub fleet: &'a Fleet,
    pub stats: &'a GameStats,
    pub play_button: Rect,
    pub pointer_visible: bool,
    pub paused: bool,
}

pub trait RenderSurface {
    /// Drawable area as (width, height). Queried once, at startup.
    fn size(&self) -> io::Result<(i32, i32)>;

    /// Clear, draw the scene and present it.
    fn render(&mut self, scene: &Scene<'_>) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ── Engine ────────────────────────────────────────────────────────────────────

pub struct Engine<S: HighScoreStore> {
    pub settings: Settings,
    pub ship: Ship,
    pub projectiles: Vec<Projectile>,
    pub fleet: Fleet,
    pub stats: GameStats,
    pub play_button: Rect,
    pub pointer_visible: bool,
    /// Gameplay is frozen until this instant.
    paused_until: Option<Instant>,
    store: S,
}

impl<S: HighScoreStore> Engine<S> {
    /// Build an inactive game: the first fleet is already on screen behind
    /// the play button and the stored high score has been read.
    pub fn new(settings: Settings, mut store: S) -> Self {
        let fixed = &settings.fixed;
        let mut stats = GameStats::new(fixed.ship_limit);
        stats.update_high_score(&mut store);

        let ship = Ship::new(
            fixed.ship_width,
            fixed.ship_height,
            fixed.screen_width,
            fixed.screen_height,
        );
        let fleet = populate_fleet(fixed);
        let play_button = Rect::new(
            fixed.screen_width / 2 - fixed.play_button_width / 2,
            fixed.screen_height / 2 - fixed.play_button_height / 2,
            fixed.play_button_width,
            fixed.play_button_height,
        );
        debug!(
            "engine ready: {}x{} screen, {} enemies per fleet",
            fixed.screen_width,
            fixed.screen_height,
            fleet.len()
        );

        Engine {
            settings,
            ship,
            projectiles: Vec::new(),
            fleet,
            stats,
            play_button,
            pointer_visible: true,
            paused_until: None,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn paused_until(&self) -> Option<Instant> {
        self.paused_until
    }

    pub fn is_paused(&self) -> bool {
        self.paused_until.is_some()
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene {
            settings: &self.settings,
            ship: &self.ship,
            projectiles: &self.projectiles,
            fleet: &self.fleet,
            stats: &self.stats,
            play_button: self.play_button,
            pointer_visible: self.pointer_visible,
            paused: self.is_paused(),
        }
    }

    // ── Per-frame work ────────────────────────────────────────────────────────

    /// One frame: drain input, advance the simulation if the game is active
    /// and not paused, then render. Rendering happens on every frame that
    /// does not end in a quit.
    pub fn tick<I, R>(
        &mut self,
        input: &mut I,
        surface: &mut R,
        now: Instant,
    ) -> Result<Flow, GameError>
    where
        I: InputSource,
        R: RenderSurface,
    {
        if let Some(until) = self.paused_until {
            if now >= until {
                trace!("pause over");
                self.paused_until = None;
            }
        }

        for event in input.poll() {
            if self.handle_event(event) == Flow::Quit {
                info!("quit requested");
                return Ok(Flow::Quit);
            }
        }

        if self.stats.game_active && !self.is_paused() {
            self.step(now);
        }

        surface.render(&self.scene())?;
        Ok(Flow::Continue)
    }

    fn handle_event(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::Quit | InputEvent::KeyDown(Key::Quit) => return Flow::Quit,
            InputEvent::KeyUp(Key::Left) => self.ship.moving_left = false,
            InputEvent::KeyUp(Key::Right) => self.ship.moving_right = false,
            InputEvent::KeyUp(_) => {}
            // Nothing below is serviced while paused.
            _ if self.is_paused() => {}
            InputEvent::KeyDown(Key::Left) => self.ship.moving_left = true,
            InputEvent::KeyDown(Key::Right) => self.ship.moving_right = true,
            InputEvent::KeyDown(Key::Fire) => {
                if self.stats.game_active {
                    self.fire_projectile();
                }
            }
            InputEvent::KeyDown(Key::Play) => self.start_new_game(),
            InputEvent::PointerDown { x, y } => {
                if self.play_button.contains_point(x, y) {
                    self.start_new_game();
                }
            }
        }
        Flow::Continue
    }

    fn step(&mut self, now: Instant) {
        let speed = self.settings.dynamic().ship_speed();
        self.ship.update(speed, self.settings.fixed.screen_width);

        self.advance_fleet(now);
        if self.is_paused() {
            return;
        }
        self.update_projectiles(now);
        if self.is_paused() {
            return;
        }
        self.check_fleet_reached_bottom(now);
    }

    // ── Game lifecycle ────────────────────────────────────────────────────────

    /// Begin a new game. Does nothing if one is already running.
    pub fn start_new_game(&mut self) {
        if self.stats.game_active {
            return;
        }
        self.stats.reset_stats();
        self.stats.game_active = true;

        self.fleet.clear();
        self.projectiles.clear();
        self.fleet = populate_fleet(&self.settings.fixed);
        self.center_ship();

        self.settings.initialize_dynamic_settings();
        self.pointer_visible = false;
        self.paused_until = None;
        info!("new game started with {} ships", self.stats.ships_left);
    }

    /// React to the ship being struck or the fleet landing.
    pub fn handle_ship_hit(&mut self, now: Instant) {
        let pause = Duration::from_millis(self.settings.fixed.ship_hit_pause_ms);

        if self.stats.ships_left > 1 {
            self.stats.ships_left -= 1;

            self.fleet.clear();
            self.projectiles.clear();
            self.fleet = populate_fleet(&self.settings.fixed);
            self.center_ship();

            self.pointer_visible = true;
            info!("ship hit; {} ships left", self.stats.ships_left);
        } else {
            self.stats.ships_left = 0;
            self.stats.game_active = false;
            self.pointer_visible = true;
            info!("game over with score {}", self.stats.score);
        }
        self.paused_until = Some(now + pause);
    }

    fn center_ship(&mut self) {
        let fixed = &self.settings.fixed;
        self.ship.center(fixed.screen_width, fixed.screen_height);
    }

    // ── Projectiles ───────────────────────────────────────────────────────────

    /// Launch a projectile from the ship's nose unless the maximum number is
    /// already in flight.
    pub fn fire_projectile(&mut self) {
        let fixed = &self.settings.fixed;
        if self.projectiles.len() >= fixed.bullets_allowed {
            return;
        }
        self.projectiles.push(Projectile::from_ship(
            &self.ship,
            fixed.bullet_width,
            fixed.bullet_height,
        ));
    }

    pub fn update_projectiles(&mut self, now: Instant) {
        let speed = self.settings.dynamic().bullet_speed();
        let projectiles = std::mem::take(&mut self.projectiles);
        self.projectiles = advance_projectiles(projectiles, speed);

        self.resolve_projectile_collisions(now);
    }

    /// Destroy every struck enemy together with the projectile that struck
    /// it, score the kills, and start the next level once the fleet is gone.
    pub fn resolve_projectile_collisions(&mut self, now: Instant) {
        let hits = find_projectile_hits(&self.projectiles, &self.fleet.enemies);
        if !hits.is_empty() {
            let kills = enemies_destroyed(&hits);
            let projectiles = std::mem::take(&mut self.projectiles);
            let enemies = std::mem::take(&mut self.fleet.enemies);
            let (projectiles, enemies) = remove_hits(projectiles, enemies, &hits);
            self.projectiles = projectiles;
            self.fleet.enemies = enemies;

            self.stats
                .add_kills(kills, self.settings.dynamic().alien_points());
            trace!("{kills} enemies destroyed; score {}", self.stats.score);
            self.record_high_score();
        }

        if self.fleet.is_empty() {
            let fleet = populate_fleet(&self.settings.fixed);
            if fleet.is_empty() {
                // No enemy fits on this screen, so there is no level to clear.
                return;
            }
            self.projectiles.clear();
            self.fleet = fleet;
            self.settings.increase_speed();
            self.stats.level += 1;

            let pause = Duration::from_millis(self.settings.fixed.level_clear_pause_ms);
            self.paused_until = Some(now + pause);
            info!("fleet cleared; starting level {}", self.stats.level);
        }
    }

    fn record_high_score(&mut self) {
        if self.stats.check_high_score() {
            if let Err(e) = self.store.save(self.stats.high_score) {
                warn!("could not save high score {}: {e}", self.stats.high_score);
            }
        }
    }

    // ── Fleet ─────────────────────────────────────────────────────────────────

    /// Edge check, then move the whole fleet, then test for a ship collision.
    pub fn advance_fleet(&mut self, now: Instant) {
        self.check_fleet_edges();

        let dynamic = self.settings.dynamic();
        let (speed, direction) = (dynamic.alien_speed(), dynamic.fleet_direction());
        self.fleet.shift(speed, direction);

        if self.fleet.collides_with(&self.ship) {
            self.handle_ship_hit(now);
        }
    }

    fn check_fleet_edges(&mut self) {
        let direction = self.settings.dynamic().fleet_direction();
        if self
            .fleet
            .any_at_edge(self.settings.fixed.screen_width, direction)
        {
            self.change_fleet_direction();
        }
    }

    fn change_fleet_direction(&mut self) {
        self.fleet.drop_by(self.settings.fixed.fleet_drop_speed);
        self.settings.change_fleet_direction();
    }

    /// An enemy touching the bottom of the screen costs a ship, exactly like
    /// a collision.
    pub fn check_fleet_reached_bottom(&mut self, now: Instant) {
        if fleet_reached_bottom(&self.fleet, self.settings.fixed.screen_height) {
            self.handle_ship_hit(now);
        }
    }
}
