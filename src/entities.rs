//! All game entity types and the geometry they share.
//!
//! Positions along the axis an entity moves on are kept as `f32` so
//! fractional per-tick speeds accumulate; the integer `Rect` is re-synced
//! from that float after every move and is what collisions are tested on.

use serde::Deserialize;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in screen cells. `right` and `bottom` are
/// exclusive, so a box at `x = 0` with `width = 3` covers columns 0..3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn centerx(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Centre of the top edge.
    pub fn midtop(&self) -> (i32, i32) {
        (self.centerx(), self.top())
    }

    /// True when the two boxes share at least one cell. Touching edges do
    /// not count, and empty boxes never intersect anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }
}

/// Anything that occupies a bounding box on screen.
pub trait Entity {
    fn rect(&self) -> Rect;

    fn collides_with<E: Entity>(&self, other: &E) -> bool {
        self.rect().intersects(&other.rect())
    }
}

// ── Fleet direction ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// +1.0 for right, -1.0 for left.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// ── Player ship ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub rect: Rect,
    /// Sub-cell horizontal position; `rect.x` is its floor.
    pub x: f32,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Ship {
    /// A ship of the given size parked at the bottom centre of the screen.
    pub fn new(width: i32, height: i32, screen_width: i32, screen_height: i32) -> Self {
        let mut ship = Ship {
            rect: Rect::new(0, 0, width, height),
            x: 0.0,
            moving_left: false,
            moving_right: false,
        };
        ship.center(screen_width, screen_height);
        ship
    }

    /// Put the ship back at the bottom centre. Movement intent is left alone
    /// so a key still held down keeps steering after a respawn.
    pub fn center(&mut self, screen_width: i32, screen_height: i32) {
        self.rect.x = screen_width / 2 - self.rect.width / 2;
        self.rect.y = screen_height - self.rect.height;
        self.x = self.rect.x as f32;
    }

    /// Apply one tick of movement intent. Both flags may be set at once, in
    /// which case they cancel out away from the walls.
    pub fn update(&mut self, speed: f32, screen_width: i32) {
        if self.moving_right && self.rect.right() < screen_width {
            self.x += speed;
        }
        if self.moving_left && self.rect.left() > 0 {
            self.x -= speed;
        }
        let max_x = (screen_width - self.rect.width).max(0) as f32;
        self.x = self.x.clamp(0.0, max_x);
        self.rect.x = self.x.floor() as i32;
    }
}

impl Entity for Ship {
    fn rect(&self) -> Rect {
        self.rect
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub rect: Rect,
    /// Sub-cell vertical position; `rect.y` is its floor.
    pub y: f32,
}

impl Projectile {
    /// A projectile whose bottom centre sits on the ship's top centre.
    pub fn from_ship(ship: &Ship, width: i32, height: i32) -> Self {
        let (cx, top) = ship.rect.midtop();
        let rect = Rect::new(cx - width / 2, top - height, width, height);
        Projectile {
            rect,
            y: rect.y as f32,
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.y -= speed;
        self.rect.y = self.y.floor() as i32;
    }

    /// Once the bottom edge has crossed the top of the screen the projectile
    /// can never hit anything again.
    pub fn is_off_screen(&self) -> bool {
        self.rect.bottom() <= 0
    }
}

impl Entity for Projectile {
    fn rect(&self) -> Rect {
        self.rect
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    /// Sub-cell horizontal position; `rect.x` is its floor.
    pub x: f32,
}

impl Enemy {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Enemy {
            rect: Rect::new(x, y, width, height),
            x: x as f32,
        }
    }

    pub fn update(&mut self, speed: f32, direction: Direction) {
        self.x += speed * direction.sign();
        self.rect.x = self.x.floor() as i32;
    }

    /// Whether this enemy has reached the wall it is heading towards.
    pub fn at_edge(&self, screen_width: i32, direction: Direction) -> bool {
        match direction {
            Direction::Right => self.rect.right() >= screen_width,
            Direction::Left => self.rect.left() <= 0,
        }
    }
}

impl Entity for Enemy {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Every live enemy. They always move together; the direction they share
/// lives in the dynamic settings, not on the enemies.
#[derive(Clone, Debug, Default)]
pub struct Fleet {
    pub enemies: Vec<Enemy>,
}

impl Fleet {
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Enemy> {
        self.enemies.iter()
    }

    pub fn any_at_edge(&self, screen_width: i32, direction: Direction) -> bool {
        self.enemies.iter().any(|e| e.at_edge(screen_width, direction))
    }

    pub fn drop_by(&mut self, dy: i32) {
        for enemy in &mut self.enemies {
            enemy.rect.y += dy;
        }
    }

    pub fn shift(&mut self, speed: f32, direction: Direction) {
        for enemy in &mut self.enemies {
            enemy.update(speed, direction);
        }
    }

    pub fn collides_with<E: Entity>(&self, other: &E) -> bool {
        self.enemies.iter().any(|e| e.collides_with(other))
    }
}
