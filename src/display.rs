//! Rendering layer — all terminal output lives here.
//!
//! `TerminalSurface` is the render collaborator handed to the engine: it
//! measures the terminal once and turns each `Scene` into crossterm
//! commands. No game logic is performed here.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use alien_invasion::engine::{RenderSurface, Scene};
use alien_invasion::entities::{Enemy, Projectile, Rect, Ship};
use alien_invasion::stats::rounded_score;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HIGH: Color = Color::White;
const C_HUD_SHIPS: Color = Color::Red;
const C_SHIP: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BUTTON_BG: Color = Color::Green;
const C_BUTTON_TEXT: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

// ── Sprites ───────────────────────────────────────────────────────────────────

// Used when the configured box is exactly this size; any other size is
// drawn as a solid block.
const SHIP_SPRITE: [&str; 2] = [" ▲ ", "/█\\"];
const ENEMY_SPRITE: [&str; 2] = ["«▼»", "╚═╝"];

const HINT: &str = "← → / A D : Move   SPACE : Shoot   P : Play   Q : Quit";

pub struct TerminalSurface<W: Write> {
    out: W,
    cursor_shown: Option<bool>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        TerminalSurface {
            out,
            cursor_shown: None,
        }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    /// The last row is kept for the controls hint.
    fn size(&self) -> io::Result<(i32, i32)> {
        let (cols, rows) = terminal::size()?;
        Ok((cols as i32, rows.saturating_sub(1) as i32))
    }

    fn render(&mut self, scene: &Scene<'_>) -> io::Result<()> {
        let out = &mut self.out;
        let fixed = &scene.settings.fixed;
        let [r, g, b] = fixed.bg_color;
        out.queue(style::SetBackgroundColor(Color::Rgb { r, g, b }))?;
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        let screen = Rect::new(0, 0, fixed.screen_width, fixed.screen_height);

        for enemy in scene.fleet.iter() {
            draw_enemy(out, enemy, &screen)?;
        }
        let [r, g, b] = fixed.bullet_color;
        for projectile in scene.projectiles {
            draw_projectile(out, projectile, Color::Rgb { r, g, b }, &screen)?;
        }
        draw_ship(out, scene.ship, &screen)?;
        draw_hud(out, scene)?;

        if !scene.stats.game_active {
            draw_play_button(out, scene.play_button, &screen)?;
        }
        draw_controls_hint(out, fixed.screen_height)?;

        if self.cursor_shown != Some(scene.pointer_visible) {
            if scene.pointer_visible {
                out.queue(cursor::Show)?;
            } else {
                out.queue(cursor::Hide)?;
            }
            self.cursor_shown = Some(scene.pointer_visible);
        }

        // Park cursor in a harmless spot and flush
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, fixed.screen_height.max(0) as u16))?;
        out.flush()
    }
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Print `text` starting at (`x`, `y`), dropping any cells outside `screen`.
fn put<W: Write>(out: &mut W, x: i32, y: i32, text: &str, screen: &Rect) -> io::Result<()> {
    if y < screen.top() || y >= screen.bottom() {
        return Ok(());
    }
    for (i, ch) in text.chars().enumerate() {
        let cx = x + i as i32;
        if cx >= screen.left() && cx < screen.right() {
            out.queue(cursor::MoveTo(cx as u16, y as u16))?;
            out.queue(Print(ch))?;
        }
    }
    Ok(())
}

fn draw_box<W: Write>(
    out: &mut W,
    rect: Rect,
    sprite: &[&str],
    screen: &Rect,
) -> io::Result<()> {
    let fits = sprite.len() as i32 == rect.height
        && sprite.iter().all(|row| row.chars().count() as i32 == rect.width);
    for dy in 0..rect.height {
        let row = if fits {
            sprite[dy as usize].to_string()
        } else {
            "█".repeat(rect.width.max(0) as usize)
        };
        put(out, rect.x, rect.y + dy, &row, screen)?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write>(out: &mut W, ship: &Ship, screen: &Rect) -> io::Result<()> {
    out.queue(style::SetForegroundColor(C_SHIP))?;
    draw_box(out, ship.rect, &SHIP_SPRITE, screen)
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, screen: &Rect) -> io::Result<()> {
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    draw_box(out, enemy.rect, &ENEMY_SPRITE, screen)
}

fn draw_projectile<W: Write>(
    out: &mut W,
    projectile: &Projectile,
    color: Color,
    screen: &Rect,
) -> io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    let rect = projectile.rect;
    for dy in 0..rect.height {
        put(out, rect.x, rect.y + dy, &"║".repeat(rect.width.max(0) as usize), screen)?;
    }
    Ok(())
}

// ── Scoreboard (rows 0 and 1) ─────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, scene: &Scene<'_>) -> io::Result<()> {
    let stats = scene.stats;
    let width = scene.settings.fixed.screen_width;
    let screen = Rect::new(0, 0, width, scene.settings.fixed.screen_height);

    // Ships left — top left
    out.queue(style::SetForegroundColor(C_HUD_SHIPS))?;
    put(out, 1, 0, &"▲ ".repeat(stats.ships_left as usize), &screen)?;

    // High score — centre
    let high = format!("Hi {}", rounded_score(stats.high_score));
    out.queue(style::SetForegroundColor(C_HUD_HIGH))?;
    put(out, width / 2 - high.chars().count() as i32 / 2, 0, &high, &screen)?;

    // Score, with the level beneath it — right
    let score = format!("{}", rounded_score(stats.score));
    let level = format!("L{}", stats.level);
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    put(out, width - 1 - score.chars().count() as i32, 0, &score, &screen)?;
    put(out, width - 1 - level.chars().count() as i32, 1, &level, &screen)?;

    Ok(())
}

fn draw_play_button<W: Write>(out: &mut W, button: Rect, screen: &Rect) -> io::Result<()> {
    out.queue(style::SetBackgroundColor(C_BUTTON_BG))?;
    out.queue(style::SetForegroundColor(C_BUTTON_TEXT))?;

    let label = "Play";
    let blank = " ".repeat(button.width.max(0) as usize);
    let label_row = button.y + button.height / 2;
    for y in button.top()..button.bottom() {
        put(out, button.x, y, &blank, screen)?;
    }
    let lx = button.centerx() - label.chars().count() as i32 / 2;
    put(out, lx, label_row, label, screen)?;

    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, row: i32) -> io::Result<()> {
    if row < 0 {
        return Ok(());
    }
    out.queue(cursor::MoveTo(1, row as u16))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(HINT))?;
    Ok(())
}
