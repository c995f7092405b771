mod display;

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;

use alien_invasion::compute::check_fleet_fits;
use alien_invasion::engine::{Engine, Flow, InputEvent, InputSource, Key, RenderSurface};
use alien_invasion::error::GameError;
use alien_invasion::settings::{FixedSettings, Settings, DEFAULT_CONFIG_PATH};
use alien_invasion::stats::FileHighScore;

use display::TerminalSurface;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// On terminals that never report key releases, a key counts as released
/// once this many frames pass without a press or auto-repeat for it. Must
/// outlast the OS delay before auto-repeat starts (~300 ms).
const HOLD_WINDOW: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "alien_invasion", about = "Shoot down the alien fleet before it lands")]
struct Cli {
    /// TOML file overriding the default settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept.
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Where log output goes; the terminal itself is busy drawing the game.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn home_path(name: &str) -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(name)
}

fn init_logging(path: &Path) -> Result<(), GameError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| GameError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::Play),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
        _ => None,
    }
}

/// Turns raw crossterm events into the engine's key-down / key-up vocabulary.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events map straight through.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`). A press of a movement key already held is treated as
///   a repeat, and a synthetic key-up is emitted once the key has been quiet
///   for `HOLD_WINDOW` frames. Every press of the fire key fires, so quick
///   taps are never mistaken for a hold.
struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    reports_release: bool,
    /// Held key → frame it was last seen.
    held: HashMap<Key, u64>,
    frame: u64,
}

impl TerminalInput {
    fn new(rx: mpsc::Receiver<Event>, reports_release: bool) -> Self {
        TerminalInput {
            rx,
            reports_release,
            held: HashMap::new(),
            frame: 0,
        }
    }

    fn translate(&mut self, event: Event, events: &mut Vec<InputEvent>) {
        match event {
            Event::Key(KeyEvent {
                code, modifiers, ..
            }) if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) => {
                events.push(InputEvent::Quit);
            }
            Event::Key(KeyEvent { code, kind, .. }) => {
                let Some(key) = map_key(code) else { return };
                match kind {
                    KeyEventKind::Press => {
                        let newly_held = self.held.insert(key, self.frame).is_none();
                        if newly_held || key == Key::Fire {
                            events.push(InputEvent::KeyDown(key));
                        }
                    }
                    KeyEventKind::Repeat => {
                        self.held.insert(key, self.frame);
                    }
                    KeyEventKind::Release => {
                        if self.held.remove(&key).is_some() {
                            events.push(InputEvent::KeyUp(key));
                        }
                    }
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => events.push(InputEvent::PointerDown {
                x: column as i32,
                y: row as i32,
            }),
            _ => {}
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.frame += 1;
        let mut events = Vec::new();

        while let Ok(event) = self.rx.try_recv() {
            self.translate(event, &mut events);
        }

        if !self.reports_release {
            let frame = self.frame;
            let mut expired: Vec<Key> = self
                .held
                .iter()
                .filter(|(_, last)| frame.saturating_sub(**last) > HOLD_WINDOW)
                .map(|(key, _)| *key)
                .collect();
            expired.sort_by_key(|k| *k as u8);
            for key in expired {
                self.held.remove(&key);
                events.push(InputEvent::KeyUp(key));
            }
        }

        events
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn run<W: Write>(
    surface: &mut TerminalSurface<W>,
    input: &mut TerminalInput,
    fixed: FixedSettings,
    store: FileHighScore,
) -> Result<(), GameError> {
    let (width, height) = surface.size()?;
    let settings = Settings::new(fixed, width, height);
    check_fleet_fits(&settings.fixed)?;
    let mut engine = Engine::new(settings, store);

    loop {
        let frame_start = Instant::now();

        if engine.tick(input, surface, frame_start)? == Flow::Quit {
            break;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
    Ok(())
}

fn restore_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .unwrap_or_else(|| home_path(".alien_invasion.log"));
    init_logging(&log_path)?;

    let fixed = match &cli.config {
        Some(path) => FixedSettings::load(path, true)?,
        None => FixedSettings::load(Path::new(DEFAULT_CONFIG_PATH), false)?,
    };
    let store = FileHighScore::new(
        cli.high_score_file
            .unwrap_or_else(|| home_path(".alien_invasion_score")),
    );

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    let entered = out
        .execute(terminal::EnterAlternateScreen)
        .and_then(|o| o.execute(EnableMouseCapture))
        .map(|_| ());
    if let Err(e) = entered {
        restore_terminal(&mut out, false);
        return Err(e.into());
    }

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut input = TerminalInput::new(rx, keyboard_enhanced);
    let mut surface = TerminalSurface::new(out);
    let result = run(&mut surface, &mut input, fixed, store);

    // Always restore the terminal
    restore_terminal(surface.writer(), keyboard_enhanced);

    if result.is_ok() {
        info!("exited normally");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn with_kind(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    fn input(reports_release: bool) -> (mpsc::Sender<Event>, TerminalInput) {
        let (tx, rx) = mpsc::channel();
        (tx, TerminalInput::new(rx, reports_release))
    }

    #[test]
    fn quick_fire_taps_each_fire() {
        let (tx, mut input) = input(false);
        let mut fired = 0;
        for _ in 0..6 {
            tx.send(press(KeyCode::Char(' '))).unwrap();
            for _ in 0..5 {
                fired += input
                    .poll()
                    .iter()
                    .filter(|e| **e == InputEvent::KeyDown(Key::Fire))
                    .count();
            }
        }
        assert_eq!(fired, 6);
    }

    #[test]
    fn repeated_move_press_is_one_key_down() {
        let (tx, mut input) = input(false);
        tx.send(press(KeyCode::Left)).unwrap();
        assert_eq!(input.poll(), vec![InputEvent::KeyDown(Key::Left)]);

        tx.send(press(KeyCode::Left)).unwrap();
        tx.send(press(KeyCode::Left)).unwrap();
        assert!(input.poll().is_empty());
    }

    #[test]
    fn quiet_key_gets_synthetic_key_up() {
        let (tx, mut input) = input(false);
        tx.send(press(KeyCode::Right)).unwrap();
        assert_eq!(input.poll(), vec![InputEvent::KeyDown(Key::Right)]);

        for _ in 0..HOLD_WINDOW {
            assert!(input.poll().is_empty());
        }
        assert_eq!(input.poll(), vec![InputEvent::KeyUp(Key::Right)]);
        assert!(input.poll().is_empty());
    }

    #[test]
    fn auto_repeat_keeps_key_held() {
        let (tx, mut input) = input(false);
        tx.send(press(KeyCode::Left)).unwrap();
        input.poll();
        for _ in 0..3 * HOLD_WINDOW {
            tx.send(press(KeyCode::Left)).unwrap();
            assert!(input.poll().is_empty());
        }
    }

    #[test]
    fn reported_release_maps_straight_through() {
        let (tx, mut input) = input(true);
        tx.send(with_kind(KeyCode::Left, KeyEventKind::Press)).unwrap();
        tx.send(with_kind(KeyCode::Left, KeyEventKind::Repeat)).unwrap();
        assert_eq!(input.poll(), vec![InputEvent::KeyDown(Key::Left)]);

        for _ in 0..2 * HOLD_WINDOW {
            assert!(input.poll().is_empty());
        }
        tx.send(with_kind(KeyCode::Left, KeyEventKind::Release)).unwrap();
        assert_eq!(input.poll(), vec![InputEvent::KeyUp(Key::Left)]);
    }

    #[test]
    fn ctrl_c_and_click_translate() {
        let (tx, mut input) = input(false);
        tx.send(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))
        .unwrap();
        tx.send(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 40,
            row: 11,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
        assert_eq!(
            input.poll(),
            vec![InputEvent::Quit, InputEvent::PointerDown { x: 40, y: 11 }]
        );
    }

    #[test]
    fn unopenable_log_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("game.log");
        match init_logging(&path) {
            Err(GameError::LogFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a log file error, got {other:?}"),
        }
    }
}
