mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
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
use rand::rngs::StdRng;

use junk_food_attack::assets::Assets;
use junk_food_attack::canvas::{Canvas, Viewport};
use junk_food_attack::compute::{init_state, start_button, tick, FPS, SCREEN_HEIGHT, SCREEN_WIDTH};
use junk_food_attack::config::Config;
use junk_food_attack::entities::{FrameInput, GameState, GameStatus};

const FRAME: Duration = Duration::from_micros(1_000_000 / FPS as u64);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const FIRE_KEYS: [KeyCode; 1] = [KeyCode::Char(' ')];

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Canvas sized to the current terminal, plus where it sits.
fn fitted_canvas() -> std::io::Result<(Canvas, Viewport)> {
    let (cols, rows) = terminal::size()?;
    let viewport = Viewport::fit(cols, rows);
    let canvas = Canvas::new(viewport.cols, viewport.rows, SCREEN_WIDTH, SCREEN_HEIGHT);
    Ok((canvas, viewport))
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    assets: &Assets,
    high_score: u32,
) -> std::io::Result<MenuResult> {
    let button = start_button(SCREEN_WIDTH);

    loop {
        out.execute(terminal::Clear(terminal::ClearType::All))?;
        let (mut canvas, viewport) = fitted_canvas()?;
        display::draw_menu(&mut canvas, assets, SCREEN_WIDTH, high_score);
        display::present(out, &canvas, viewport)?;

        // Block until the user makes a choice or the terminal changes size
        loop {
            let Ok(ev) = rx.recv() else {
                return Ok(MenuResult::Quit);
            };
            match ev {
                Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => {
                    if is_quit(code, modifiers) {
                        return Ok(MenuResult::Quit);
                    }
                    if code == KeyCode::Enter {
                        return Ok(MenuResult::Start);
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    if let Some((col, row)) = viewport.cell_at(column, row) {
                        if canvas.cell_rect(col, row).overlaps(&button) {
                            return Ok(MenuResult::Start);
                        }
                    }
                }
                Event::Resize(..) => break,
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: we maintain a `key_frame` map that records the frame number
/// of the last press/repeat event for every key.  Each frame we check which
/// keys are still "fresh" (within `HOLD_WINDOW` frames) and build one
/// `FrameInput` from them, so movement and fire can be held together.
///
/// * **Keyboard-enhancement capable** terminals send `Release` events and
///   keys are dropped on release.
/// * **Classic terminals** only send `Press` (OS key-repeat shows as repeated
///   `Press`); keys expire after `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    assets: &Assets,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut viewport = None;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Render ────────────────────────────────────────────────────────────
        let (mut canvas, fitted) = fitted_canvas()?;
        if viewport != Some(fitted) {
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            viewport = Some(fitted);
        }
        display::draw_game(&mut canvas, state, assets);
        display::present(out, &canvas, fitted)?;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    if is_quit(code, modifiers) {
                        log::info!("Quit during play at frame {}", state.frame);
                        return Ok(true);
                    }
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = FrameInput {
            left: is_held(&key_frame, &LEFT_KEYS, frame),
            right: is_held(&key_frame, &RIGHT_KEYS, frame),
            up: is_held(&key_frame, &UP_KEYS, frame),
            down: is_held(&key_frame, &DOWN_KEYS, frame),
            fire: is_held(&key_frame, &FIRE_KEYS, frame),
        };

        *state = tick(state, &input, assets, rng);
        if state.status == GameStatus::Finished {
            return Ok(false);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> junk_food_attack::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

fn main() -> junk_food_attack::Result<()> {
    let config = Config::parse();
    init_logging(&config.log_path())?;
    log::info!("Starting with {:?}", config);

    let assets = Assets::load(config.asset_source().as_ref(), SCREEN_WIDTH, SCREEN_HEIGHT);
    let mut rng = config.rng();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &assets, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Terminal I/O failed: {}", e);
    }
    Ok(result?)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    assets: &Assets,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let mut high_score = 0;

    loop {
        match show_menu(out, rx, assets, high_score)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                log::info!("New run (best so far {})", high_score);
                let mut state = init_state(SCREEN_WIDTH, SCREEN_HEIGHT, high_score);
                let quit = game_loop(out, &mut state, assets, rx, rng)?;
                high_score = high_score.max(state.high_score);

                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
