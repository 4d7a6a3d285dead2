/// Rendering layer: all terminal I/O lives here.
///
/// `draw_*` functions compose a frame onto a `Canvas` from an immutable
/// view of the game state; `present` translates the canvas into terminal
/// commands.  No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    QueueableCommand,
};
use junk_food_attack::assets::{Assets, FontSlot, SpriteId};
use junk_food_attack::canvas::{Canvas, Rgb, Viewport};
use junk_food_attack::compute::{health_bar, start_button};
use junk_food_attack::entities::{GameState, GameStatus, Ship};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GAME_BG: Rgb = [0, 0, 0];
const C_MENU_BG: Rgb = [30, 30, 30];
const C_TEXT: Rgb = [255, 0, 0];
const C_BUTTON: Rgb = [0, 128, 0];
const C_BUTTON_TEXT: Rgb = [255, 255, 255];
const C_HEALTH_BACK: Rgb = [255, 0, 0];
const C_HEALTH_FRONT: Rgb = [0, 255, 0];
const C_HINT: Rgb = [150, 150, 150];

const HUD_MARGIN: f32 = 10.0;
const TITLE_Y: f32 = 300.0;
const LOST_Y: f32 = 350.0;
const FINAL_SCORE_Y: f32 = 420.0;
const HIGHEST_Y: f32 = 70.0;
const HINT_Y: f32 = 720.0;

fn to_color([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

fn draw_background(canvas: &mut Canvas, assets: &Assets, fallback: Rgb) {
    canvas.clear(fallback);
    canvas.blit(assets.sprite(SpriteId::Background), 0.0, 0.0);
}

fn draw_centered(canvas: &mut Canvas, assets: &Assets, y: f32, text: &str, color: Rgb, slot: FontSlot, width: f32) {
    let x = (width - canvas.text_width(text)) / 2.0;
    canvas.text(x, y, text, color, assets.font(slot));
}

// ── Game frame ────────────────────────────────────────────────────────────────

fn draw_ship(canvas: &mut Canvas, ship: &Ship, assets: &Assets) {
    canvas.blit(assets.sprite(ship.sprite), ship.x, ship.y);
    for laser in &ship.lasers {
        canvas.blit(assets.sprite(laser.sprite), laser.x, laser.y);
    }
}

fn draw_hud(canvas: &mut Canvas, state: &GameState, assets: &Assets) {
    let width = state.width as f32;
    let font = assets.font(FontSlot::Main);

    canvas.text(HUD_MARGIN, HUD_MARGIN, &format!("Lives: {}", state.lives), C_TEXT, font);

    let level = format!("Level: {}", state.level);
    let lx = width - canvas.text_width(&level) - HUD_MARGIN;
    canvas.text(lx, HUD_MARGIN, &level, C_TEXT, font);

    draw_centered(canvas, assets, HUD_MARGIN, &format!("Score: {}", state.score), C_TEXT, FontSlot::Main, width);
    draw_centered(canvas, assets, HIGHEST_Y, &format!("Highest: {}", state.high_score), C_TEXT, FontSlot::Main, width);
}

/// Compose one complete game frame.
pub fn draw_game(canvas: &mut Canvas, state: &GameState, assets: &Assets) {
    draw_background(canvas, assets, C_GAME_BG);
    draw_hud(canvas, state, assets);

    for enemy in &state.enemies {
        draw_ship(canvas, enemy, assets);
    }

    draw_ship(canvas, &state.player, assets);
    if let Some(bar) = health_bar(&state.player, assets) {
        canvas.fill_rect(bar.background, C_HEALTH_BACK);
        canvas.fill_rect(bar.foreground, C_HEALTH_FRONT);
    }

    if matches!(state.status, GameStatus::Lost { .. } | GameStatus::Finished) {
        let width = state.width as f32;
        draw_centered(canvas, assets, LOST_Y, "You Lost!!", C_TEXT, FontSlot::Lost, width);
        let final_score = format!("Final Score: {}", state.score);
        draw_centered(canvas, assets, FINAL_SCORE_Y, &final_score, C_TEXT, FontSlot::Lost, width);
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

/// Compose the title screen.
pub fn draw_menu(canvas: &mut Canvas, assets: &Assets, width: u32, high_score: u32) {
    let w = width as f32;
    draw_background(canvas, assets, C_MENU_BG);
    draw_centered(canvas, assets, TITLE_Y, "Junk Food Attack!", C_TEXT, FontSlot::Title, w);

    if high_score > 0 {
        let best = format!("Highest: {}", high_score);
        draw_centered(canvas, assets, TITLE_Y + 70.0, &best, C_TEXT, FontSlot::Main, w);
    }

    let button = start_button(width);
    canvas.fill_rect(button, C_BUTTON);
    let (_, cy) = button.center();
    let label_y = cy - canvas.cell_height() / 2.0;
    draw_centered(canvas, assets, label_y, "START", C_BUTTON_TEXT, FontSlot::Button, w);

    let hint = "WASD/arrows move  SPACE fire  Q quit  ENTER start";
    draw_centered(canvas, assets, HINT_Y, hint, C_HINT, FontSlot::Main, w);
}

// ── Terminal output ───────────────────────────────────────────────────────────

/// Queue the whole canvas at the viewport position and flush.
pub fn present<W: Write>(out: &mut W, canvas: &Canvas, viewport: Viewport) -> std::io::Result<()> {
    for row in 0..canvas.rows() {
        out.queue(cursor::MoveTo(viewport.left, viewport.top + row))?;
        let mut last = None;
        for cell in canvas.row(row) {
            let look = (cell.fg, cell.bg, cell.bold);
            if last != Some(look) {
                let weight = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                out.queue(style::SetAttribute(weight))?;
                out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                last = Some(look);
            }
            out.queue(Print(cell.glyph))?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::SetAttribute(Attribute::Reset))?;
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}
