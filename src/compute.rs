/// Game-logic functions.
///
/// State transitions (`init_state`, the `move_player_*` family,
/// `player_shoot`, `spawn_wave`, `tick`) take an immutable reference to the
/// current `GameState` and return a brand-new one.  Ship-level operations
/// (`fire`, `move_lasers_at`, ...) mutate the ship they are given.  All
/// randomness comes through an injected RNG.

use rand::Rng;

use crate::assets::{Assets, SpriteId};
use crate::collision::collide;
use crate::entities::{
    EnemyKind, FrameInput, GameState, GameStatus, HealthBar, Projectile, Rect, Ship, ShipRole,
};

// ── Rules ─────────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: u32 = 750;
pub const SCREEN_HEIGHT: u32 = 750;
pub const FPS: u32 = 60;

pub const START_LIVES: i32 = 5;
pub const PLAYER_START: (f32, f32) = (300.0, 630.0);
pub const PLAYER_HEALTH: i32 = 100;
pub const ENEMY_HEALTH: i32 = 100;

pub const PLAYER_VELOCITY: f32 = 5.0;
pub const LASER_VELOCITY: f32 = 5.0;
pub const ENEMY_VELOCITY: f32 = 1.0;

/// Frames between two shots of the same ship.
pub const COOLDOWN: u32 = 30;
pub const LASER_DAMAGE: i32 = 10;
pub const RAM_DAMAGE: i32 = 10;
/// Each enemy fires with probability 1 / ENEMY_FIRE_ODDS per frame.
pub const ENEMY_FIRE_ODDS: u32 = 2 * FPS;
/// Enemy lasers start left of the enemy's origin.
pub const ENEMY_LASER_OFFSET: f32 = -20.0;

pub const INITIAL_WAVE_LENGTH: u32 = 5;
pub const WAVE_GROWTH: u32 = 5;
pub const SPAWN_MARGIN_LEFT: i32 = 50;
pub const SPAWN_MARGIN_RIGHT: i32 = 100;
pub const SPAWN_Y_MIN: i32 = -1500;
pub const SPAWN_Y_MAX: i32 = -100;

/// Frames the loss screen stays up before the run ends.
pub const LOST_HOLD_TICKS: u32 = FPS * 3;

/// Extra clearance under the player for the health bar.
pub const BOTTOM_MARGIN: f32 = 15.0;
pub const HEALTH_BAR_GAP: f32 = 10.0;
pub const HEALTH_BAR_HEIGHT: f32 = 10.0;

pub const START_BUTTON_SIZE: (f32, f32) = (200.0, 60.0);
pub const START_BUTTON_Y: f32 = 450.0;

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn new_player(x: f32, y: f32) -> Ship {
    Ship {
        x,
        y,
        health: PLAYER_HEALTH,
        cooldown: 0,
        sprite: SpriteId::Player,
        laser: SpriteId::LaserYellow,
        lasers: Vec::new(),
        role: ShipRole::Player { max_health: PLAYER_HEALTH },
    }
}

pub fn new_enemy(x: f32, y: f32, kind: EnemyKind) -> Ship {
    let (sprite, laser) = kind.sprites();
    Ship {
        x,
        y,
        health: ENEMY_HEALTH,
        cooldown: 0,
        sprite,
        laser,
        lasers: Vec::new(),
        role: ShipRole::Enemy { kind },
    }
}

/// Fresh playthrough: player at its spawn point, no enemies yet.
pub fn init_state(width: u32, height: u32, high_score: u32) -> GameState {
    GameState {
        player: new_player(PLAYER_START.0, PLAYER_START.1),
        enemies: Vec::new(),
        level: 0,
        wave_length: INITIAL_WAVE_LENGTH,
        enemy_velocity: ENEMY_VELOCITY,
        lives: START_LIVES,
        score: 0,
        high_score,
        status: GameStatus::Playing,
        frame: 0,
        width,
        height,
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// Positive velocity moves down, negative moves up.
pub fn move_projectile(laser: &mut Projectile, velocity: f32) {
    laser.y += velocity;
}

pub fn off_screen(laser: &Projectile, height: u32) -> bool {
    !(0.0..=height as f32).contains(&laser.y)
}

pub fn projectile_hits(laser: &Projectile, target: &Ship, assets: &Assets) -> bool {
    collide(
        assets.mask(laser.sprite),
        (laser.x, laser.y),
        assets.mask(target.sprite),
        (target.x, target.y),
    )
}

// ── Ships ─────────────────────────────────────────────────────────────────────

pub fn ships_collide(a: &Ship, b: &Ship, assets: &Assets) -> bool {
    collide(assets.mask(a.sprite), (a.x, a.y), assets.mask(b.sprite), (b.x, b.y))
}

/// Once a ship has fired, its counter climbs by one per frame until it
/// reaches `COOLDOWN`, then drops back to 0 (ready).
pub fn advance_cooldown(ship: &mut Ship) {
    if ship.cooldown >= COOLDOWN {
        ship.cooldown = 0;
    } else if ship.cooldown > 0 {
        ship.cooldown += 1;
    }
}

/// Fire one laser if the ship is ready and has a laser sprite.  Returns
/// whether a laser was spawned.
pub fn fire(ship: &mut Ship, assets: &Assets) -> bool {
    if ship.cooldown != 0 || assets.sprite(ship.laser).is_none() {
        return false;
    }
    let x = match ship.role {
        ShipRole::Player { .. } => ship.x,
        ShipRole::Enemy { .. } => ship.x + ENEMY_LASER_OFFSET,
    };
    ship.lasers.push(Projectile { x, y: ship.y, sprite: ship.laser });
    ship.cooldown = 1;
    true
}

/// Advance the ship's cooldown and lasers against a single target.  A laser
/// that leaves the screen is dropped; one that hits deals `LASER_DAMAGE`
/// and is dropped.
pub fn move_lasers_at(ship: &mut Ship, velocity: f32, target: &mut Ship, assets: &Assets, height: u32) {
    advance_cooldown(ship);
    ship.lasers.retain_mut(|laser| {
        move_projectile(laser, velocity);
        if off_screen(laser, height) {
            false
        } else if projectile_hits(laser, target, assets) {
            target.health -= LASER_DAMAGE;
            false
        } else {
            true
        }
    });
}

/// Advance the ship's cooldown and lasers against many targets.  The first
/// target a laser touches is removed outright, along with the laser.
/// Returns how many targets were destroyed.
pub fn move_lasers_at_many(
    ship: &mut Ship,
    velocity: f32,
    targets: &mut Vec<Ship>,
    assets: &Assets,
    height: u32,
) -> u32 {
    advance_cooldown(ship);
    let mut destroyed = 0;
    ship.lasers.retain_mut(|laser| {
        move_projectile(laser, velocity);
        if off_screen(laser, height) {
            return false;
        }
        match targets.iter().position(|t| projectile_hits(laser, t, assets)) {
            Some(i) => {
                targets.remove(i);
                destroyed += 1;
                false
            }
            None => true,
        }
    });
    destroyed
}

/// Health bar under the player's sprite.  `None` for enemies and for a
/// player without a sprite.
pub fn health_bar(ship: &Ship, assets: &Assets) -> Option<HealthBar> {
    let ShipRole::Player { max_health } = ship.role else {
        return None;
    };
    let sprite = assets.sprite(ship.sprite)?;
    let width = sprite.width() as f32;
    let y = ship.y + sprite.height() as f32 + HEALTH_BAR_GAP;
    let ratio = ship.health as f32 / max_health as f32;
    Some(HealthBar {
        background: Rect::new(ship.x, y, width, HEALTH_BAR_HEIGHT),
        foreground: Rect::new(ship.x, y, (width * ratio).max(0.0), HEALTH_BAR_HEIGHT),
    })
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.player.x - PLAYER_VELOCITY > 0.0 {
        next.player.x -= PLAYER_VELOCITY;
    }
    next
}

pub fn move_player_right(state: &GameState, assets: &Assets) -> GameState {
    let mut next = state.clone();
    let width = assets.width(next.player.sprite);
    if next.player.x + PLAYER_VELOCITY + width < state.width as f32 {
        next.player.x += PLAYER_VELOCITY;
    }
    next
}

pub fn move_player_up(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.player.y - PLAYER_VELOCITY > 0.0 {
        next.player.y -= PLAYER_VELOCITY;
    }
    next
}

pub fn move_player_down(state: &GameState, assets: &Assets) -> GameState {
    let mut next = state.clone();
    let height = assets.height(next.player.sprite);
    if next.player.y + PLAYER_VELOCITY + height + BOTTOM_MARGIN < state.height as f32 {
        next.player.y += PLAYER_VELOCITY;
    }
    next
}

pub fn player_shoot(state: &GameState, assets: &Assets) -> GameState {
    let mut next = state.clone();
    fire(&mut next.player, assets);
    next
}

fn apply_input(state: &GameState, input: &FrameInput, assets: &Assets) -> GameState {
    let mut next = state.clone();
    if input.left {
        next = move_player_left(&next);
    }
    if input.right {
        next = move_player_right(&next, assets);
    }
    if input.up {
        next = move_player_up(&next);
    }
    if input.down {
        next = move_player_down(&next, assets);
    }
    if input.fire {
        next = player_shoot(&next, assets);
    }
    next
}

// ── Waves ────────────────────────────────────────────────────────────────────

/// Start the next level: the wave grows by `WAVE_GROWTH` and that many
/// enemies appear above the screen at random positions.
pub fn spawn_wave(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.level += 1;
    next.wave_length += WAVE_GROWTH;

    let x_max = (next.width as i32 - SPAWN_MARGIN_RIGHT).max(SPAWN_MARGIN_LEFT + 1);
    for _ in 0..next.wave_length {
        let x = rng.gen_range(SPAWN_MARGIN_LEFT..x_max);
        let y = rng.gen_range(SPAWN_Y_MIN..SPAWN_Y_MAX);
        let kind = EnemyKind::ALL[rng.gen_range(0..EnemyKind::ALL.len())];
        next.enemies.push(new_enemy(x as f32, y as f32, kind));
    }

    log::info!("Level {}: spawned {} enemies", next.level, next.wave_length);
    next
}

// ── Per-frame tick (RNG is injected) ────────────────────────────

/// Advance the run by one frame.
pub fn tick(state: &GameState, input: &FrameInput, assets: &Assets, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.frame += 1;

    if next.status == GameStatus::Finished {
        return next;
    }

    // ── 1. Loss ──────────────────────────────────────────────────────────────
    if next.lives <= 0 || next.player.health <= 0 {
        let ticks = match next.status {
            GameStatus::Lost { ticks } => ticks + 1,
            _ => {
                log::info!(
                    "Run lost on level {} with score {} (lives {}, health {})",
                    next.level,
                    next.score,
                    next.lives,
                    next.player.health
                );
                1
            }
        };
        next.status = if ticks > LOST_HOLD_TICKS {
            GameStatus::Finished
        } else {
            GameStatus::Lost { ticks }
        };
        return next;
    }

    // ── 2. Next wave ─────────────────────────────────────────────────────────
    if next.enemies.is_empty() {
        next = spawn_wave(&next, rng);
    }

    // ── 3. Player input ──────────────────────────────────────────────────────
    next = apply_input(&next, input, assets);

    // ── 4. Enemies: move, shoot, ram, escape ─────────────────────────────────
    let height = next.height;
    let GameState { player, enemies, lives, enemy_velocity, .. } = &mut next;
    enemies.retain_mut(|enemy| {
        enemy.y += *enemy_velocity;
        move_lasers_at(enemy, LASER_VELOCITY, player, assets, height);

        if rng.gen_ratio(1, ENEMY_FIRE_ODDS) {
            fire(enemy, assets);
        }

        if ships_collide(enemy, player, assets) {
            log::debug!("Enemy rammed the player at ({}, {})", enemy.x, enemy.y);
            player.health -= RAM_DAMAGE;
            false
        } else if enemy.y + assets.height(enemy.sprite) > height as f32 {
            log::debug!("Enemy escaped at x={}", enemy.x);
            *lives -= 1;
            false
        } else {
            true
        }
    });

    // ── 5. Player lasers vs enemies ──────────────────────────────────────────
    let destroyed = move_lasers_at_many(&mut next.player, -LASER_VELOCITY, &mut next.enemies, assets, height);
    next.score += destroyed;
    next.high_score = next.high_score.max(next.score);

    next
}

// ── Menu ─────────────────────────────────────────────────────────────────────

/// The START button, centred horizontally.
pub fn start_button(width: u32) -> Rect {
    let (w, h) = START_BUTTON_SIZE;
    Rect::new((width as f32 - w) / 2.0, START_BUTTON_Y, w, h)
}
