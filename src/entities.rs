/// All game entity types: pure data, no game logic.

use std::str::FromStr;

use crate::assets::SpriteId;
use crate::error::GameError;

// ── Enemy kinds ───────────────────────────────────────────────────────────────

/// Enemy colour.  Each colour is one kind of junk food with its own laser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Burger, red laser.
    Red,
    /// Fries, green laser.
    Green,
    /// Soda, blue laser.
    Blue,
}

impl EnemyKind {
    /// Spawn order used when picking a random kind.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Red, EnemyKind::Blue, EnemyKind::Green];

    /// `(ship sprite, laser sprite)` for this kind.
    pub fn sprites(self) -> (SpriteId, SpriteId) {
        match self {
            EnemyKind::Red => (SpriteId::Burger, SpriteId::LaserRed),
            EnemyKind::Green => (SpriteId::Fries, SpriteId::LaserGreen),
            EnemyKind::Blue => (SpriteId::Soda, SpriteId::LaserBlue),
        }
    }
}

impl FromStr for EnemyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(EnemyKind::Red),
            "green" => Ok(EnemyKind::Green),
            "blue" => Ok(EnemyKind::Blue),
            other => Err(GameError::UnknownEnemyKind(other.to_string())),
        }
    }
}

// ── Run status ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// The run is lost; `ticks` counts frames spent on the loss screen.
    Lost { ticks: u32 },
    /// The loss screen has been held long enough; control goes back to the menu.
    Finished,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in logical canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// True if the interiors intersect.  Shared edges and empty rectangles
    /// never overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && other.w > 0.0
            && other.h > 0.0
            && self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// The player's two-layer health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    /// Full-width red layer.
    pub background: Rect,
    /// Green layer scaled to `health / max_health`.
    pub foreground: Rect,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub sprite: SpriteId,
}

// ── Ships ─────────────────────────────────────────────────────────────────────

/// What a ship is.  Drives the per-variant behaviour in `compute`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShipRole {
    Player { max_health: i32 },
    Enemy { kind: EnemyKind },
}

/// Shared ship data for the player and every enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    /// Not clamped; direct hits can push it below zero.
    pub health: i32,
    /// 0 means ready to fire; otherwise counts up to the cooldown threshold.
    pub cooldown: u32,
    pub sprite: SpriteId,
    pub laser: SpriteId,
    /// Live projectiles fired by this ship, oldest first.
    pub lasers: Vec<Projectile>,
    pub role: ShipRole,
}

// ── Per-frame input ───────────────────────────────────────────────────────────

/// Keys held during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire state of one playthrough.  Cloneable so pure update
/// functions can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Ship,
    pub enemies: Vec<Ship>,
    /// Current wave number; 0 until the first wave spawns.
    pub level: u32,
    /// Enemies in the most recent wave.
    pub wave_length: u32,
    pub enemy_velocity: f32,
    pub lives: i32,
    pub score: u32,
    /// Best score seen during this process run (updated live).
    pub high_score: u32,
    pub status: GameStatus,
    pub frame: u64,
    pub width: u32,
    pub height: u32,
}
