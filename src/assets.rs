//! Asset provider.
//!
//! Images and fonts are requested by logical file name from an
//! [`AssetSource`].  [`Assets::load`] tries every asset exactly once and
//! degrades on failure: a missing image becomes a null sprite (drawn as
//! nothing, never collides) and a missing font becomes the system default
//! at the requested size.

use std::collections::HashMap;
use std::path::PathBuf;

use image::{imageops, Rgba, RgbaImage};

use crate::collision::Mask;
use crate::error::{GameError, Result};

pub const FONT_FILE: &str = "Jersey15-Regular.ttf";

// ── Names ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Burger,
    Fries,
    Soda,
    LaserRed,
    LaserGreen,
    LaserBlue,
    LaserYellow,
    Background,
}

impl SpriteId {
    pub const ALL: [SpriteId; 9] = [
        SpriteId::Player,
        SpriteId::Burger,
        SpriteId::Fries,
        SpriteId::Soda,
        SpriteId::LaserRed,
        SpriteId::LaserGreen,
        SpriteId::LaserBlue,
        SpriteId::LaserYellow,
        SpriteId::Background,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SpriteId::Player => "player.png",
            SpriteId::Burger => "burger.png",
            SpriteId::Fries => "fries.png",
            SpriteId::Soda => "soda.png",
            SpriteId::LaserRed => "laser_red.png",
            SpriteId::LaserGreen => "laser_green.png",
            SpriteId::LaserBlue => "laser_blue.png",
            SpriteId::LaserYellow => "laser_yellow.png",
            SpriteId::Background => "background.png",
        }
    }
}

/// The four places text is drawn, each with its own point size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSlot {
    Main = 0,
    Lost = 1,
    Title = 2,
    Button = 3,
}

impl FontSlot {
    pub const ALL: [FontSlot; 4] = [FontSlot::Main, FontSlot::Lost, FontSlot::Title, FontSlot::Button];

    pub fn size(self) -> u16 {
        match self {
            FontSlot::Main => 50,
            FontSlot::Lost => 60,
            FontSlot::Title => 70,
            FontSlot::Button => 45,
        }
    }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// A decoded image together with its collision mask.
#[derive(Clone, Debug)]
pub struct Sprite {
    image: RgbaImage,
    mask: Mask,
}

impl Sprite {
    pub fn from_image(image: RgbaImage) -> Self {
        let mask = Mask::from_image(&image);
        Sprite { image, mask }
    }

    /// Fully opaque rectangle of one colour.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb;
        Sprite::from_image(RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255])))
    }

    /// Pixel art from text rows.  Every character is one `scale`×`scale`
    /// block; characters the palette does not know are transparent.
    pub fn from_art(rows: &[&str], scale: u32, palette: impl Fn(char) -> Option<[u8; 3]>) -> Self {
        let art_h = rows.len() as u32;
        let art_w = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let grid: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();

        let image = RgbaImage::from_fn(art_w * scale, art_h * scale, |x, y| {
            let ch = grid[(y / scale) as usize]
                .get((x / scale) as usize)
                .copied()
                .unwrap_or('.');
            match palette(ch) {
                Some([r, g, b]) => Rgba([r, g, b, 255]),
                None => Rgba([0, 0, 0, 0]),
            }
        });
        Sprite::from_image(image)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Colour of an opaque pixel, `None` if transparent or out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width() || y >= self.height() || !self.mask.get(x as i32, y as i32) {
            return None;
        }
        let [r, g, b, _] = self.image.get_pixel(x, y).0;
        Some([r, g, b])
    }

    /// Nearest-neighbour resize.
    pub fn resized(&self, width: u32, height: u32) -> Sprite {
        Sprite::from_image(imageops::resize(&self.image, width, height, imageops::FilterType::Nearest))
    }
}

// ── Fonts ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontFamily {
    Named(String),
    SystemDefault,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Font {
    pub family: FontFamily,
    pub size: u16,
}

impl Font {
    pub fn named(name: &str, size: u16) -> Self {
        Font { family: FontFamily::Named(name.to_string()), size }
    }

    pub fn system_default(size: u16) -> Self {
        Font { family: FontFamily::SystemDefault, size }
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

/// Supplies named image and font blobs.
pub trait AssetSource {
    fn image(&self, name: &str) -> Result<Sprite>;
    fn font(&self, name: &str, size: u16) -> Result<Font>;
}

/// Assets read from a local directory (PNG images, TTF fonts).
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }

    fn existing(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(GameError::AssetNotFound(path.display().to_string()))
        }
    }
}

impl AssetSource for DirSource {
    fn image(&self, name: &str) -> Result<Sprite> {
        let path = self.existing(name)?;
        let image = image::open(&path)?.to_rgba8();
        Ok(Sprite::from_image(image))
    }

    fn font(&self, name: &str, size: u16) -> Result<Font> {
        self.existing(name)?;
        Ok(Font::named(name, size))
    }
}

/// Built-in pixel art for ships and lasers.  Has no background and no
/// font files.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinSource;

const ART_SCALE: u32 = 5;

const PLAYER_ART: [&str; 10] = [
    "....ww....",
    "....ww....",
    "...wccw...",
    "...wccw...",
    "..wwwwww..",
    ".wwkwwkww.",
    "wwwkwwkwww",
    "ww.wwww.ww",
    "w...ee...w",
    "....ee....",
];

const BURGER_ART: [&str; 10] = [
    "..oooooo..",
    ".oosoosoo.",
    "oooooooooo",
    "oosoooosoo",
    "gggggggggg",
    "bbbbbbbbbb",
    "yyyyyyyyyy",
    "bbbbbbbbbb",
    ".oooooooo.",
    "..oooooo..",
];

const FRIES_ART: [&str; 10] = [
    ".f.f.ff.f.",
    ".ffff.fff.",
    ".ffffffff.",
    ".ffffffff.",
    "rrrrrrrrrr",
    "rrrwwwwrrr",
    ".rrwrrwrr.",
    ".rrrwwrrr.",
    ".rrrrrrrr.",
    "..rrrrrr..",
];

const SODA_ART: [&str; 10] = [
    "......k...",
    ".....k....",
    "BBBBkBBBBB",
    "wwwwwwwwww",
    ".BBBBBBBB.",
    ".BBwwwwBB.",
    ".BBwBBwBB.",
    ".BBwwwwBB.",
    "..BBBBBB..",
    "..BBBBBB..",
];

const LASER_ART: [&str; 10] = [
    "....xx....",
    "....xx....",
    "...xxxx...",
    "...xxxx...",
    "...xxxx...",
    "...xxxx...",
    "....xx....",
    "....xx....",
    "..........",
    "..........",
];

fn ship_palette(ch: char) -> Option<[u8; 3]> {
    match ch {
        'w' => Some([235, 235, 240]),
        'c' => Some([80, 200, 230]),
        'k' => Some([120, 120, 130]),
        'e' => Some([250, 120, 40]),
        'o' => Some([210, 150, 60]),
        's' => Some([250, 240, 200]),
        'g' => Some([60, 180, 60]),
        'b' => Some([110, 60, 30]),
        'y' => Some([250, 200, 40]),
        'f' => Some([250, 210, 60]),
        'r' => Some([220, 30, 30]),
        'B' => Some([40, 90, 220]),
        _ => None,
    }
}

fn laser_sprite(rgb: [u8; 3]) -> Sprite {
    Sprite::from_art(&LASER_ART, ART_SCALE, |ch| (ch == 'x').then_some(rgb))
}

impl AssetSource for BuiltinSource {
    fn image(&self, name: &str) -> Result<Sprite> {
        let sprite = match name {
            "player.png" => Sprite::from_art(&PLAYER_ART, ART_SCALE, ship_palette),
            "burger.png" => Sprite::from_art(&BURGER_ART, ART_SCALE, ship_palette),
            "fries.png" => Sprite::from_art(&FRIES_ART, ART_SCALE, ship_palette),
            "soda.png" => Sprite::from_art(&SODA_ART, ART_SCALE, ship_palette),
            "laser_red.png" => laser_sprite([255, 40, 40]),
            "laser_green.png" => laser_sprite([40, 255, 40]),
            "laser_blue.png" => laser_sprite([60, 120, 255]),
            "laser_yellow.png" => laser_sprite([255, 240, 40]),
            other => return Err(GameError::AssetNotFound(other.to_string())),
        };
        Ok(sprite)
    }

    fn font(&self, name: &str, _size: u16) -> Result<Font> {
        Err(GameError::AssetNotFound(name.to_string()))
    }
}

// ── Loaded asset set ──────────────────────────────────────────────────────────

/// Every sprite and font the game draws with, loaded once at startup.
/// Sprites that failed to load are absent (null).
#[derive(Clone, Debug)]
pub struct Assets {
    sprites: HashMap<SpriteId, Sprite>,
    fonts: [Font; 4],
}

impl Assets {
    /// Nothing loaded: every sprite is null, every font is the default.
    pub fn empty() -> Self {
        Assets {
            sprites: HashMap::new(),
            fonts: FontSlot::ALL.map(|slot| Font::system_default(slot.size())),
        }
    }

    /// Load everything from `source`.  The background is stretched to
    /// `width`×`height`.
    pub fn load(source: &dyn AssetSource, width: u32, height: u32) -> Self {
        let mut assets = Assets::empty();

        for id in SpriteId::ALL {
            match source.image(id.file_name()) {
                Ok(sprite) => {
                    let sprite = if id == SpriteId::Background {
                        sprite.resized(width, height)
                    } else {
                        sprite
                    };
                    assets.sprites.insert(id, sprite);
                }
                Err(e) => log::warn!("Error loading {}: {}", id.file_name(), e),
            }
        }

        for slot in FontSlot::ALL {
            match source.font(FONT_FILE, slot.size()) {
                Ok(font) => assets.fonts[slot as usize] = font,
                Err(e) => log::warn!("Error loading font {} ({} pt), using default: {}", FONT_FILE, slot.size(), e),
            }
        }

        log::info!(
            "Loaded {}/{} sprites",
            assets.sprites.len(),
            SpriteId::ALL.len()
        );
        assets
    }

    pub fn with_sprite(mut self, id: SpriteId, sprite: Sprite) -> Self {
        self.sprites.insert(id, sprite);
        self
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn mask(&self, id: SpriteId) -> Option<&Mask> {
        self.sprite(id).map(Sprite::mask)
    }

    /// Sprite width in pixels, 0 for a null sprite.
    pub fn width(&self, id: SpriteId) -> f32 {
        self.sprite(id).map_or(0.0, |s| s.width() as f32)
    }

    /// Sprite height in pixels, 0 for a null sprite.
    pub fn height(&self, id: SpriteId) -> f32 {
        self.sprite(id).map_or(0.0, |s| s.height() as f32)
    }

    pub fn font(&self, slot: FontSlot) -> &Font {
        &self.fonts[slot as usize]
    }
}
