/// Pixel-mask collision.
///
/// A `Mask` is the opacity bitmap of a sprite.  Two positioned masks
/// collide when at least one pixel is opaque in both at the same spot.

/// Alpha values strictly above this count as opaque.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask from row-major opacity bits.  `bits.len()` must be
    /// `width * height`.
    pub fn new(width: u32, height: u32, bits: Vec<bool>) -> Self {
        assert_eq!(bits.len(), (width * height) as usize, "mask size mismatch");
        Mask { width, height, bits }
    }

    pub fn from_image(image: &image::RgbaImage) -> Self {
        let bits = image.pixels().map(|p| p.0[3] > ALPHA_THRESHOLD).collect();
        Mask::new(image.width(), image.height(), bits)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True if `other`, placed with its origin at `(dx, dy)` relative to
    /// this mask's origin, shares an opaque pixel with this mask.
    pub fn overlap(&self, other: &Mask, dx: i32, dy: i32) -> bool {
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + other.width as i32).min(self.width as i32);
        let y1 = (dy + other.height as i32).min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return true;
                }
            }
        }
        false
    }
}

/// Collision between two positioned masks.  A missing mask (null sprite)
/// never collides.
pub fn collide(a: Option<&Mask>, a_pos: (f32, f32), b: Option<&Mask>, b_pos: (f32, f32)) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let dx = b_pos.0.floor() as i32 - a_pos.0.floor() as i32;
            let dy = b_pos.1.floor() as i32 - a_pos.1.floor() as i32;
            a.overlap(b, dx, dy)
        }
        _ => false,
    }
}
