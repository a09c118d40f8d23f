//! Sprite object attribute memory, shadowed in RAM.
//!
//! Hardware reads the 128-entry sprite table and the 32 affine
//! parameter sets from a dedicated memory the CPU should not scribble
//! on mid-frame. The shadow table absorbs all edits and an explicit
//! [`OamShadow::commit`] copies the whole thing across at a safe
//! moment, through an [`OamPort`] the display owner implements.

pub const SPRITE_COUNT: usize = 128;
pub const AFFINE_COUNT: usize = 32;

/// Hardware sprite footprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteSize {
    S8x8,
    S8x16,
    S8x32,
    S16x8,
    S16x16,
    S16x32,
    S32x8,
    S32x16,
    S32x32,
    S32x64,
    S64x32,
    S64x64,
}

/// Map pixel dimensions onto a hardware sprite footprint.
pub fn dimensions_to_size(width: u32, height: u32) -> Option<SpriteSize> {
    match (width, height) {
        (8, 8) => Some(SpriteSize::S8x8),
        (8, 16) => Some(SpriteSize::S8x16),
        (8, 32) => Some(SpriteSize::S8x32),
        (16, 8) => Some(SpriteSize::S16x8),
        (16, 16) => Some(SpriteSize::S16x16),
        (16, 32) => Some(SpriteSize::S16x32),
        (32, 8) => Some(SpriteSize::S32x8),
        (32, 16) => Some(SpriteSize::S32x16),
        (32, 32) => Some(SpriteSize::S32x32),
        (32, 64) => Some(SpriteSize::S32x64),
        (64, 32) => Some(SpriteSize::S64x32),
        (64, 64) => Some(SpriteSize::S64x64),
        _ => None,
    }
}

/// Color format of a sprite's graphics data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    /// 16 colors, 16 palettes.
    Pal16,
    /// 256 colors.
    Pal256,
    /// Direct-color bitmap; `palette_alpha` becomes alpha.
    Bmp,
}

/// One sprite table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteEntry {
    pub x: i16,
    pub y: i16,
    pub priority: u8,
    /// Palette index, or alpha for [`ColorFormat::Bmp`].
    pub palette_alpha: u8,
    pub size: SpriteSize,
    pub format: ColorFormat,
    pub gfx_index: u16,
    /// Affine parameter slot, if the sprite rotates/scales.
    pub affine_index: Option<u8>,
    /// Double the clipping window of an affine sprite.
    pub size_double: bool,
    pub hidden: bool,
    pub hflip: bool,
    pub vflip: bool,
    pub mosaic: bool,
}

impl SpriteEntry {
    /// A disabled entry; what every slot starts as.
    pub const HIDDEN: Self = Self {
        x: 0,
        y: 0,
        priority: 0,
        palette_alpha: 0,
        size: SpriteSize::S8x8,
        format: ColorFormat::Pal16,
        gfx_index: 0,
        affine_index: None,
        size_double: false,
        hidden: true,
        hflip: false,
        vflip: false,
        mosaic: false,
    };
}

/// One affine parameter set, 8.8 fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffineParams {
    pub hdx: i16,
    pub vdx: i16,
    pub hdy: i16,
    pub vdy: i16,
}

impl AffineParams {
    pub const IDENTITY: Self = Self {
        hdx: 1 << 8,
        vdx: 0,
        hdy: 0,
        vdy: 1 << 8,
    };
}

/// Port to the hardware table the shadow is committed into.
pub trait OamPort {
    /// Copy the whole shadow across in one go.
    fn commit(
        &mut self,
        sprites: &[SpriteEntry; SPRITE_COUNT],
        affine: &[AffineParams; AFFINE_COUNT],
    );
}

/// The RAM shadow of one object attribute memory.
pub struct OamShadow {
    sprites: [SpriteEntry; SPRITE_COUNT],
    affine: [AffineParams; AFFINE_COUNT],
}

impl OamShadow {
    /// Everything hidden, every affine set the identity.
    pub fn new() -> Self {
        Self {
            sprites: [SpriteEntry::HIDDEN; SPRITE_COUNT],
            affine: [AffineParams::IDENTITY; AFFINE_COUNT],
        }
    }

    pub fn sprite(&self, index: usize) -> &SpriteEntry {
        &self.sprites[index]
    }

    pub fn set(&mut self, index: usize, entry: SpriteEntry) {
        debug_assert!(index < SPRITE_COUNT, "sprite index out of range");
        if index < SPRITE_COUNT {
            self.sprites[index] = entry;
        }
    }

    pub fn set_hidden(&mut self, index: usize, hidden: bool) {
        debug_assert!(index < SPRITE_COUNT, "sprite index out of range");
        if index < SPRITE_COUNT {
            self.sprites[index].hidden = hidden;
        }
    }

    /// Hide `count` entries starting at `start`; `count == 0` hides
    /// the whole table.
    pub fn clear_range(&mut self, start: usize, count: usize) {
        let (start, count) = if count == 0 {
            (0, SPRITE_COUNT)
        } else {
            (start, count)
        };
        let end = (start + count).min(SPRITE_COUNT);
        for entry in &mut self.sprites[start.min(SPRITE_COUNT)..end] {
            *entry = SpriteEntry::HIDDEN;
        }
    }

    pub fn set_affine(&mut self, index: usize, params: AffineParams) {
        debug_assert!(index < AFFINE_COUNT, "affine index out of range");
        if index < AFFINE_COUNT {
            self.affine[index] = params;
        }
    }

    /// Push the whole shadow into hardware.
    pub fn commit(&self, port: &mut impl OamPort) {
        port.commit(&self.sprites, &self.affine);
    }
}

impl Default for OamShadow {
    fn default() -> Self {
        Self::new()
    }
}
