//! Image loading.
//!
//! All images are decoded up front, before the level layout reads their
//! sizes. A file that is missing or fails to decode becomes a zero-size
//! handle: the game keeps running and that image simply never draws.

use std::path::Path;

use image::RgbaImage;
use ssp_core::animation::SpriteSet;
use ssp_core::surface::ImageHandle;

use crate::player::player_sprite_set;

pub const BACKGROUND: &str = "background";
pub const HILLS: &str = "hills";
pub const PLATFORM: &str = "platform";
pub const PLATFORM_SMALL_TALL: &str = "platformSmallTall";
pub const SPRITE_STAND_RIGHT: &str = "spriteStandRight";
pub const SPRITE_STAND_LEFT: &str = "spriteStandLeft";
pub const SPRITE_RUN_RIGHT: &str = "spriteRunRight";
pub const SPRITE_RUN_LEFT: &str = "spriteRunLeft";

pub const IMAGE_NAMES: [&str; 8] = [
    BACKGROUND,
    HILLS,
    PLATFORM,
    PLATFORM_SMALL_TALL,
    SPRITE_STAND_RIGHT,
    SPRITE_STAND_LEFT,
    SPRITE_RUN_RIGHT,
    SPRITE_RUN_LEFT,
];

/// Handles for every image the game draws.
#[derive(Debug, Clone)]
pub struct GameImages {
    pub background: ImageHandle,
    pub hills: ImageHandle,
    pub platform: ImageHandle,
    pub platform_small_tall: ImageHandle,
    pub sprites: SpriteSet,
}

/// Pixels waiting to be uploaded to the GPU.
pub struct DecodedImage {
    pub handle: ImageHandle,
    pub pixels: RgbaImage,
}

pub struct ImageLibrary {
    pub images: GameImages,
    pub decoded: Vec<DecodedImage>,
}

impl ImageLibrary {
    pub fn missing_count(&self) -> usize {
        IMAGE_NAMES.len() - self.decoded.len()
    }
}

pub fn decode_image(path: &Path) -> Result<RgbaImage, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read image {}: {e}", path.display()))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| format!("Failed to decode image {}: {e}", path.display()))?;
    Ok(decoded.to_rgba8())
}

/// Decode `<dir>/<name>.png` for every game image.
pub fn load_game_images(dir: &Path) -> ImageLibrary {
    let mut decoded = Vec::new();
    let mut load = |name: &str| -> ImageHandle {
        let path = dir.join(format!("{name}.png"));
        match decode_image(&path) {
            Ok(pixels) => {
                let handle = ImageHandle::new(name, pixels.width(), pixels.height());
                log::info!(
                    "Loaded image '{}' ({}x{})",
                    name,
                    pixels.width(),
                    pixels.height()
                );
                decoded.push(DecodedImage {
                    handle: handle.clone(),
                    pixels,
                });
                handle
            }
            Err(err) => {
                log::warn!("{err}. '{name}' will not be drawn.");
                ImageHandle::missing(name)
            }
        }
    };

    let images = GameImages {
        background: load(BACKGROUND),
        hills: load(HILLS),
        platform: load(PLATFORM),
        platform_small_tall: load(PLATFORM_SMALL_TALL),
        sprites: player_sprite_set(
            load(SPRITE_STAND_RIGHT),
            load(SPRITE_STAND_LEFT),
            load(SPRITE_RUN_RIGHT),
            load(SPRITE_RUN_LEFT),
        ),
    };

    ImageLibrary { images, decoded }
}
