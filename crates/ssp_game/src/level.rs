//! The single hand-placed level.
//!
//! Ground platforms are laid out relative to the ground image's width `w`, so
//! the seams and gaps stay fixed if the art is resized. The offsets below are
//! the level design; changing any of them changes which jumps are possible.

use crate::assets::GameImages;
use crate::entities::{BackgroundElement, Platform};

pub const GROUND_Y: f32 = 470.0;
pub const ELEVATED_Y: f32 = 270.0;
pub const BACKGROUND_X: f32 = -1.0;
pub const BACKGROUND_Y: f32 = -1.0;

/// X positions of the six ground platforms.
pub fn ground_platform_xs(w: f32) -> [f32; 6] {
    [
        -1.0,
        w - 3.0,
        w * 2.0 + 100.0,
        w * 3.0 + 300.0,
        w * 4.0 + 300.0 - 2.0,
        w * 5.0 + 700.0 - 2.0,
    ]
}

/// X position of the elevated platform: right-aligned with the fifth ground platform.
pub fn elevated_platform_x(w: f32, small_tall_width: f32) -> f32 {
    w * 4.0 + 300.0 - 2.0 + w - small_tall_width
}

/// Scroll distance past which the level counts as cleared.
pub fn win_threshold(w: f32) -> f32 {
    w * 5.0 + 300.0 - 2.0
}

/// Elevated platform first, then the ground platforms left to right.
pub fn build_platforms(images: &GameImages) -> Vec<Platform> {
    let w = images.platform.width();
    let mut platforms = Vec::with_capacity(7);
    platforms.push(Platform::new(
        elevated_platform_x(w, images.platform_small_tall.width()),
        ELEVATED_Y,
        images.platform_small_tall.clone(),
    ));
    platforms.extend(
        ground_platform_xs(w)
            .into_iter()
            .map(|x| Platform::new(x, GROUND_Y, images.platform.clone())),
    );
    platforms
}

/// Far background first, hills on top.
pub fn build_background(images: &GameImages) -> Vec<BackgroundElement> {
    vec![
        BackgroundElement::new(BACKGROUND_X, BACKGROUND_Y, images.background.clone()),
        BackgroundElement::new(BACKGROUND_X, BACKGROUND_Y, images.hills.clone()),
    ]
}
