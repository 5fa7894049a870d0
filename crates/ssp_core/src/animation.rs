//! Sprite-sheet animation state for the player character.
//!
//! A sprite sheet is a horizontal strip of equally wide frames. The active
//! frame is selected by cropping `crop_width * frame` pixels from the left.
//! Each clip wraps its frame counter at a fixed threshold that matches the
//! number of frames in the sheet, so the crop never runs past the image.
//!
//! Frame counters advance once per fixed simulation tick; at 60 Hz a stand
//! cycle lasts one second and a run cycle half a second.

use crate::surface::ImageHandle;

/// Horizontal facing of an animation clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
}

/// Which clip the player sheet is showing. Replaces comparing image
/// identities to find out what the player is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    #[default]
    StandRight,
    StandLeft,
    RunRight,
    RunLeft,
}

impl AnimationState {
    pub fn is_running(self) -> bool {
        matches!(self, Self::RunRight | Self::RunLeft)
    }

    pub fn facing(self) -> Facing {
        match self {
            Self::StandRight | Self::RunRight => Facing::Right,
            Self::StandLeft | Self::RunLeft => Facing::Left,
        }
    }

    /// Highest frame index before the counter wraps to zero.
    pub fn frame_limit(self) -> u32 {
        if self.is_running() {
            RUN_FRAME_LIMIT
        } else {
            STAND_FRAME_LIMIT
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StandRight => "stand-right",
            Self::StandLeft => "stand-left",
            Self::RunRight => "run-right",
            Self::RunLeft => "run-left",
        }
    }
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub const STAND_FRAME_LIMIT: u32 = 59;
pub const RUN_FRAME_LIMIT: u32 = 29;

/// Advance a frame counter by one tick, wrapping past the state's limit.
pub fn advance_frame(frames: u32, state: AnimationState) -> u32 {
    let next = frames + 1;
    if next > state.frame_limit() {
        0
    } else {
        next
    }
}

/// A named clip: one sheet per facing plus frame geometry.
#[derive(Debug, Clone)]
pub struct SpriteVariant {
    pub right: ImageHandle,
    pub left: ImageHandle,
    /// Pixel width of one frame inside the sheet.
    pub crop_width: f32,
    /// Width the frame is rendered at on the canvas.
    pub width: f32,
}

impl SpriteVariant {
    pub fn sheet(&self, facing: Facing) -> &ImageHandle {
        match facing {
            Facing::Right => &self.right,
            Facing::Left => &self.left,
        }
    }
}

/// The stand and run clips of a character.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub stand: SpriteVariant,
    pub run: SpriteVariant,
}

impl SpriteSet {
    pub fn variant(&self, state: AnimationState) -> &SpriteVariant {
        if state.is_running() {
            &self.run
        } else {
            &self.stand
        }
    }

    pub fn sheet(&self, state: AnimationState) -> &ImageHandle {
        self.variant(state).sheet(state.facing())
    }
}
