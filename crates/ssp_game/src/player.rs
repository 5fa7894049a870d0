//! The controllable character: per-tick integration, gravity, sheet animation.

use glam::Vec2;
use ssp_core::animation::{advance_frame, AnimationState, SpriteSet, SpriteVariant};
use ssp_core::surface::{Canvas, ImageHandle, Rect};

use crate::config::PhysicsConfig;

pub const PLAYER_START: Vec2 = Vec2::new(100.0, 100.0);
pub const PLAYER_HEIGHT: f32 = 150.0;
/// Pixel height of one frame in every player sheet.
pub const SHEET_FRAME_HEIGHT: f32 = 400.0;

pub const STAND_CROP_WIDTH: f32 = 177.0;
pub const STAND_WIDTH: f32 = 66.0;
pub const RUN_CROP_WIDTH: f32 = 341.0;
pub const RUN_WIDTH: f32 = 127.875;

/// Assemble the stand/run clips from the four player sheets.
pub fn player_sprite_set(
    stand_right: ImageHandle,
    stand_left: ImageHandle,
    run_right: ImageHandle,
    run_left: ImageHandle,
) -> SpriteSet {
    SpriteSet {
        stand: SpriteVariant {
            right: stand_right,
            left: stand_left,
            crop_width: STAND_CROP_WIDTH,
            width: STAND_WIDTH,
        },
        run: SpriteVariant {
            right: run_right,
            left: run_left,
            crop_width: RUN_CROP_WIDTH,
            width: RUN_WIDTH,
        },
    }
}

/// Vertical velocity after one tick of gravity.
///
/// `position_y` is the already-integrated position. Gravity is skipped as soon
/// as the projected bottom edge would pass `ground_y`, which keeps a resting
/// or escaping player from accumulating fall speed.
pub fn next_vertical_velocity(
    velocity_y: f32,
    position_y: f32,
    height: f32,
    ground_y: f32,
    gravity: f32,
) -> f32 {
    if position_y + height + velocity_y <= ground_y {
        velocity_y + gravity
    } else {
        velocity_y
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub frames: u32,
    pub animation: AnimationState,
    pub current_crop_width: f32,
    gravity: f32,
    jump_impulse: f32,
    sprites: SpriteSet,
}

impl Player {
    pub fn new(sprites: SpriteSet, physics: &PhysicsConfig) -> Self {
        let animation = AnimationState::StandRight;
        let variant = sprites.variant(animation);
        Self {
            position: PLAYER_START,
            velocity: Vec2::ZERO,
            speed: physics.speed,
            width: variant.width,
            height: PLAYER_HEIGHT,
            frames: 0,
            animation,
            current_crop_width: variant.crop_width,
            gravity: physics.gravity,
            jump_impulse: physics.jump_impulse,
            sprites,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    /// Sheet currently shown.
    pub fn sheet(&self) -> &ImageHandle {
        self.sprites.sheet(self.animation)
    }

    /// Source rectangle of the current frame inside the sheet.
    pub fn crop_rect(&self) -> Rect {
        Rect::new(
            self.current_crop_width * self.frames as f32,
            0.0,
            self.current_crop_width,
            SHEET_FRAME_HEIGHT,
        )
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let dst = Rect::from_pos_size(self.position, Vec2::new(self.width, self.height));
        canvas.draw_image(self.sheet(), Some(self.crop_rect()), dst);
    }

    /// One tick: advance the frame, draw at the current position, integrate,
    /// then apply gravity against the canvas floor.
    pub fn update(&mut self, canvas: &mut dyn Canvas) {
        self.frames = advance_frame(self.frames, self.animation);
        self.draw(canvas);

        self.position += self.velocity;

        let ground_y = canvas.size().y;
        self.velocity.y = next_vertical_velocity(
            self.velocity.y,
            self.position.y,
            self.height,
            ground_y,
            self.gravity,
        );
    }

    pub fn jump(&mut self) {
        self.velocity.y += self.jump_impulse;
    }

    /// Switch clips. Entering a run clip restarts at frame 1; returning to a
    /// stand clip keeps the frame counter.
    pub fn set_animation(&mut self, state: AnimationState) {
        if state.is_running() {
            self.frames = 1;
        }
        let variant = self.sprites.variant(state);
        self.width = variant.width;
        self.current_crop_width = variant.crop_width;
        log::debug!("Player animation {} -> {}", self.animation, state);
        self.animation = state;
    }
}
