//! Shared fixtures for unit tests: a canvas that records draw calls and image
//! handles sized like the shipped art.

use glam::Vec2;
use ssp_core::surface::{Canvas, Color, ImageHandle, Rect};

use crate::assets::{self, GameImages};
use crate::config::PhysicsConfig;
use crate::player::player_sprite_set;
use crate::world::World;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: Color,
    },
    Image {
        key: String,
        src: Option<Rect>,
        dst: Rect,
    },
}

impl DrawCommand {
    pub fn key(&self) -> &str {
        match self {
            Self::Fill { .. } => "<fill>",
            Self::Image { key, .. } => key,
        }
    }
}

pub struct RecordingCanvas {
    pub size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            size: Vec2::new(1024.0, 576.0),
            commands: Vec::new(),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn draw_image(&mut self, image: &ImageHandle, src: Option<Rect>, dst: Rect) {
        self.commands.push(DrawCommand::Image {
            key: image.key().to_string(),
            src,
            dst,
        });
    }
}

pub fn sample_images() -> GameImages {
    sample_images_with_platform_width(580)
}

pub fn sample_images_with_platform_width(platform_width: u32) -> GameImages {
    GameImages {
        background: ImageHandle::new(assets::BACKGROUND, 11643, 732),
        hills: ImageHandle::new(assets::HILLS, 7545, 592),
        platform: ImageHandle::new(assets::PLATFORM, platform_width, 125),
        platform_small_tall: ImageHandle::new(assets::PLATFORM_SMALL_TALL, 291, 227),
        sprites: player_sprite_set(
            ImageHandle::new(assets::SPRITE_STAND_RIGHT, 10620, 400),
            ImageHandle::new(assets::SPRITE_STAND_LEFT, 10620, 400),
            ImageHandle::new(assets::SPRITE_RUN_RIGHT, 10230, 400),
            ImageHandle::new(assets::SPRITE_RUN_LEFT, 10230, 400),
        ),
    }
}

pub fn sample_world() -> World {
    World::new(sample_images(), PhysicsConfig::default())
}

pub fn sample_world_with_platform_width(platform_width: u32) -> World {
    World::new(
        sample_images_with_platform_width(platform_width),
        PhysicsConfig::default(),
    )
}
