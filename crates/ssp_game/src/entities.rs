//! Static image entities: platforms the player stands on and background layers.
//!
//! Both take their size from the image's natural pixel dimensions and never
//! change it. Only the scroll step moves them. Each keeps its layout x as an
//! anchor and is placed from the total scroll offset (platforms at the full
//! offset, background layers at a parallax fraction of it), so repeated
//! scrolling never accumulates rounding error.

use glam::Vec2;
use ssp_core::surface::{Canvas, ImageHandle, Rect};

#[derive(Debug, Clone)]
pub struct Platform {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    anchor_x: f32,
    image: ImageHandle,
}

impl Platform {
    pub fn new(x: f32, y: f32, image: ImageHandle) -> Self {
        Self {
            position: Vec2::new(x, y),
            width: image.width(),
            height: image.height(),
            anchor_x: x,
            image,
        }
    }

    #[cfg(test)]
    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    /// Place the platform for a level scrolled by `scroll_offset`.
    pub fn follow_scroll(&mut self, scroll_offset: f32) {
        self.position.x = self.anchor_x - scroll_offset;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let dst = Rect::from_pos_size(self.position, Vec2::new(self.width, self.height));
        canvas.draw_image(&self.image, None, dst);
    }
}

/// A parallax layer drawn behind the platforms.
#[derive(Debug, Clone)]
pub struct BackgroundElement {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    anchor_x: f32,
    image: ImageHandle,
}

impl BackgroundElement {
    pub fn new(x: f32, y: f32, image: ImageHandle) -> Self {
        Self {
            position: Vec2::new(x, y),
            width: image.width(),
            height: image.height(),
            anchor_x: x,
            image,
        }
    }

    #[cfg(test)]
    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    /// Place the layer for a level scrolled by `scroll_offset`.
    pub fn follow_scroll(&mut self, scroll_offset: f32, parallax: f32) {
        self.position.x = self.anchor_x - scroll_offset * parallax;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let dst = Rect::from_pos_size(self.position, Vec2::new(self.width, self.height));
        canvas.draw_image(&self.image, None, dst);
    }
}
