//! Drawing-surface abstraction shared by game logic and the renderer.
//!
//! Game entities never talk to the GPU. They issue `fill_rect` / `draw_image`
//! calls against a [`Canvas`] in logical canvas units (origin top-left, y
//! down). The runtime implements `Canvas` by batching quads into a mesh; tests
//! implement it by recording the calls.

use std::sync::Arc;

use glam::Vec2;

/// Axis-aligned rectangle in canvas or pixel units, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Linear RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
}

/// Reference to a decoded raster image.
///
/// Cloning is cheap: the key is shared. A handle whose image failed to load
/// has zero dimensions; drawing it is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    key: Arc<str>,
    width: u32,
    height: u32,
}

impl ImageHandle {
    pub fn new(key: &str, width: u32, height: u32) -> Self {
        Self {
            key: Arc::from(key),
            width,
            height,
        }
    }

    /// Handle for an image that never decoded.
    pub fn missing(key: &str) -> Self {
        Self::new(key, 0, 0)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn shared_key(&self) -> Arc<str> {
        Arc::clone(&self.key)
    }

    /// Natural pixel width.
    pub fn width(&self) -> f32 {
        self.width as f32
    }

    /// Natural pixel height.
    pub fn height(&self) -> f32 {
        self.height as f32
    }

    pub fn is_loaded(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Fixed-size 2D drawing surface.
pub trait Canvas {
    /// Logical extent of the surface.
    fn size(&self) -> Vec2;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `image` into `dst`. `src` selects a pixel sub-rectangle of the
    /// image; `None` draws the whole image.
    fn draw_image(&mut self, image: &ImageHandle, src: Option<Rect>, dst: Rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_handle_reports_not_loaded() {
        let handle = ImageHandle::missing("hills");
        assert!(!handle.is_loaded());
        assert_eq!(handle.width(), 0.0);
        assert_eq!(handle.key(), "hills");
    }

    #[test]
    fn handles_with_same_key_and_size_compare_equal() {
        let a = ImageHandle::new("platform", 580, 125);
        let b = a.clone();
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.shared_key(), &b.shared_key()));
    }

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(
            Rect::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0)),
            rect
        );
    }
}
