//! CPU-side mesh building for one rendered frame.
//!
//! `FrameBuilder` is the runtime [`Canvas`]: every fill or image blit becomes
//! a textured quad, and consecutive quads that share a texture are merged
//! into a single draw call. Fills sample a 1x1 white texture tinted by the
//! vertex color.

use std::collections::HashSet;
use std::sync::Arc;

use glam::Vec2;
use ssp_core::surface::{Canvas, Color, ImageHandle, Rect};
use ssp_render::{SpriteVertex, QUAD_INDICES};

/// Texture key of the built-in 1x1 white texture used for solid fills.
pub const SOLID_FILL: &str = "__solid_fill";

const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

pub struct FrameMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl FrameMesh {
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

pub struct FrameBuilder<'a> {
    size: Vec2,
    textures: &'a HashSet<Arc<str>>,
    solid_fill: Arc<str>,
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,
}

impl<'a> FrameBuilder<'a> {
    /// `textures` lists the keys that have a GPU texture; images with any
    /// other key are skipped.
    pub fn new(size: Vec2, textures: &'a HashSet<Arc<str>>) -> Self {
        Self {
            size,
            textures,
            solid_fill: Arc::from(SOLID_FILL),
            vertices: Vec::with_capacity(64),
            indices: Vec::with_capacity(96),
            draw_calls: Vec::with_capacity(16),
        }
    }

    pub fn finish(self) -> FrameMesh {
        FrameMesh {
            vertices: self.vertices,
            indices: self.indices,
            draw_calls: self.draw_calls,
        }
    }

    fn add_quad(&mut self, texture_key: Arc<str>, rect: Rect, uv: [f32; 4], color: [f32; 4]) {
        let base_index = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&SpriteVertex::quad(
            [rect.x, rect.y, rect.w, rect.h],
            uv,
            color,
        ));

        let draw_start = self.indices.len() as u32;
        self.indices
            .extend(QUAD_INDICES.iter().map(|index| base_index + index));
        push_draw_call(&mut self.draw_calls, texture_key, draw_start, 6);
    }
}

impl Canvas for FrameBuilder<'_> {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let key = Arc::clone(&self.solid_fill);
        self.add_quad(key, rect, FULL_UV, color.0);
    }

    fn draw_image(&mut self, image: &ImageHandle, src: Option<Rect>, dst: Rect) {
        if !image.is_loaded() || !self.textures.contains(image.key()) {
            return;
        }
        let uv = match src {
            Some(src) => source_uv(src, image.width(), image.height()),
            None => FULL_UV,
        };
        self.add_quad(image.shared_key(), dst, uv, Color::WHITE.0);
    }
}

/// Normalise a pixel source rectangle against the image's natural size.
pub fn source_uv(src: Rect, image_width: f32, image_height: f32) -> [f32; 4] {
    [
        src.x / image_width,
        src.y / image_height,
        src.right() / image_width,
        src.bottom() / image_height,
    ]
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

pub fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0usize;
    let mut current: Option<&str> = None;
    for draw in draw_calls {
        let key: &str = &draw.texture_key;
        if current != Some(key) {
            current = Some(key);
            binds += 1;
        }
    }
    binds
}
