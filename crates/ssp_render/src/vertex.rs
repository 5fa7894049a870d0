#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

/// Two triangles over the four vertices produced by [`SpriteVertex::quad`].
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

impl SpriteVertex {
    /// Corners of a canvas-space rectangle `[x, y, w, h]` in the order
    /// top-left, top-right, bottom-right, bottom-left. `uv` is `[u0, v0, u1, v1]`
    /// with `v0` at the top edge.
    pub fn quad(rect: [f32; 4], uv: [f32; 4], color: [f32; 4]) -> [SpriteVertex; 4] {
        let [x, y, w, h] = rect;
        let [u0, v0, u1, v1] = uv;
        [
            SpriteVertex {
                position: [x, y],
                tex_coords: [u0, v0],
                color,
            },
            SpriteVertex {
                position: [x + w, y],
                tex_coords: [u1, v0],
                color,
            },
            SpriteVertex {
                position: [x + w, y + h],
                tex_coords: [u1, v1],
                color,
            },
            SpriteVertex {
                position: [x, y + h],
                tex_coords: [u0, v1],
                color,
            },
        ]
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, color) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
