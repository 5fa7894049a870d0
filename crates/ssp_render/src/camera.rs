use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Maps the logical canvas (origin top-left, y down) onto clip space.
///
/// The canvas keeps its logical extent regardless of window size; the
/// surface simply stretches it.
pub struct CanvasCamera {
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl CanvasCamera {
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            canvas_width,
            canvas_height,
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            0.0,
            self.canvas_width,
            self.canvas_height,
            0.0,
            -1.0,
            1.0,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection().to_cols_array_2d(),
        }
    }
}
