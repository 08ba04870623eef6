use glam::{Mat4, Vec3};

/// Right-handed perspective camera looking at the scene center.
///
/// Vertical position is written by the scroll handler, aspect by the resize
/// handler; everything else is fixed at startup.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera at its startup pose with the given viewport aspect ratio.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(15.0, 0.0, 30.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: 75.0_f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Combined view-projection matrix for the frame uniform.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio from new viewport dimensions.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }
}
