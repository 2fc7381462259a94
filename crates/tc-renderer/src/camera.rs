//! Camera uniform for gizmo shaders

use bytemuck::{Pod, Zeroable};
use tc_core::Camera;

/// Camera uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection times view
    pub view_proj: [[f32; 4]; 4],
    /// World to view transform
    pub view: [[f32; 4]; 4],
    /// View to clip transform
    pub proj: [[f32; 4]; 4],
    /// Camera position (w = 1)
    pub eye: [f32; 4],
}

impl CameraUniform {
    /// Build the uniform for a camera
    pub fn from_camera(camera: &Camera) -> Self {
        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        let view_proj = proj * view;

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            eye: camera.position.extend(1.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{Mat4, Vec3, Vec4};

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = Camera::perspective(50.0, 1.5, 0.1, 100.0);
        camera.look_at(Vec3::new(2.0, 3.0, 4.0), Vec3::ZERO);
        let uniform = CameraUniform::from_camera(&camera);

        let clip = Mat4::from_cols_array_2d(&uniform.view_proj) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        assert_eq!(uniform.eye, [2.0, 3.0, 4.0, 1.0]);
    }
}
