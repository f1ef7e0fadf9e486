use glam::{Mat3, Mat4, Quat, Vec3};

/// Orthographic camera placement produced by the framer.
///
/// The camera looks down its local -Z axis with local +Y as image up.
/// `ortho_scale` is the full side length of the square view volume in world
/// units, so the frustum half-width is `ortho_scale / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub rotation: Quat,
    pub ortho_scale: f32,
}

impl CameraFrame {
    /// Orients a camera at `position` toward `target`, resolving roll with `up`.
    ///
    /// `up` must not be parallel to the viewing direction.
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3, ortho_scale: f32) -> Self {
        let forward = (target - position).normalize();
        let right = forward.cross(up).normalize();
        let camera_up = right.cross(forward);
        let rotation = Quat::from_mat3(&Mat3::from_cols(right, camera_up, -forward)).normalize();
        Self { position, rotation, ortho_scale }
    }

    pub fn world_from_camera(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// The view matrix.
    pub fn camera_from_world(&self) -> Mat4 {
        self.world_from_camera().inverse()
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn half_extent(&self) -> f32 {
        self.ortho_scale * 0.5
    }

    /// Maps world space to the normalized image plane.
    ///
    /// x and y land in [-1, 1] inside the view volume (+y up); z is the
    /// distance in front of the camera along its forward axis.
    pub fn ndc_from_world(&self) -> Mat4 {
        let inv = 1.0 / self.half_extent();
        Mat4::from_scale(Vec3::new(inv, inv, -1.0)) * self.camera_from_world()
    }

    pub fn project_ndc(&self, point: Vec3) -> Vec3 {
        self.ndc_from_world().transform_point3(point)
    }
}
