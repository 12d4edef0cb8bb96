//! Perspective camera: world transform, inverse-world (view) and projection matrices.

use glam::{Mat4, Quat, Vec3};

use crate::frustum::Frustum;

/// A perspective camera placed in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Orientation as a unit quaternion; identity looks down -Z with +Y up.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip distance (positive).
    pub near: f32,
    /// Far clip distance (positive, > near).
    pub far: f32,
}

impl Camera {
    /// Default camera at `position` oriented towards `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            ..Self::default()
        };
        camera.look_at(target);
        camera
    }

    /// The camera's world transform (rotation then translation).
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Inverse of the world transform.
    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    /// Right-handed perspective projection with depth mapped to `[0, 1]`.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    /// Projection × inverse-world.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Frustum for the camera's current pose and projection.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_camera(self)
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Turn the camera to face `target`. A target at the camera position is ignored.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        // Looking straight up or down: +Y cannot serve as the up hint.
        let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let world = Mat4::look_at_rh(self.position, target, up).inverse();
        self.rotation = Quat::from_mat4(&world).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let forward = Camera::default().forward();
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_look_at_faces_target() {
        let camera = Camera::looking_at(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO);
        let expected = Vec3::new(0.0, -1.0, -1.0).normalize();
        assert!((camera.forward() - expected).length() < 1e-4);
        assert!(camera.up().y > 0.0);
    }

    #[test]
    fn test_look_straight_down() {
        let camera = Camera::looking_at(Vec3::new(0.0, 50.0, 0.0), Vec3::ZERO);
        assert!((camera.forward() - Vec3::NEG_Y).length() < 1e-4);
    }

    #[test]
    fn test_look_at_own_position_keeps_rotation() {
        let mut camera = Camera::default();
        camera.look_at(Vec3::ZERO);
        assert_eq!(camera.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_view_matrix_inverts_world() {
        let camera = Camera {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let reconstructed = camera.view_matrix().inverse().col(3).truncate();
        assert!((reconstructed - camera.position).length() < 1e-4);
        let origin = camera.view_matrix().transform_point3(camera.position);
        assert!(origin.length() < 1e-4);
    }

    #[test]
    fn test_view_projection_combines_correctly() {
        let camera = Camera::looking_at(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO);
        let expected = camera.projection_matrix() * camera.view_matrix();
        assert!(camera.view_projection_matrix().abs_diff_eq(expected, 1e-6));
    }

}
