//! View frustum extracted from a view-projection matrix, with a point
//! containment test.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::Camera;

const LEFT: usize = 0;
const RIGHT: usize = 1;
const BOTTOM: usize = 2;
const TOP: usize = 3;
const NEAR: usize = 4;
const FAR: usize = 5;

/// Six inward-facing planes `(a, b, c, d)` with unit normals: a point `p`
/// is on the inner side of a plane when `a*x + b*y + c*z + d >= 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract planes (Gribb-Hartmann) from a projection × view matrix whose
    /// clip-space depth range is `[0, w]`.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let mut planes = [Vec4::ZERO; 6];
        planes[LEFT] = rows[3] + rows[0];
        planes[RIGHT] = rows[3] - rows[0];
        planes[BOTTOM] = rows[3] + rows[1];
        planes[TOP] = rows[3] - rows[1];
        planes[NEAR] = rows[2];
        planes[FAR] = rows[3] - rows[2];

        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    /// Frustum of `camera`'s current pose and projection.
    pub fn from_camera(camera: &Camera) -> Self {
        Self::from_view_projection(&camera.view_projection_matrix())
    }

    /// The planes in left, right, bottom, top, near, far order.
    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    /// `true` if `point` is inside or on the boundary of the frustum.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(point) + plane.w >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_frustum() -> Frustum {
        Camera::default().frustum()
    }

    #[test]
    fn test_point_in_front_is_inside() {
        assert!(default_frustum().contains_point(Vec3::new(0.0, 0.0, -10.0)));
        assert!(default_frustum().contains_point(Vec3::new(1.0, -1.0, -5.0)));
    }

    #[test]
    fn test_point_behind_camera_is_outside() {
        assert!(!default_frustum().contains_point(Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_all_six_planes_reject() {
        let frustum = default_frustum();
        // Far left, right, above, below.
        assert!(!frustum.contains_point(Vec3::new(-1000.0, 0.0, -5.0)));
        assert!(!frustum.contains_point(Vec3::new(1000.0, 0.0, -5.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 1000.0, -5.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, -1000.0, -5.0)));
        // Closer than the near plane and beyond the far plane.
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -0.01)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -2000.0)));
    }

    #[test]
    fn test_follows_camera_pose() {
        let camera = Camera::looking_at(Vec3::new(0.0, 20.0, 0.0), Vec3::new(0.0, 0.0, 0.0));
        let frustum = camera.frustum();
        assert!(frustum.contains_point(Vec3::ZERO));
        assert!(!frustum.contains_point(Vec3::new(0.0, 40.0, 0.0)));
    }

    #[test]
    fn test_planes_are_normalized() {
        for plane in default_frustum().planes() {
            let len = plane.truncate().length();
            assert!((len - 1.0).abs() < 1e-4, "plane normal not normalized: {len}");
        }
    }
}
