//! Uniform stride decimation of vertex buffers.

use std::sync::Arc;

use delve_render::Geometry;

/// Decimation never goes below this many vertices.
pub const MIN_DECIMATED_VERTICES: usize = 4;

/// Vertex count `original` should be reduced to at `detail`.
///
/// Meshes at or below [`MIN_DECIMATED_VERTICES`] keep every vertex; the
/// target never exceeds `original`.
pub fn target_vertex_count(original: usize, detail: f32) -> usize {
    if original <= MIN_DECIMATED_VERTICES {
        return original;
    }
    let scaled = (original as f32 * detail).floor().max(0.0) as usize;
    scaled.clamp(MIN_DECIMATED_VERTICES, original)
}

/// Geometry with `target` vertices sampled every `original / target`-th
/// vertex of `original`.
///
/// Always samples the full-detail buffer, so repeated calls never compound.
/// When no reduction is needed the original `Arc` is returned unchanged.
pub fn decimate(original: &Arc<Geometry>, target: usize) -> Arc<Geometry> {
    let count = original.vertex_count();
    let target = target.max(MIN_DECIMATED_VERTICES);
    if count <= MIN_DECIMATED_VERTICES || target >= count {
        return Arc::clone(original);
    }

    let stride = count / target;
    let positions = (0..target)
        .map(|i| original.positions[(i * stride).min(count - 1)])
        .collect();
    Arc::new(Geometry::new(positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn line(count: usize) -> Arc<Geometry> {
        Arc::new(Geometry::new(
            (0..count).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
        ))
    }

    #[test]
    fn test_stride_sampling() {
        let decimated = decimate(&line(100), 25);
        assert_eq!(decimated.vertex_count(), 25);
        assert_eq!(decimated.positions[0].x, 0.0);
        assert_eq!(decimated.positions[1].x, 4.0);
        assert_eq!(decimated.positions[24].x, 96.0);
    }

    #[test]
    fn test_uneven_stride_produces_exact_count() {
        let decimated = decimate(&line(10), 4);
        assert_eq!(decimated.vertex_count(), 4);
        let xs: Vec<f32> = decimated.positions.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_minimum_four_vertices() {
        assert_eq!(decimate(&line(81), 1).vertex_count(), 4);
        assert_eq!(target_vertex_count(81, 0.01), 4);
    }

    #[test]
    fn test_no_reduction_returns_same_buffer() {
        let original = line(50);
        assert!(Arc::ptr_eq(&decimate(&original, 50), &original));
        assert!(Arc::ptr_eq(&decimate(&original, 80), &original));

        let tiny = line(3);
        assert!(Arc::ptr_eq(&decimate(&tiny, 1), &tiny));
    }

    #[test]
    fn test_target_vertex_count() {
        assert_eq!(target_vertex_count(81, 1.0), 81);
        assert_eq!(target_vertex_count(81, 0.5), 40);
        assert_eq!(target_vertex_count(81, 0.1), 8);
        assert_eq!(target_vertex_count(3, 0.1), 3);
        assert_eq!(target_vertex_count(10, 2.0), 10);
    }
}
