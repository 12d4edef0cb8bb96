//! Distance breakpoints and per-object LOD options.

/// One distance breakpoint: objects up to `distance` away render at `detail`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodLevel {
    pub distance: f32,
    /// Fraction of the original detail in `[0, 1]`.
    pub detail: f32,
}

impl LodLevel {
    pub const fn new(distance: f32, detail: f32) -> Self {
        Self { distance, detail }
    }
}

/// Breakpoints used for objects without custom levels.
pub const DEFAULT_LOD_LEVELS: [LodLevel; 5] = [
    LodLevel::new(10.0, 1.0),
    LodLevel::new(50.0, 0.75),
    LodLevel::new(100.0, 0.5),
    LodLevel::new(200.0, 0.25),
    LodLevel::new(500.0, 0.1),
];

/// Detail fraction for an object `distance` away.
///
/// Each threshold the distance strictly exceeds moves one level farther out,
/// so the result is the first level whose threshold is at least `distance`.
/// Beyond the last threshold the last level applies. An empty list means
/// full detail.
pub fn select_detail(levels: &[LodLevel], distance: f32) -> f32 {
    levels
        .iter()
        .find(|level| distance <= level.distance)
        .or(levels.last())
        .map_or(1.0, |level| level.detail)
}

/// How far the controller may degrade one object.
#[derive(Clone, Debug, PartialEq)]
pub struct LodOptions {
    pub min_scale: f32,
    pub max_scale: f32,
    pub min_detail: f32,
    pub max_detail: f32,
    /// Decimate geometry with distance.
    pub geometry_lod: bool,
    /// Simplify the material with distance.
    pub material_lod: bool,
    /// Replaces [`DEFAULT_LOD_LEVELS`] for this object.
    pub custom_levels: Option<Vec<LodLevel>>,
}

impl LodOptions {
    pub fn with_levels(levels: Vec<LodLevel>) -> Self {
        Self {
            custom_levels: Some(levels),
            ..Self::default()
        }
    }

    pub fn levels(&self) -> &[LodLevel] {
        self.custom_levels.as_deref().unwrap_or(&DEFAULT_LOD_LEVELS)
    }

    /// Detail at `distance`, clamped into `[min_detail, max_detail]`.
    pub fn detail_at(&self, distance: f32) -> f32 {
        select_detail(self.levels(), distance)
            .max(self.min_detail)
            .min(self.max_detail)
    }

    /// Uniform scale at `distance`, clamped into `[min_scale, max_scale]`.
    pub fn scale_at(&self, distance: f32) -> f32 {
        (1.0 / (1.0 + distance * 0.01))
            .max(self.min_scale)
            .min(self.max_scale)
    }
}

impl Default for LodOptions {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 1.0,
            min_detail: 0.1,
            max_detail: 1.0,
            geometry_lod: true,
            material_lod: true,
            custom_levels: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_levels_pick_next_level_past_threshold() {
        let levels = [LodLevel::new(10.0, 1.0), LodLevel::new(20.0, 0.5)];
        assert_eq!(select_detail(&levels, 15.0), 0.5);
        assert_eq!(select_detail(&levels, 5.0), 1.0);
        assert_eq!(select_detail(&levels, 10.0), 1.0);
        assert_eq!(select_detail(&levels, 500.0), 0.5);
    }

    #[test]
    fn test_default_levels() {
        assert_eq!(select_detail(&DEFAULT_LOD_LEVELS, 0.0), 1.0);
        assert_eq!(select_detail(&DEFAULT_LOD_LEVELS, 30.0), 0.75);
        assert_eq!(select_detail(&DEFAULT_LOD_LEVELS, 75.0), 0.5);
        assert_eq!(select_detail(&DEFAULT_LOD_LEVELS, 150.0), 0.25);
        assert_eq!(select_detail(&DEFAULT_LOD_LEVELS, 10_000.0), 0.1);
    }

    #[test]
    fn test_detail_never_increases_with_distance() {
        let mut previous = f32::INFINITY;
        for distance in (0..700).step_by(7) {
            let detail = select_detail(&DEFAULT_LOD_LEVELS, distance as f32);
            assert!(detail <= previous);
            previous = detail;
        }
    }

    #[test]
    fn test_empty_levels_mean_full_detail() {
        assert_eq!(select_detail(&[], 42.0), 1.0);
    }

    #[test]
    fn test_detail_is_clamped_by_options() {
        let options = LodOptions {
            min_detail: 0.3,
            max_detail: 0.6,
            ..LodOptions::default()
        };
        assert_eq!(options.detail_at(0.0), 0.6);
        assert_eq!(options.detail_at(1000.0), 0.3);
        assert_eq!(options.detail_at(75.0), 0.5);
    }

    #[test]
    fn test_scale_falls_off_with_distance() {
        let options = LodOptions::default();
        assert_eq!(options.scale_at(0.0), 1.0);
        assert!((options.scale_at(50.0) - 1.0 / 1.5).abs() < 1e-6);
        assert_eq!(options.scale_at(1000.0), 0.5);
    }

    #[test]
    fn test_custom_levels_replace_defaults() {
        let options = LodOptions::with_levels(vec![LodLevel::new(5.0, 0.8)]);
        assert_eq!(options.levels().len(), 1);
        assert_eq!(LodOptions::default().levels(), &DEFAULT_LOD_LEVELS);
    }
}
