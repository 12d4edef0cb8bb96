//! One [`LodController`] per camera.

use delve_config::LodConfig;
use delve_render::{CameraId, Scene};
use rustc_hash::FxHashMap;

use crate::controller::LodController;
use crate::error::LodError;

/// Controllers keyed by the camera they serve. Asking twice for the same
/// camera hands back the controller created the first time.
#[derive(Debug, Default)]
pub struct LodRegistry {
    controllers: FxHashMap<CameraId, LodController>,
}

impl LodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The controller for `camera`, created with `config` on first request.
    /// Later requests ignore `config`.
    pub fn get_or_create(
        &mut self,
        camera: CameraId,
        scene: &Scene,
        config: &LodConfig,
    ) -> Result<&mut LodController, LodError> {
        if !self.controllers.contains_key(&camera) {
            let controller = LodController::new(config.clone(), scene, camera)?;
            self.controllers.insert(camera, controller);
        }
        self.controllers
            .get_mut(&camera)
            .ok_or(LodError::MissingCamera(camera))
    }

    pub fn get(&self, camera: CameraId) -> Option<&LodController> {
        self.controllers.get(&camera)
    }

    pub fn get_mut(&mut self, camera: CameraId) -> Option<&mut LodController> {
        self.controllers.get_mut(&camera)
    }

    /// Drop the controller for `camera`; the next request builds a fresh one.
    pub fn remove(&mut self, camera: CameraId) -> Option<LodController> {
        self.controllers.remove(&camera)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_render::Camera;

    #[test]
    fn test_same_camera_returns_same_controller() {
        let mut scene = Scene::new();
        let camera = scene.add_camera(Camera::default());
        let mut registry = LodRegistry::new();
        let config = LodConfig::default();

        registry
            .get_or_create(camera, &scene, &config)
            .unwrap()
            .set_max_lights_per_chunk(3);

        let other = LodConfig {
            max_lights_per_chunk: 16,
            ..LodConfig::default()
        };
        let again = registry.get_or_create(camera, &scene, &other).unwrap();
        assert_eq!(again.config().max_lights_per_chunk, 3);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_one_controller_per_camera() {
        let mut scene = Scene::new();
        let first = scene.add_camera(Camera::default());
        let second = scene.add_camera(Camera::default());
        let mut registry = LodRegistry::new();
        let config = LodConfig::default();

        assert_eq!(registry.get_or_create(first, &scene, &config).unwrap().camera(), first);
        assert_eq!(registry.get_or_create(second, &scene, &config).unwrap().camera(), second);
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(first).is_some());
        assert!(registry.get(first).is_none());
        assert!(registry.get_mut(second).is_some());
    }

    #[test]
    fn test_missing_camera_creates_nothing() {
        let mut scene = Scene::new();
        let camera = scene.add_camera(Camera::default());
        scene.remove_camera(camera);
        let mut registry = LodRegistry::new();

        let result = registry.get_or_create(camera, &scene, &LodConfig::default());
        assert_eq!(result.unwrap_err(), LodError::MissingCamera(camera));
        assert!(registry.is_empty());
    }
}
