//! Turns a generated layout into scene content and registers it with a LOD
//! controller.

use delve_config::{DemoConfig, LodConfig};
use delve_lod::{ChunkKey, LodController, LodError, LodOptions};
use delve_mapgen::{CellKind, DungeonMap, Structure};
use delve_render::{Camera, CameraId, Geometry, Material, PointLight, Scene, SceneNode};
use glam::Vec3;

/// Height of room lights above the floor.
const LIGHT_HEIGHT: f32 = 3.0;

/// Scene content derived from one [`DungeonMap`].
pub struct DungeonScene {
    pub scene: Scene,
    pub camera: CameraId,
    /// World-space center of the hub floor; the camera orbits around it.
    pub focus: Vec3,
}

/// Counts of what [`DungeonScene::register`] handed to the controller.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Registration {
    pub objects: usize,
    pub lights: usize,
    /// Lights turned away because their chunk was full.
    pub rejected_lights: usize,
}

/// World-space position of the center of grid cell `(x, y)`.
fn cell_to_world(x: f32, y: f32, tile_size: f32) -> Vec3 {
    Vec3::new(x * tile_size, 0.0, y * tile_size)
}

fn structure_center(structure: &Structure, tile_size: f32) -> Vec3 {
    let rect = structure.rect;
    cell_to_world(
        rect.x as f32 + (rect.width - 1) as f32 * 0.5,
        rect.y as f32 + (rect.height - 1) as f32 * 0.5,
        tile_size,
    )
}

fn floor_material(kind: CellKind) -> Material {
    match kind {
        CellKind::Hub => Material::standard(0.3, 0.6),
        CellKind::Room => Material::standard(0.6, 0.2),
        CellKind::Hall | CellKind::AltHall | CellKind::Empty => Material::basic(),
    }
}

impl DungeonScene {
    /// One floor tile per non-empty cell, one light per room or hub, and a
    /// camera looking at the hub.
    pub fn build(map: &DungeonMap, demo: &DemoConfig) -> Self {
        let mut scene = Scene::new();
        let tile_size = demo.tile_size;

        for cell in map.grid().cells().filter(|c| c.kind != CellKind::Empty) {
            let position = cell_to_world(cell.x as f32, cell.y as f32, tile_size);
            let node = SceneNode::mesh(
                format!("{:?}({}, {})", cell.kind, cell.x, cell.y),
                Geometry::plane(tile_size, demo.tile_segments),
                floor_material(cell.kind),
            )
            .at(position);
            scene.add_node(node);
        }

        for room in map.rooms() {
            let position = structure_center(room, tile_size) + Vec3::Y * LIGHT_HEIGHT;
            let mut light = PointLight::new(position, demo.light_intensity);
            light.distance = tile_size * 8.0;
            scene.add_light(light);
        }

        let focus = map
            .hub()
            .map(|hub| structure_center(hub, tile_size))
            .unwrap_or(Vec3::ZERO);
        let camera = scene.add_camera(Camera::looking_at(orbit_position(focus, demo, 0.0), focus));

        Self {
            scene,
            camera,
            focus,
        }
    }

    /// Hand every mesh and light in the scene to `lod`, bucketed by the chunk
    /// holding it.
    pub fn register(
        &mut self,
        lod: &mut LodController,
        config: &LodConfig,
    ) -> Result<Registration, LodError> {
        let mut registration = Registration::default();

        let tiles: Vec<_> = self
            .scene
            .nodes()
            .filter(|(_, node)| node.is_mesh())
            .map(|(id, node)| (id, node.position))
            .collect();
        for (tile, position) in tiles {
            lod.add_object(&self.scene, tile, LodOptions::default())?;
            lod.add_object_to_chunk(tile, ChunkKey::from_world(position, config.chunk_size));
            registration.objects += 1;
        }

        let mut lit_chunks = Vec::new();
        let lights: Vec<_> = self
            .scene
            .lights()
            .map(|(id, light)| (id, light.position))
            .collect();
        for (light, position) in lights {
            let key = ChunkKey::from_world(position, config.chunk_size);
            if lod.add_light(&mut self.scene, light, key)? {
                registration.lights += 1;
                lit_chunks.push(key);
            } else {
                registration.rejected_lights += 1;
            }
        }

        lit_chunks.sort();
        lit_chunks.dedup();
        for key in lit_chunks {
            lod.optimize_lights_in_chunk(&mut self.scene, key);
        }
        Ok(registration)
    }

    /// Move the camera to `angle` radians along its orbit and face the focus.
    pub fn orbit_camera(&mut self, demo: &DemoConfig, angle: f32) {
        let position = orbit_position(self.focus, demo, angle);
        if let Some(camera) = self.scene.camera_mut(self.camera) {
            camera.position = position;
            camera.look_at(self.focus);
        }
    }
}

fn orbit_position(focus: Vec3, demo: &DemoConfig, angle: f32) -> Vec3 {
    focus
        + Vec3::new(
            angle.cos() * demo.orbit_radius,
            demo.camera_height,
            angle.sin() * demo.orbit_radius,
        )
}
