//! Per-camera LOD controller.
//!
//! Every frame [`LodController::update`] refreshes the camera frustum,
//! re-evaluates which chunks are active, culls registered meshes against the
//! frustum, and degrades the surviving ones by distance:
//!
//! - geometry is stride-decimated from the cached full-detail buffer, with a
//!   hysteresis on the vertex count so small distance changes do not rebuild it;
//! - materials switch to flat shading and then wireframe as detail drops, and
//!   physically based ones get rougher and less metallic;
//! - meshes shrink uniformly with distance.
//!
//! Point lights are bucketed into chunks with a fixed per-chunk budget. The
//! controller never owns scene entities; it only mutates them through the
//! [`Scene`] handed to each call.

use std::sync::Arc;

use delve_config::LodConfig;
use delve_render::{
    CameraId, Frustum, Geometry, LightId, Material, NodeId, NodeKind, Scene, SceneNode,
};
use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::chunk::{Chunk, ChunkKey};
use crate::decimate::{decimate, target_vertex_count};
use crate::error::LodError;
use crate::level::LodOptions;

/// Below this detail materials render as wireframe.
const WIREFRAME_DETAIL: f32 = 0.3;
/// Below this detail materials use flat shading.
const FLAT_SHADING_DETAIL: f32 = 0.5;

/// Snapshot of a registered mesh taken when it was added.
#[derive(Debug)]
struct TrackedObject {
    options: LodOptions,
    original_geometry: Arc<Geometry>,
    original_material: Material,
    original_scale: Vec3,
}

/// Counters describing the controller's last evaluated state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LodStats {
    pub tracked_objects: usize,
    pub visible_objects: usize,
    /// Tracked meshes currently rendering a reduced vertex buffer.
    pub decimated_objects: usize,
    pub active_chunks: usize,
    pub visible_lights: usize,
}

/// Distance- and frustum-driven detail control for one camera.
#[derive(Debug)]
pub struct LodController {
    camera: CameraId,
    config: LodConfig,
    frustum: Frustum,
    camera_position: Vec3,
    objects: FxHashMap<NodeId, TrackedObject>,
    chunks: FxHashMap<ChunkKey, Chunk>,
    object_chunks: FxHashMap<NodeId, ChunkKey>,
    light_chunks: FxHashMap<LightId, ChunkKey>,
    base_intensities: FxHashMap<LightId, f32>,
}

impl LodController {
    /// Controller for `camera`, which must already be part of `scene`.
    pub fn new(config: LodConfig, scene: &Scene, camera: CameraId) -> Result<Self, LodError> {
        let Some(view) = scene.camera(camera) else {
            log::warn!("Cannot create LOD controller: camera {camera:?} is not in the scene");
            return Err(LodError::MissingCamera(camera));
        };
        log::debug!(
            "LOD controller for {camera:?}: chunk size {}, range {}, {} lights per chunk",
            config.chunk_size,
            config.visibility_range,
            config.max_lights_per_chunk
        );
        Ok(Self {
            camera,
            frustum: view.frustum(),
            camera_position: view.position,
            config,
            objects: FxHashMap::default(),
            chunks: FxHashMap::default(),
            object_chunks: FxHashMap::default(),
            light_chunks: FxHashMap::default(),
            base_intensities: FxHashMap::default(),
        })
    }

    pub fn camera(&self) -> CameraId {
        self.camera
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    /// Change the per-chunk light budget. Chunks already over the new budget
    /// keep their lights until [`Self::optimize_lights_in_chunk`] runs.
    pub fn set_max_lights_per_chunk(&mut self, max: usize) {
        self.config.max_lights_per_chunk = max;
    }

    /// Start managing the mesh `node`.
    ///
    /// Its geometry, material, and scale are cached so [`Self::remove_object`]
    /// can put them back. Re-adding a tracked node only replaces its options.
    pub fn add_object(
        &mut self,
        scene: &Scene,
        node: NodeId,
        options: LodOptions,
    ) -> Result<(), LodError> {
        if let Some(tracked) = self.objects.get_mut(&node) {
            tracked.options = options;
            return Ok(());
        }

        let tracked = snapshot(scene, node, options).inspect_err(|err| {
            log::warn!("Ignoring LOD object: {err}");
        })?;
        self.objects.insert(node, tracked);
        Ok(())
    }

    /// Stop managing `node` and restore its registration-time geometry,
    /// material, and scale. Returns `false` if it was never added.
    pub fn remove_object(&mut self, scene: &mut Scene, node: NodeId) -> bool {
        let Some(tracked) = self.objects.remove(&node) else {
            return false;
        };
        if let Some(key) = self.object_chunks.remove(&node)
            && let Some(chunk) = self.chunks.get_mut(&key)
        {
            chunk.objects.remove(&node);
        }

        if let Some(target) = scene.node_mut(node) {
            target.set_geometry(tracked.original_geometry);
            if let Some(material) = target.material_mut() {
                *material = tracked.original_material;
            }
            target.scale = tracked.original_scale;
        }
        true
    }

    pub fn is_tracked(&self, node: NodeId) -> bool {
        self.objects.contains_key(&node)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Make `node` follow the visibility of the chunk at `key`, leaving any
    /// chunk it belonged to before.
    pub fn add_object_to_chunk(&mut self, node: NodeId, key: ChunkKey) {
        if let Some(previous) = self.object_chunks.insert(node, key)
            && previous != key
            && let Some(chunk) = self.chunks.get_mut(&previous)
        {
            chunk.objects.remove(&node);
        }
        self.get_chunk(key).objects.insert(node);
    }

    /// Chunk whose visibility `node` follows.
    pub fn object_chunk(&self, node: NodeId) -> Option<ChunkKey> {
        self.object_chunks.get(&node).copied()
    }

    /// The chunk at `key`, created empty and inactive on first access.
    pub fn get_chunk(&mut self, key: ChunkKey) -> &mut Chunk {
        self.chunks.entry(key).or_insert_with(|| Chunk::new(key))
    }

    /// The chunk at `key` if it has been created.
    pub fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(&key)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Chunk that owns `light`.
    pub fn light_chunk(&self, light: LightId) -> Option<ChunkKey> {
        self.light_chunks.get(&light).copied()
    }

    /// Assign `light` to the chunk at `key`.
    ///
    /// Returns `Ok(false)` when the chunk already holds its budget of lights.
    /// On success the light's current intensity becomes its base intensity and
    /// it is shown only if the chunk lies within the visibility range of the
    /// camera position seen by the last update.
    pub fn add_light(
        &mut self,
        scene: &mut Scene,
        light: LightId,
        key: ChunkKey,
    ) -> Result<bool, LodError> {
        if self.light_chunks.contains_key(&light) {
            log::warn!("Light {light:?} already belongs to chunk {:?}", self.light_chunks[&light]);
            return Err(LodError::LightAlreadyRegistered(light));
        }
        let Some(point) = scene.light_mut(light) else {
            log::warn!("Ignoring unknown light {light:?}");
            return Err(LodError::UnknownLight(light));
        };

        let max = self.config.max_lights_per_chunk;
        let chunk = self.chunks.entry(key).or_insert_with(|| Chunk::new(key));
        if chunk.lights.len() >= max {
            log::debug!("Chunk ({}, {}) is full ({max} lights)", key.x, key.z);
            return Ok(false);
        }
        chunk.lights.insert(light);
        self.light_chunks.insert(light, key);
        self.base_intensities.insert(light, point.intensity);

        let size = self.config.chunk_size;
        let chunk_distance = key.center(size).distance(self.camera_position) / size;
        point.visible = chunk_distance <= self.config.visibility_range / size;
        Ok(true)
    }

    /// Release `light` from its chunk and restore its base intensity.
    /// Returns `false` if it was never added.
    pub fn remove_light(&mut self, scene: &mut Scene, light: LightId) -> bool {
        let Some(key) = self.light_chunks.remove(&light) else {
            return false;
        };
        if let Some(chunk) = self.chunks.get_mut(&key) {
            chunk.lights.remove(&light);
        }
        if let Some(base) = self.base_intensities.remove(&light)
            && let Some(point) = scene.light_mut(light)
        {
            point.intensity = base;
        }
        true
    }

    /// Mark the chunk at `key` active or inactive. No-op if unchanged.
    ///
    /// Member objects take the new flag as their visibility. Member lights
    /// instead follow the chunk's real distance from the camera: within the
    /// visibility range they stay lit at 50% to 100% of their base intensity
    /// (brighter when closer), beyond it they switch off.
    pub fn set_chunk_visibility(&mut self, scene: &mut Scene, key: ChunkKey, visible: bool) {
        let chunk = self.chunks.entry(key).or_insert_with(|| Chunk::new(key));
        if chunk.active == visible {
            return;
        }
        chunk.active = visible;

        let range = self.config.visibility_range;
        let distance = key.center(self.config.chunk_size).distance(self.camera_position);
        let in_range = distance <= range;
        let falloff = 1.0 - (distance / range).min(1.0);

        for light in &chunk.lights {
            let Some(point) = scene.light_mut(*light) else {
                continue;
            };
            point.visible = in_range;
            if in_range && let Some(base) = self.base_intensities.get(light) {
                point.intensity = base * (falloff * 0.5 + 0.5);
            }
        }
        for object in &chunk.objects {
            if let Some(node) = scene.node_mut(*object) {
                node.visible = visible;
            }
        }
    }

    /// Keep only the brightest lights of the chunk at `key` within the
    /// per-chunk budget; the rest are switched off and released. Returns the
    /// number of evicted lights.
    pub fn optimize_lights_in_chunk(&mut self, scene: &mut Scene, key: ChunkKey) -> usize {
        let max = self.config.max_lights_per_chunk;
        let Some(chunk) = self.chunks.get_mut(&key) else {
            return 0;
        };
        if chunk.lights.len() <= max {
            return 0;
        }

        let mut ranked: Vec<(LightId, f32)> = chunk
            .lights
            .iter()
            .map(|&id| (id, scene.light(id).map_or(0.0, |l| l.intensity)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let evicted = ranked.split_off(max);

        for (id, _) in &evicted {
            chunk.lights.remove(id);
            self.light_chunks.remove(id);
            self.base_intensities.remove(id);
            if let Some(point) = scene.light_mut(*id) {
                point.visible = false;
            }
        }
        log::debug!(
            "Evicted {} dim lights from chunk ({}, {})",
            evicted.len(),
            key.x,
            key.z
        );
        evicted.len()
    }

    /// Re-evaluate chunk activity and the detail of every tracked mesh.
    ///
    /// Tracked nodes that have since left the scene are skipped.
    pub fn update(&mut self, scene: &mut Scene) -> Result<(), LodError> {
        let Some(view) = scene.camera(self.camera) else {
            log::warn!("Skipping LOD update: camera {:?} left the scene", self.camera);
            return Err(LodError::MissingCamera(self.camera));
        };
        self.frustum = view.frustum();
        self.camera_position = view.position;

        let size = self.config.chunk_size;
        let range = self.config.visibility_range;
        let keys: Vec<ChunkKey> = self.chunks.keys().copied().collect();
        for key in keys {
            let center = key.center(size);
            let active = self.frustum.contains_point(center)
                && center.distance(self.camera_position) <= range;
            self.set_chunk_visibility(scene, key, active);
        }

        for (&id, tracked) in &self.objects {
            if let Some(node) = scene.node_mut(id) {
                self.update_object(id, node, tracked);
            }
        }
        Ok(())
    }

    fn update_object(&self, id: NodeId, node: &mut SceneNode, tracked: &TrackedObject) {
        // Objects in an inactive chunk stay hidden even inside the frustum.
        let chunk_active = self
            .object_chunks
            .get(&id)
            .and_then(|key| self.chunks.get(key))
            .is_none_or(|chunk| chunk.active);
        if !chunk_active || !self.frustum.contains_point(node.position) {
            node.visible = false;
            return;
        }
        node.visible = true;

        let distance = node.position.distance(self.camera_position);
        let detail = tracked.options.detail_at(distance);

        if tracked.options.geometry_lod {
            let target = target_vertex_count(tracked.original_geometry.vertex_count(), detail);
            let current = node.vertex_count();
            let change = if current == 0 {
                1.0
            } else {
                target.abs_diff(current) as f32 / current as f32
            };
            if change > self.config.geometry_hysteresis {
                log::trace!("{}: {current} -> {target} vertices", node.name);
                node.set_geometry(decimate(&tracked.original_geometry, target));
            }
        }

        if tracked.options.material_lod
            && let Some(material) = node.material_mut()
        {
            simplify_material(material, detail);
        }

        node.scale = Vec3::splat(tracked.options.scale_at(distance));
    }

    /// Counters for the current state of tracked objects, chunks, and lights.
    pub fn stats(&self, scene: &Scene) -> LodStats {
        let mut stats = LodStats {
            tracked_objects: self.objects.len(),
            active_chunks: self.chunks.values().filter(|c| c.active).count(),
            ..LodStats::default()
        };
        for (id, tracked) in &self.objects {
            let Some(node) = scene.node(*id) else {
                continue;
            };
            if node.visible {
                stats.visible_objects += 1;
            }
            if node
                .geometry()
                .is_some_and(|g| !Arc::ptr_eq(g, &tracked.original_geometry))
            {
                stats.decimated_objects += 1;
            }
        }
        stats.visible_lights = self
            .light_chunks
            .keys()
            .filter_map(|id| scene.light(*id))
            .filter(|light| light.visible)
            .count();
        stats
    }
}

fn snapshot(scene: &Scene, id: NodeId, options: LodOptions) -> Result<TrackedObject, LodError> {
    let node = scene.node(id).ok_or(LodError::UnknownNode(id))?;
    let NodeKind::Mesh { geometry, material } = &node.kind else {
        return Err(LodError::NotAMesh(id));
    };
    let geometry = geometry.as_ref().ok_or(LodError::MissingGeometry(id))?;
    let material = material.as_ref().ok_or(LodError::MissingMaterial(id))?;
    Ok(TrackedObject {
        options,
        original_geometry: Arc::clone(geometry),
        original_material: material.clone(),
        original_scale: node.scale,
    })
}

fn simplify_material(material: &mut Material, detail: f32) {
    let wireframe = detail < WIREFRAME_DETAIL;
    let flat_shading = detail < FLAT_SHADING_DETAIL;
    let mut changed = material.wireframe != wireframe || material.flat_shading != flat_shading;
    material.wireframe = wireframe;
    material.flat_shading = flat_shading;

    if let Some(pbr) = &mut material.pbr {
        let roughness = (1.5 - detail).min(1.0);
        changed |= pbr.roughness != roughness || pbr.metalness != detail;
        pbr.roughness = roughness;
        pbr.metalness = detail;
    }

    if changed {
        material.needs_update = true;
    }
}
