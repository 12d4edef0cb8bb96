//! Minimal scene graph: meshes, groups, point lights, and cameras stored in
//! slot lists and addressed by typed handles.
//!
//! Mesh geometry is shared through `Arc` so a caller can hold on to the
//! original buffer while the LOD controller swaps in decimated copies.

use std::sync::Arc;

use glam::Vec3;

use crate::camera::Camera;

/// Handle to a [`SceneNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

/// Handle to a [`PointLight`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(u32);

/// Handle to a [`Camera`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CameraId(u32);

/// Vertex positions of a mesh. Vertex count equals `positions.len()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
}

impl Geometry {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Flat square in the XZ plane centered on the origin with
    /// `(segments + 1)^2` evenly spaced vertices.
    pub fn plane(size: f32, segments: u32) -> Self {
        let segments = segments.max(1);
        let step = size / segments as f32;
        let half = size * 0.5;
        let positions = (0..=segments)
            .flat_map(|z| {
                (0..=segments).map(move |x| {
                    Vec3::new(x as f32 * step - half, 0.0, z as f32 * step - half)
                })
            })
            .collect();
        Self { positions }
    }
}

/// Roughness/metalness pair of a physically based material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PbrParams {
    pub roughness: f32,
    pub metalness: f32,
}

/// Surface parameters the LOD controller simplifies with distance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub wireframe: bool,
    pub flat_shading: bool,
    /// Present on physically based materials only.
    pub pbr: Option<PbrParams>,
    /// Set whenever a change requires the material to be rebuilt by the renderer.
    pub needs_update: bool,
}

impl Material {
    /// Unlit material without roughness/metalness.
    pub fn basic() -> Self {
        Self::default()
    }

    /// Physically based material.
    pub fn standard(roughness: f32, metalness: f32) -> Self {
        Self {
            pbr: Some(PbrParams {
                roughness,
                metalness,
            }),
            ..Self::default()
        }
    }
}

/// What a scene node renders.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Renderable mesh. Either part may be missing on a half-built node.
    Mesh {
        geometry: Option<Arc<Geometry>>,
        material: Option<Material>,
    },
    /// Transform-only node.
    Group,
}

/// One object in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub scale: Vec3,
    pub visible: bool,
    pub kind: NodeKind,
}

impl SceneNode {
    /// Visible mesh at the origin with unit scale.
    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::with_kind(
            name,
            NodeKind::Mesh {
                geometry: Some(Arc::new(geometry)),
                material: Some(material),
            },
        )
    }

    /// Empty transform node.
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            visible: true,
            kind,
        }
    }

    /// Builder-style position setter.
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }

    pub fn geometry(&self) -> Option<&Arc<Geometry>> {
        match &self.kind {
            NodeKind::Mesh { geometry, .. } => geometry.as_ref(),
            NodeKind::Group => None,
        }
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh { material, .. } => material.as_ref(),
            NodeKind::Group => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh { material, .. } => material.as_mut(),
            NodeKind::Group => None,
        }
    }

    /// Replace the geometry of a mesh node. No-op on groups.
    pub fn set_geometry(&mut self, new_geometry: Arc<Geometry>) {
        if let NodeKind::Mesh { geometry, .. } = &mut self.kind {
            *geometry = Some(new_geometry);
        }
    }

    /// Vertex count of the current geometry, or 0 without one.
    pub fn vertex_count(&self) -> usize {
        self.geometry().map_or(0, |g| g.vertex_count())
    }
}

/// Omnidirectional light.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Linear RGB color.
    pub color: Vec3,
    pub intensity: f32,
    /// Cutoff distance of the light's influence (0 = unlimited).
    pub distance: f32,
    pub visible: bool,
}

impl PointLight {
    /// White, visible light with unlimited reach.
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            color: Vec3::ONE,
            intensity,
            distance: 0.0,
            visible: true,
        }
    }
}

/// Owns every node, light, and camera. Removal leaves the slot empty so
/// handles are never reused.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
    lights: Vec<Option<PointLight>>,
    cameras: Vec<Option<Camera>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(Some(node));
        NodeId(self.nodes.len() as u32 - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    /// Take a node out of the scene; its handle stays dead afterwards.
    pub fn remove_node(&mut self, id: NodeId) -> Option<SceneNode> {
        self.nodes.get_mut(id.0 as usize)?.take()
    }

    /// Live nodes with their handles.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| Some((NodeId(i as u32), node.as_ref()?)))
    }

    pub fn add_light(&mut self, light: PointLight) -> LightId {
        self.lights.push(Some(light));
        LightId(self.lights.len() as u32 - 1)
    }

    pub fn light(&self, id: LightId) -> Option<&PointLight> {
        self.lights.get(id.0 as usize)?.as_ref()
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut PointLight> {
        self.lights.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn remove_light(&mut self, id: LightId) -> Option<PointLight> {
        self.lights.get_mut(id.0 as usize)?.take()
    }

    /// Live lights with their handles.
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &PointLight)> {
        self.lights
            .iter()
            .enumerate()
            .filter_map(|(i, light)| Some((LightId(i as u32), light.as_ref()?)))
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        self.cameras.push(Some(camera));
        CameraId(self.cameras.len() as u32 - 1)
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id.0 as usize)?.as_ref()
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn remove_camera(&mut self, id: CameraId) -> Option<Camera> {
        self.cameras.get_mut(id.0 as usize)?.take()
    }
}
