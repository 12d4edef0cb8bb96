//! Scene-side collaborators of the LOD controller: camera, view frustum, and
//! a minimal scene graph of meshes and point lights behind typed handles.

mod camera;
mod frustum;
mod scene;

pub use camera::Camera;
pub use frustum::Frustum;
pub use scene::{
    CameraId, Geometry, LightId, Material, NodeId, NodeKind, PbrParams, PointLight, Scene,
    SceneNode,
};
