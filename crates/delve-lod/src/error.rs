//! Registration failures reported by the LOD controller.

use delve_render::{CameraId, LightId, NodeId};

/// Why a controller refused a request. The controller state is left
/// untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LodError {
    #[error("camera {0:?} is not part of the scene")]
    MissingCamera(CameraId),

    #[error("node {0:?} is not part of the scene")]
    UnknownNode(NodeId),

    /// Only meshes carry geometry and material to simplify.
    #[error("node {0:?} is not a mesh")]
    NotAMesh(NodeId),

    #[error("mesh {0:?} has no geometry")]
    MissingGeometry(NodeId),

    #[error("mesh {0:?} has no material")]
    MissingMaterial(NodeId),

    #[error("light {0:?} is not part of the scene")]
    UnknownLight(LightId),

    /// A light belongs to exactly one chunk.
    #[error("light {0:?} is already registered")]
    LightAlreadyRegistered(LightId),
}
