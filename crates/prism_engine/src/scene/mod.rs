//! Scene tree and debug export.

pub mod dot;
pub mod node;

pub use node::{
    node_count, walk, DirectionalLight, Geometry, Material, MeshData, NodeKind, SceneNode,
    SceneRef, ShaderSlot, TextureSlot,
};
