//! Scene graph nodes
//!
//! A deliberately small tree: the bootstrap layer only needs enough structure
//! to own a default scene (group root plus one directional light), to let the
//! texture and shader loaders find materials, and to host debug geometry.
//! Traversal acceleration and rendering semantics live with the renderer's
//! collaborators, not here.

use nalgebra::{Point3, Vector3};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::resources::types::{ShaderSource, TextureData};

/// Shared handle to a scene node.
pub type SceneRef = Rc<RefCell<SceneNode>>;

/// A directional light: parallel rays along `direction`.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// Direction the light travels in (not towards the light).
    pub direction: Vector3<f32>,
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.0, -1.0, -1.0),
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// Reference to an on-disk texture plus its decoded pixels once loaded.
#[derive(Debug, Clone)]
pub struct TextureSlot {
    /// Path, resolved against the resource search path at load time.
    pub path: PathBuf,
    /// Decoded pixels; `None` until a texture loader scan fills it.
    pub data: Option<TextureData>,
}

impl TextureSlot {
    /// An unloaded slot for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: None,
        }
    }
}

/// Reference to a shader pair plus its source once loaded.
#[derive(Debug, Clone)]
pub struct ShaderSlot {
    /// Vertex stage path.
    pub vertex: PathBuf,
    /// Fragment stage path.
    pub fragment: PathBuf,
    /// Loaded source; `None` until a shader loader pass fills it.
    pub source: Option<ShaderSource>,
}

impl ShaderSlot {
    /// An unloaded slot for the given stage paths.
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            source: None,
        }
    }
}

/// Surface properties of a geometry node.
#[derive(Debug, Clone, Default)]
pub struct Material {
    /// Base color, linear RGBA.
    pub base_color: [f32; 4],
    /// Optional texture reference.
    pub texture: Option<TextureSlot>,
    /// Optional shader reference.
    pub shader: Option<ShaderSlot>,
}

/// Triangle mesh payload of a geometry node.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Point3<f32>>,
    /// Triangle indices into `positions`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Renderable leaf payload.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// Mesh data.
    pub mesh: MeshData,
    /// Surface properties.
    pub material: Material,
}

/// What a node contributes to the scene.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node.
    Group,
    /// A directional light source.
    DirectionalLight(DirectionalLight),
    /// A renderable mesh with its material.
    Geometry(Geometry),
    /// Debug wireframe of a viewing frustum: eight corner points, near
    /// plane first, each plane wound counter-clockwise.
    FrustumOutline([Point3<f32>; 8]),
}

impl NodeKind {
    /// Short label used in logs and the graph export.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::DirectionalLight(_) => "directional-light",
            NodeKind::Geometry(_) => "geometry",
            NodeKind::FrustumOutline(_) => "frustum-outline",
        }
    }
}

/// A node in the scene tree.
pub struct SceneNode {
    kind: NodeKind,
    children: Vec<SceneRef>,
}

impl SceneNode {
    /// Create a detached node.
    pub fn new(kind: NodeKind) -> SceneRef {
        Rc::new(RefCell::new(Self {
            kind,
            children: Vec::new(),
        }))
    }

    /// Create a detached grouping node.
    pub fn group() -> SceneRef {
        Self::new(NodeKind::Group)
    }

    /// The node's payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutable access to the node's payload.
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Child handles, in insertion order.
    pub fn children(&self) -> &[SceneRef] {
        &self.children
    }

    /// Append a child.
    pub fn add_node(&mut self, child: SceneRef) {
        self.children.push(child);
    }

    /// Remove a child by handle identity. Returns whether it was present.
    pub fn remove_node(&mut self, child: &SceneRef) -> bool {
        let before = self.children.len();
        self.children.retain(|c| !Rc::ptr_eq(c, child));
        self.children.len() != before
    }
}

/// Visit `node` and its descendants pre-order.
///
/// Children are snapshotted before descending so the visitor may mutate the
/// node it is handed without tripping over the traversal borrow.
pub fn walk(node: &SceneRef, visit: &mut impl FnMut(&SceneRef)) {
    visit(node);
    let children: Vec<SceneRef> = node.borrow().children().to_vec();
    for child in &children {
        walk(child, visit);
    }
}

/// Number of nodes in the tree rooted at `node`.
pub fn node_count(node: &SceneRef) -> usize {
    let mut count = 0;
    walk(node, &mut |_| count += 1);
    count
}
