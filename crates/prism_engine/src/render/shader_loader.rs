//! Shader loading pass, scoped to one scene
//!
//! The facade attaches one of these to the engine's initialize phase every
//! time the active scene changes. Each instance only ever touches the scene
//! it was created for, so a loader for a retired scene firing again is
//! harmless.

use std::sync::Arc;

use crate::core::engine::InitArg;
use crate::core::event::Listener;
use crate::resources::Resources;
use crate::scene::node::{walk, NodeKind, SceneRef};

/// Engine-initialize listener that loads a scene's shader sources.
pub struct ShaderLoader {
    resources: Arc<Resources>,
    scene: SceneRef,
}

impl ShaderLoader {
    /// Create a loader for `scene`.
    pub fn new(resources: Arc<Resources>, scene: SceneRef) -> Self {
        Self { resources, scene }
    }
}

impl Listener<InitArg> for ShaderLoader {
    fn handle(&mut self, _: &InitArg) {
        let resources = self.resources.clone();
        let mut loaded = 0u32;
        walk(&self.scene, &mut |node| {
            if let NodeKind::Geometry(geometry) = node.borrow_mut().kind_mut() {
                if let Some(slot) = &mut geometry.material.shader {
                    if slot.source.is_none() {
                        match resources.load_shader(&slot.vertex, &slot.fragment) {
                            Ok(source) => {
                                slot.source = Some(source);
                                loaded += 1;
                            }
                            Err(error) => {
                                log::warn!(
                                    "shader {:?}/{:?} not loaded: {}",
                                    slot.vertex,
                                    slot.fragment,
                                    error
                                );
                            }
                        }
                    }
                }
            }
        });
        if loaded > 0 {
            log::debug!("shader pass loaded {loaded} programs");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::{Geometry, SceneNode, ShaderSlot};
    use std::fs;

    #[test]
    fn initialize_pass_fills_shader_slots() {
        let dir = std::env::temp_dir().join(format!("prism-shader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("basic.vert"), "void main() {}").unwrap();
        fs::write(dir.join("basic.frag"), "void main() {}").unwrap();

        let resources = Arc::new(Resources::with_default_plugins());
        resources.append_directory(&dir);

        let scene = SceneNode::group();
        let mut geometry = Geometry::default();
        geometry.material.shader = Some(ShaderSlot::new("basic.vert", "basic.frag"));
        scene
            .borrow_mut()
            .add_node(SceneNode::new(NodeKind::Geometry(geometry)));

        let mut loader = ShaderLoader::new(resources, scene.clone());
        loader.handle(&InitArg);

        let child = scene.borrow().children()[0].clone();
        let borrowed = child.borrow();
        match borrowed.kind() {
            NodeKind::Geometry(geometry) => {
                let slot = geometry.material.shader.as_ref().unwrap();
                assert!(slot.source.is_some());
            }
            other => panic!("unexpected node {:?}", other.label()),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_shader_files_are_logged_not_fatal() {
        let resources = Arc::new(Resources::with_default_plugins());
        let scene = SceneNode::group();
        let mut geometry = Geometry::default();
        geometry.material.shader = Some(ShaderSlot::new("absent.vert", "absent.frag"));
        scene
            .borrow_mut()
            .add_node(SceneNode::new(NodeKind::Geometry(geometry)));

        let mut loader = ShaderLoader::new(resources, scene);
        // Must not panic.
        loader.handle(&InitArg);
    }
}
