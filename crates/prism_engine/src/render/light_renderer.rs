//! Light collection pass

use crate::core::event::Listener;
use crate::render::renderer::RenderArg;
use crate::scene::node::{walk, DirectionalLight, NodeKind};

/// Pre-process pass that collects the frame's light sources.
///
/// Runs on the renderer's pre-process sub-phase so the light list is current
/// before the rendering view assembles the frame. The list is rebuilt from
/// scratch every tick; scene edits need no invalidation hooks.
#[derive(Default)]
pub struct LightRenderer {
    lights: Vec<DirectionalLight>,
}

impl LightRenderer {
    /// Create an empty light pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lights collected on the most recent tick, in scene order.
    pub fn lights(&self) -> &[DirectionalLight] {
        &self.lights
    }
}

impl Listener<RenderArg> for LightRenderer {
    fn handle(&mut self, event: &RenderArg) {
        self.lights.clear();
        if let Some(scene) = &event.scene {
            walk(scene, &mut |node| {
                if let NodeKind::DirectionalLight(light) = node.borrow().kind() {
                    self.lights.push(light.clone());
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::viewport::Viewport;
    use crate::scene::node::SceneNode;
    use nalgebra::Vector3;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn collects_lights_in_scene_order_and_rebuilds_each_tick() {
        let root = SceneNode::group();
        root.borrow_mut().add_node(SceneNode::new(NodeKind::DirectionalLight(
            DirectionalLight {
                direction: Vector3::new(0.0, -1.0, 0.0),
                color: [1.0, 0.0, 0.0],
            },
        )));
        root.borrow_mut().add_node(SceneNode::new(NodeKind::DirectionalLight(
            DirectionalLight {
                direction: Vector3::new(1.0, 0.0, 0.0),
                color: [0.0, 1.0, 0.0],
            },
        )));

        let viewport = Rc::new(RefCell::new(Viewport::new(100, 100)));
        let mut pass = LightRenderer::new();
        pass.handle(&RenderArg {
            scene: Some(root.clone()),
            viewport: viewport.clone(),
            delta: 0.016,
        });
        assert_eq!(pass.lights().len(), 2);
        assert_eq!(pass.lights()[0].color, [1.0, 0.0, 0.0]);

        // Dropping the scene from the arg empties the list again.
        pass.handle(&RenderArg {
            scene: None,
            viewport,
            delta: 0.016,
        });
        assert!(pass.lights().is_empty());
    }
}
