//! Rendering view strategy
//!
//! A rendering view consumes one frame's worth of scene and produces draw
//! work for a backend. The default view stops at draw-list assembly; GPU
//! submission belongs to whichever backend a project plugs in here.

use crate::render::renderer::RenderArg;
use crate::scene::node::{walk, NodeKind};

/// Per-frame drawing strategy attached to the renderer's process sub-phase.
pub trait RenderingView {
    /// Produce draw work for one frame.
    fn render(&mut self, arg: &RenderArg);
}

/// Summary of the last assembled frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Geometry nodes visited.
    pub geometry: usize,
    /// Triangles across all visited geometry.
    pub triangles: usize,
    /// Light nodes visited.
    pub lights: usize,
}

/// Default rendering view: walks the scene and assembles draw statistics.
#[derive(Default)]
pub struct SceneRenderingView {
    stats: FrameStats,
    frames: u64,
}

impl SceneRenderingView {
    /// Create the default view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the most recent frame.
    pub fn last_stats(&self) -> FrameStats {
        self.stats
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl RenderingView for SceneRenderingView {
    fn render(&mut self, arg: &RenderArg) {
        let mut stats = FrameStats::default();
        if let Some(scene) = &arg.scene {
            walk(scene, &mut |node| match node.borrow().kind() {
                NodeKind::Geometry(geometry) => {
                    stats.geometry += 1;
                    stats.triangles += geometry.mesh.triangle_count();
                }
                NodeKind::DirectionalLight(_) => stats.lights += 1,
                _ => {}
            });
        }
        self.stats = stats;
        self.frames += 1;
        log::trace!(
            "frame {}: {} geometry nodes, {} triangles, {} lights",
            self.frames,
            stats.geometry,
            stats.triangles,
            stats.lights
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::viewport::Viewport;
    use crate::scene::node::{DirectionalLight, Geometry, MeshData, SceneNode};
    use nalgebra::Point3;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn draw_list_stats_reflect_the_scene() {
        let root = SceneNode::group();
        root.borrow_mut().add_node(SceneNode::new(NodeKind::DirectionalLight(
            DirectionalLight::default(),
        )));
        root.borrow_mut()
            .add_node(SceneNode::new(NodeKind::Geometry(Geometry {
                mesh: MeshData {
                    positions: vec![
                        Point3::origin(),
                        Point3::new(1.0, 0.0, 0.0),
                        Point3::new(0.0, 1.0, 0.0),
                    ],
                    indices: vec![0, 1, 2],
                },
                material: Default::default(),
            })));

        let mut view = SceneRenderingView::new();
        view.render(&RenderArg {
            scene: Some(root),
            viewport: Rc::new(RefCell::new(Viewport::new(100, 100))),
            delta: 0.016,
        });

        assert_eq!(
            view.last_stats(),
            FrameStats {
                geometry: 1,
                triangles: 1,
                lights: 1
            }
        );
        assert_eq!(view.frame_count(), 1);
    }

    #[test]
    fn missing_scene_renders_an_empty_frame() {
        let mut view = SceneRenderingView::new();
        view.render(&RenderArg {
            scene: None,
            viewport: Rc::new(RefCell::new(Viewport::new(100, 100))),
            delta: 0.016,
        });
        assert_eq!(view.last_stats(), FrameStats::default());
    }
}
