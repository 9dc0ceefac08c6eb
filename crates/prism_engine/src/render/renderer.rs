//! Frame orchestration
//!
//! The renderer owns the per-frame sub-phase tables (initialize,
//! pre-process, process, post-process) and the references every frame needs:
//! the active scene root and the bound viewport. It is itself a listener on
//! all three engine phases; one engine process tick fans out into
//! pre-process, process and post-process, in that order. Rasterization is the
//! rendering view's concern, not the renderer's.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::engine::{DeinitArg, InitArg, ProcessArg};
use crate::core::event::{EventDispatcher, Listener};
use crate::display::viewport::Viewport;
use crate::scene::node::SceneRef;

/// Payload of the renderer sub-phase events.
#[derive(Clone)]
pub struct RenderArg {
    /// Active scene root at the time the event fired.
    pub scene: Option<SceneRef>,
    /// The viewport being rendered through.
    pub viewport: Rc<RefCell<Viewport>>,
    /// Seconds since the previous frame (zero during initialize).
    pub delta: f32,
}

/// Per-frame phase driver bound to one viewport.
pub struct Renderer {
    initialize: EventDispatcher<RenderArg>,
    pre_process: EventDispatcher<RenderArg>,
    process: EventDispatcher<RenderArg>,
    post_process: EventDispatcher<RenderArg>,
    scene_root: Option<SceneRef>,
    viewport: Rc<RefCell<Viewport>>,
}

impl Renderer {
    /// Create a renderer bound to `viewport`, with no scene yet.
    pub fn new(viewport: Rc<RefCell<Viewport>>) -> Self {
        Self {
            initialize: EventDispatcher::new(),
            pre_process: EventDispatcher::new(),
            process: EventDispatcher::new(),
            post_process: EventDispatcher::new(),
            scene_root: None,
            viewport,
        }
    }

    /// Registration point for the renderer initialize event.
    pub fn initialize_event(&mut self) -> &mut EventDispatcher<RenderArg> {
        &mut self.initialize
    }

    /// Registration point for the pre-process sub-phase.
    pub fn pre_process_event(&mut self) -> &mut EventDispatcher<RenderArg> {
        &mut self.pre_process
    }

    /// Registration point for the process sub-phase.
    pub fn process_event(&mut self) -> &mut EventDispatcher<RenderArg> {
        &mut self.process
    }

    /// Registration point for the post-process sub-phase.
    pub fn post_process_event(&mut self) -> &mut EventDispatcher<RenderArg> {
        &mut self.post_process
    }

    /// Point the renderer at a new scene root.
    pub fn set_scene_root(&mut self, scene: Option<SceneRef>) {
        self.scene_root = scene;
    }

    /// The active scene root.
    pub fn scene_root(&self) -> Option<SceneRef> {
        self.scene_root.clone()
    }

    /// The bound viewport.
    pub fn viewport(&self) -> Rc<RefCell<Viewport>> {
        self.viewport.clone()
    }

    fn arg(&self, delta: f32) -> RenderArg {
        RenderArg {
            scene: self.scene_root.clone(),
            viewport: self.viewport.clone(),
            delta,
        }
    }
}

impl Listener<InitArg> for Renderer {
    fn handle(&mut self, _: &InitArg) {
        log::debug!("renderer initializing");
        self.initialize.notify(&self.arg(0.0));
    }
}

impl Listener<ProcessArg> for Renderer {
    fn handle(&mut self, event: &ProcessArg) {
        // Give the active viewing volume its per-frame refresh before any
        // sub-phase reads it.
        let volume = self.viewport.borrow().viewing_volume();
        volume.borrow_mut().update(event.delta);

        let arg = self.arg(event.delta);
        self.pre_process.notify(&arg);
        self.process.notify(&arg);
        self.post_process.notify(&arg);
    }
}

impl Listener<DeinitArg> for Renderer {
    fn handle(&mut self, _: &DeinitArg) {
        log::debug!("renderer deinitialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::SceneNode;

    struct PhaseRecorder {
        log: Rc<RefCell<Vec<&'static str>>>,
        phase: &'static str,
    }

    impl Listener<RenderArg> for PhaseRecorder {
        fn handle(&mut self, _: &RenderArg) {
            self.log.borrow_mut().push(self.phase);
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(Rc::new(RefCell::new(Viewport::new(800, 600))))
    }

    #[test]
    fn one_process_tick_fans_out_into_the_three_sub_phases() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut renderer = renderer();
        for phase in ["pre", "main", "post"] {
            let recorder = Rc::new(RefCell::new(PhaseRecorder {
                log: log.clone(),
                phase,
            }));
            match phase {
                "pre" => renderer.pre_process_event().attach(recorder),
                "main" => renderer.process_event().attach(recorder),
                _ => renderer.post_process_event().attach(recorder),
            }
        }

        Listener::<ProcessArg>::handle(
            &mut renderer,
            &ProcessArg {
                delta: 0.016,
                total: 0.016,
            },
        );

        assert_eq!(*log.borrow(), vec!["pre", "main", "post"]);
    }

    #[test]
    fn sub_phase_arg_carries_the_current_scene() {
        struct SceneCheck {
            seen: Rc<RefCell<Option<SceneRef>>>,
        }
        impl Listener<RenderArg> for SceneCheck {
            fn handle(&mut self, event: &RenderArg) {
                *self.seen.borrow_mut() = event.scene.clone();
            }
        }

        let seen = Rc::new(RefCell::new(None));
        let mut renderer = renderer();
        renderer
            .initialize_event()
            .attach(Rc::new(RefCell::new(SceneCheck { seen: seen.clone() })));

        let scene = SceneNode::group();
        renderer.set_scene_root(Some(scene.clone()));
        Listener::<InitArg>::handle(&mut renderer, &InitArg);

        let observed = seen.borrow().clone().expect("scene in arg");
        assert!(Rc::ptr_eq(&observed, &scene));
        assert!(Rc::ptr_eq(&renderer.scene_root().unwrap(), &scene));
    }
}
