//! Engine bootstrap facade
//!
//! [`EngineSetup`] assembles a working engine out of the subsystem pieces:
//! display environment, input devices, viewport and camera, default scene,
//! renderer, texture loading and the optional HUD. It exists so applications
//! get a running engine from a handful of lines:
//!
//! ```no_run
//! use prism_engine::setup::EngineSetup;
//!
//! let mut setup = EngineSetup::new("demo").expect("engine setup");
//! setup.engine().borrow_mut().start();
//! ```
//!
//! Every collaborator can instead be injected through the builder; a slot
//! left empty gets a default implementation owned by the setup, an injected
//! collaborator stays owned by the caller. The facade's accessors are stable
//! mutation points so applications do not depend on how the pieces are wired
//! together internally.

pub mod fps;

use std::cell::RefCell;
use std::fs::File;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

use crate::core::config::{DisplayConfig, SetupConfig};
use crate::core::engine::{DeinitArg, Engine, InitArg, ProcessArg, StopSignal};
use crate::core::event::Listener;
use crate::devices::{
    ButtonState, JoystickRef, KeyCode, KeyboardEventArg, KeyboardRef, MouseRef,
};
use crate::display::camera::Camera;
use crate::display::environment::{Environment, EnvironmentError, GlfwEnvironment, PumpPhase};
use crate::display::frame::Frame;
use crate::display::frustum::Frustum;
use crate::display::hud::{HorizontalAnchor, Hud, VerticalAnchor};
use crate::display::viewport::Viewport;
use crate::display::volume::{PerspectiveViewingVolume, VolumeRef};
use crate::logging::{install_default_logger, LoggerHandle};
use crate::render::renderer::{RenderArg, Renderer};
use crate::render::shader_loader::ShaderLoader;
use crate::render::texture_loader::{ReloadPolicy, TextureLoader};
use crate::render::view::{RenderingView, SceneRenderingView};
use crate::render::LightRenderer;
use crate::resources::Resources;
use crate::scene::dot;
use crate::scene::node::{DirectionalLight, NodeKind, SceneNode, SceneRef};
use fps::FpsSurface;

/// Bootstrap construction errors. All of these are fatal; there is no
/// recovery path for a half-constructed engine.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The display environment could not be created.
    #[error("environment setup failed: {0}")]
    Environment(#[from] EnvironmentError),
}

/// Whether a collaborator slot was defaulted by the setup or injected by the
/// caller. The setup is responsible for the lifetime of defaulted
/// collaborators only.
enum Provided<T> {
    Defaulted(T),
    Injected(T),
}

impl<T> Provided<T> {
    fn get(&self) -> &T {
        match self {
            Provided::Defaulted(value) | Provided::Injected(value) => value,
        }
    }

    fn is_default(&self) -> bool {
        matches!(self, Provided::Defaulted(_))
    }
}

fn provenance(defaulted: bool) -> &'static str {
    if defaulted {
        "default"
    } else {
        "injected"
    }
}

// ---------------------------------------------------------------------------
// Listener adapters: small glue objects binding one collaborator to one
// event. They hold a handle to the collaborator they forward to, nothing
// else.
// ---------------------------------------------------------------------------

/// Runs the environment's native event pump for one engine phase.
struct EnvironmentPump {
    environment: Rc<RefCell<dyn Environment>>,
    phase: PumpPhase,
}

impl Listener<InitArg> for EnvironmentPump {
    fn handle(&mut self, _: &InitArg) {
        self.environment.borrow_mut().pump_events(self.phase);
    }
}

impl Listener<ProcessArg> for EnvironmentPump {
    fn handle(&mut self, _: &ProcessArg) {
        self.environment.borrow_mut().pump_events(self.phase);
    }
}

impl Listener<DeinitArg> for EnvironmentPump {
    fn handle(&mut self, _: &DeinitArg) {
        self.environment.borrow_mut().pump_events(self.phase);
    }
}

/// Stops the engine when the native window is asked to close.
struct WindowCloseHandler {
    environment: Rc<RefCell<dyn Environment>>,
    signal: StopSignal,
}

impl Listener<ProcessArg> for WindowCloseHandler {
    fn handle(&mut self, _: &ProcessArg) {
        if self.signal.is_running() && self.environment.borrow().close_requested() {
            self.signal.stop();
        }
    }
}

/// Forwards the renderer's process sub-phase to the rendering view strategy.
struct RenderingViewAdapter {
    view: Rc<RefCell<dyn RenderingView>>,
}

impl Listener<RenderArg> for RenderingViewAdapter {
    fn handle(&mut self, event: &RenderArg) {
        self.view.borrow_mut().render(event);
    }
}

/// Scans the renderer's scene for textures when the renderer initializes.
struct TextureLoadOnInit {
    loader: Rc<RefCell<TextureLoader>>,
}

impl Listener<RenderArg> for TextureLoadOnInit {
    fn handle(&mut self, event: &RenderArg) {
        if let Some(scene) = &event.scene {
            self.loader.borrow_mut().load_scene(scene);
        }
    }
}

/// Stops the engine when escape is pressed.
struct QuitHandler {
    signal: StopSignal,
}

impl Listener<KeyboardEventArg> for QuitHandler {
    fn handle(&mut self, event: &KeyboardEventArg) {
        if event.key == KeyCode::Escape && event.state == ButtonState::Pressed {
            self.signal.stop();
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`EngineSetup`]. Every slot left empty is defaulted.
pub struct SetupBuilder {
    title: String,
    display: Option<DisplayConfig>,
    environment: Option<Rc<RefCell<dyn Environment>>>,
    rendering_view: Option<Rc<RefCell<dyn RenderingView>>>,
    engine: Option<Rc<RefCell<Engine>>>,
    renderer: Option<Rc<RefCell<Renderer>>>,
    resources: Option<Arc<Resources>>,
    data_directories: Vec<PathBuf>,
    debug_graph_path: PathBuf,
}

impl SetupBuilder {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            display: None,
            environment: None,
            rendering_view: None,
            engine: None,
            renderer: None,
            resources: None,
            data_directories: Vec::new(),
            debug_graph_path: PathBuf::from("scene.dot"),
        }
    }

    /// Use a caller-owned environment instead of the windowed default.
    pub fn environment(mut self, environment: Rc<RefCell<dyn Environment>>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Use a caller-owned rendering view instead of the default scene view.
    pub fn rendering_view(mut self, view: Rc<RefCell<dyn RenderingView>>) -> Self {
        self.rendering_view = Some(view);
        self
    }

    /// Use a caller-owned engine instead of a fresh one.
    pub fn engine(mut self, engine: Rc<RefCell<Engine>>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Use a caller-owned renderer. Its viewport is adopted as the active
    /// viewport, so camera changes target the renderer's actual binding.
    pub fn renderer(mut self, renderer: Rc<RefCell<Renderer>>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Share an existing resource context instead of creating one. The
    /// default codecs are still registered (registration is additive).
    pub fn resources(mut self, resources: Arc<Resources>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Override the display settings used by the default environment.
    pub fn display(mut self, display: DisplayConfig) -> Self {
        self.display = Some(display);
        self
    }

    /// Target file for the debug scene-graph export.
    pub fn debug_graph_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_graph_path = path.into();
        self
    }

    /// Apply a loaded [`SetupConfig`]: display settings, data directories and
    /// the debug graph path.
    pub fn config(mut self, config: SetupConfig) -> Self {
        self.display = Some(config.display);
        self.data_directories.extend(config.data_directories);
        if let Some(path) = config.debug_graph_path {
            self.debug_graph_path = path;
        }
        self
    }

    /// Construct the engine object graph in dependency order.
    pub fn build(self) -> Result<EngineSetup, SetupError> {
        // One process-wide logging sink; repeat installs are harmless.
        let logger = install_default_logger();
        log::info!("bootstrapping engine \"{}\"", self.title);

        // The phase driver everything below attaches to.
        let engine = match self.engine {
            Some(engine) => Provided::Injected(engine),
            None => Provided::Defaulted(Rc::new(RefCell::new(Engine::new()))),
        };
        let signal = engine.get().borrow().signal();

        // Display and devices.
        let environment: Provided<Rc<RefCell<dyn Environment>>> = match self.environment {
            Some(environment) => Provided::Injected(environment),
            None => {
                let display = self.display.clone().unwrap_or_else(|| DisplayConfig {
                    title: self.title.clone(),
                    ..DisplayConfig::default()
                });
                Provided::Defaulted(Rc::new(RefCell::new(GlfwEnvironment::new(&display)?)))
            }
        };
        let frame = environment.get().borrow().frame();
        let mouse = environment.get().borrow().mouse();
        let keyboard = environment.get().borrow().keyboard();
        let joystick = environment.get().borrow().joystick();

        // The environment pumps its native event queue once per phase.
        {
            let mut engine = engine.get().borrow_mut();
            engine.initialize_event().attach(Rc::new(RefCell::new(EnvironmentPump {
                environment: environment.get().clone(),
                phase: PumpPhase::Initialize,
            })));
            engine.process_event().attach(Rc::new(RefCell::new(EnvironmentPump {
                environment: environment.get().clone(),
                phase: PumpPhase::Process,
            })));
            engine.deinitialize_event().attach(Rc::new(RefCell::new(EnvironmentPump {
                environment: environment.get().clone(),
                phase: PumpPhase::Deinitialize,
            })));
            engine.process_event().attach(Rc::new(RefCell::new(WindowCloseHandler {
                environment: environment.get().clone(),
                signal: signal.clone(),
            })));
        }

        // Viewport and the default camera/frustum chain. An injected renderer
        // brings its own viewport; camera rebinding must target that one.
        let viewport = match &self.renderer {
            Some(renderer) => renderer.borrow().viewport(),
            None => Rc::new(RefCell::new(Viewport::from_frame(&frame.borrow()))),
        };
        let aspect = viewport.borrow().aspect();
        let camera = Rc::new(RefCell::new(Camera::new(Rc::new(RefCell::new(
            PerspectiveViewingVolume::with_aspect(aspect),
        )))));
        let frustum = Rc::new(RefCell::new(Frustum::new(camera.clone() as VolumeRef)));
        viewport
            .borrow_mut()
            .set_viewing_volume(frustum.clone() as VolumeRef);

        // Resource context with the default codecs. Registration is additive,
        // so defaults never shadow plugins already present in a shared
        // context.
        let resources = self.resources.unwrap_or_else(|| Arc::new(Resources::new()));
        resources.add_model_plugin(Box::new(crate::resources::obj::ObjModelPlugin));
        resources.add_texture_plugin(Box::new(crate::resources::image::PngTexturePlugin));
        resources.add_shader_plugin(Box::new(crate::resources::glsl::GlslShaderPlugin));
        for directory in self.data_directories {
            resources.append_directory(directory);
        }

        // The default scene: a group root with one directional light.
        let scene = SceneNode::group();
        scene
            .borrow_mut()
            .add_node(SceneNode::new(NodeKind::DirectionalLight(
                DirectionalLight::default(),
            )));

        // Rendering system.
        let renderer = match self.renderer {
            Some(renderer) => Provided::Injected(renderer),
            None => Provided::Defaulted(Rc::new(RefCell::new(Renderer::new(viewport.clone())))),
        };
        let texture_loader = Rc::new(RefCell::new(TextureLoader::new(resources.clone())));
        let rendering_view: Provided<Rc<RefCell<dyn RenderingView>>> = match self.rendering_view {
            Some(view) => Provided::Injected(view),
            None => Provided::Defaulted(Rc::new(RefCell::new(SceneRenderingView::new()))),
        };
        let light_renderer = Rc::new(RefCell::new(LightRenderer::new()));

        {
            let mut engine = engine.get().borrow_mut();
            engine.initialize_event().attach(renderer.get().clone());
            engine.process_event().attach(renderer.get().clone());
            engine.deinitialize_event().attach(renderer.get().clone());
        }
        {
            let mut renderer = renderer.get().borrow_mut();
            renderer.pre_process_event().attach(light_renderer.clone());
            renderer
                .process_event()
                .attach(Rc::new(RefCell::new(RenderingViewAdapter {
                    view: rendering_view.get().clone(),
                })));
            renderer.set_scene_root(Some(scene.clone()));
            renderer
                .initialize_event()
                .attach(Rc::new(RefCell::new(TextureLoadOnInit {
                    loader: texture_loader.clone(),
                })));
            renderer.pre_process_event().attach(texture_loader.clone());
        }

        // Default key binding: escape quits.
        keyboard
            .borrow_mut()
            .key_event()
            .attach(Rc::new(RefCell::new(QuitHandler {
                signal: signal.clone(),
            })));

        log::debug!(
            "collaborators: engine {}, environment {}, renderer {}, rendering view {}",
            provenance(engine.is_default()),
            provenance(environment.is_default()),
            provenance(renderer.is_default()),
            provenance(rendering_view.is_default()),
        );

        Ok(EngineSetup {
            title: self.title,
            logger,
            engine,
            environment,
            frame,
            mouse,
            keyboard,
            joystick,
            viewport,
            camera: Provided::Defaulted(camera),
            frustum: Some(frustum),
            scene,
            renderer,
            rendering_view,
            light_renderer,
            texture_loader,
            resources,
            hud: None,
            debug_graph_path: self.debug_graph_path,
        })
    }
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

/// A fully wired engine instance and its stable mutation points.
pub struct EngineSetup {
    title: String,
    logger: LoggerHandle,
    engine: Provided<Rc<RefCell<Engine>>>,
    environment: Provided<Rc<RefCell<dyn Environment>>>,
    frame: Rc<RefCell<Frame>>,
    mouse: MouseRef,
    keyboard: KeyboardRef,
    joystick: Option<JoystickRef>,
    viewport: Rc<RefCell<Viewport>>,
    camera: Provided<Rc<RefCell<Camera>>>,
    frustum: Option<Rc<RefCell<Frustum>>>,
    scene: SceneRef,
    renderer: Provided<Rc<RefCell<Renderer>>>,
    rendering_view: Provided<Rc<RefCell<dyn RenderingView>>>,
    light_renderer: Rc<RefCell<LightRenderer>>,
    texture_loader: Rc<RefCell<TextureLoader>>,
    resources: Arc<Resources>,
    hud: Option<Rc<RefCell<Hud>>>,
    debug_graph_path: PathBuf,
}

impl EngineSetup {
    /// Start building a setup with optional collaborator overrides.
    pub fn builder(title: impl Into<String>) -> SetupBuilder {
        SetupBuilder::new(title)
    }

    /// Build a setup with every collaborator defaulted (windowed display).
    pub fn new(title: impl Into<String>) -> Result<Self, SetupError> {
        Self::builder(title).build()
    }

    /// Project title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The engine. Drive it with `engine().borrow_mut().start()`.
    pub fn engine(&self) -> Rc<RefCell<Engine>> {
        self.engine.get().clone()
    }

    /// The native display surface record.
    pub fn frame(&self) -> Rc<RefCell<Frame>> {
        self.frame.clone()
    }

    /// The renderer. It always renders the scene supplied by
    /// [`EngineSetup::set_scene`].
    pub fn renderer(&self) -> Rc<RefCell<Renderer>> {
        self.renderer.get().clone()
    }

    /// The mouse device.
    pub fn mouse(&self) -> MouseRef {
        self.mouse.clone()
    }

    /// The keyboard device.
    pub fn keyboard(&self) -> KeyboardRef {
        self.keyboard.clone()
    }

    /// The joystick device, when one is present. Callers must handle `None`.
    pub fn joystick(&self) -> Option<JoystickRef> {
        self.joystick.clone()
    }

    /// The display environment.
    pub fn environment(&self) -> Rc<RefCell<dyn Environment>> {
        self.environment.get().clone()
    }

    /// The active rendering view strategy.
    pub fn rendering_view(&self) -> Rc<RefCell<dyn RenderingView>> {
        self.rendering_view.get().clone()
    }

    /// The active scene. The default scene is a group root with a single
    /// directional light beneath it.
    pub fn scene(&self) -> SceneRef {
        self.scene.clone()
    }

    /// The active camera.
    pub fn camera(&self) -> Rc<RefCell<Camera>> {
        self.camera.get().clone()
    }

    /// The texture loader, already bound to the rendering system.
    pub fn texture_loader(&self) -> Rc<RefCell<TextureLoader>> {
        self.texture_loader.clone()
    }

    /// The light collection pass.
    pub fn light_renderer(&self) -> Rc<RefCell<LightRenderer>> {
        self.light_renderer.clone()
    }

    /// The logging sink installed (or found) at construction.
    pub fn logger(&self) -> &LoggerHandle {
        &self.logger
    }

    /// The shared resource-loading context.
    pub fn resources(&self) -> Arc<Resources> {
        self.resources.clone()
    }

    /// Replace the active scene.
    ///
    /// Re-points the renderer, synchronously scans the new scene for
    /// textures, and schedules a shader pass for it on the engine's
    /// initialize phase. Ownership stays with the caller: keep the scene
    /// alive while it is active, and use [`EngineSetup::scene`] beforehand if
    /// the previous scene needs cleanup.
    pub fn set_scene(&mut self, scene: SceneRef) {
        self.scene = scene.clone();
        self.renderer
            .get()
            .borrow_mut()
            .set_scene_root(Some(scene.clone()));
        self.texture_loader.borrow_mut().load_scene(&scene);

        let shader_loader = Rc::new(RefCell::new(ShaderLoader::new(
            self.resources.clone(),
            scene,
        )));
        self.engine
            .get()
            .borrow_mut()
            .initialize_event()
            .attach(shader_loader);
    }

    /// Bind a caller-owned camera.
    ///
    /// The setup retires the frustum it wrapped the previous camera with,
    /// wraps the new camera in a fresh frustum and rebinds the viewport in
    /// one volume swap. Ownership of the camera stays with the caller.
    pub fn set_camera(&mut self, camera: Rc<RefCell<Camera>>) {
        let frustum = Rc::new(RefCell::new(Frustum::new(camera.clone() as VolumeRef)));
        self.viewport
            .borrow_mut()
            .set_viewing_volume(frustum.clone() as VolumeRef);
        self.frustum = Some(frustum);
        self.camera = Provided::Injected(camera);
    }

    /// Bind a caller-owned viewing volume through a new internal camera.
    ///
    /// The camera created here is setup-owned and replaces any previously
    /// created internal camera, which is released. No frustum wrapper is
    /// created on this path, so [`EngineSetup::enable_debugging`] has no clip
    /// volume to visualize until a full camera is bound again.
    pub fn set_camera_volume(&mut self, volume: VolumeRef) {
        let camera = Rc::new(RefCell::new(Camera::new(volume)));
        self.viewport
            .borrow_mut()
            .set_viewing_volume(camera.clone() as VolumeRef);
        self.frustum = None;
        self.camera = Provided::Defaulted(camera);
    }

    /// Append a directory to the resource search path. The directory is not
    /// validated and the search path outlives this setup.
    pub fn add_data_directory(&self, directory: impl Into<PathBuf>) {
        self.resources.append_directory(directory);
    }

    /// The HUD, created on first access and registered exactly once on the
    /// renderer's post-process phase.
    pub fn hud(&mut self) -> Rc<RefCell<Hud>> {
        if let Some(hud) = &self.hud {
            return hud.clone();
        }
        let hud = Rc::new(RefCell::new(Hud::new()));
        self.renderer
            .get()
            .borrow_mut()
            .post_process_event()
            .attach(hud.clone());
        self.hud = Some(hud.clone());
        hud
    }

    /// Enable run-time debugging features: frustum clip visualization, a
    /// scene-graph export and the FPS overlay.
    ///
    /// A failed graph export is logged and skipped; the remaining features
    /// are still enabled.
    pub fn enable_debugging(&mut self) {
        match &self.frustum {
            Some(frustum) => {
                let node = {
                    let mut frustum = frustum.borrow_mut();
                    frustum.visualize_clipping(true);
                    frustum.frustum_node()
                };
                let already_inserted = self
                    .scene
                    .borrow()
                    .children()
                    .iter()
                    .any(|child| Rc::ptr_eq(child, &node));
                if !already_inserted {
                    self.scene.borrow_mut().add_node(node);
                }
            }
            None => {
                log::warn!("no setup-owned frustum to visualize; bind a camera first");
            }
        }

        match File::create(&self.debug_graph_path) {
            Err(error) => {
                log::error!(
                    "cannot open {:?} for the scene graph export: {}",
                    self.debug_graph_path,
                    error
                );
            }
            Ok(mut file) => match dot::write_graph(&self.scene, &mut file) {
                Err(error) => log::error!("scene graph export failed: {error}"),
                Ok(()) => log::info!(
                    "scene graph written to {:?}; render it with: dot -Tsvg {} > scene.svg",
                    self.debug_graph_path,
                    self.debug_graph_path.display()
                ),
            },
        }

        self.show_fps();
    }

    /// Add an FPS overlay to the HUD, anchored top-left.
    ///
    /// The surface is scheduled for queued texture loading and registered on
    /// the engine's process phase so its counter advances every tick.
    pub fn show_fps(&mut self) {
        let fps = Rc::new(RefCell::new(FpsSurface::new()));
        self.texture_loader
            .borrow_mut()
            .load_surface(fps.clone(), ReloadPolicy::Queued);
        self.engine
            .get()
            .borrow_mut()
            .process_event()
            .attach(fps.clone());

        let hud = self.hud();
        let key = hud.borrow_mut().create_surface(fps);
        hud.borrow_mut()
            .set_anchor(key, HorizontalAnchor::Left, VerticalAnchor::Top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::environment::HeadlessEnvironment;
    use crate::render::view::FrameStats;
    use nalgebra::Point3;

    fn headless() -> (Rc<RefCell<HeadlessEnvironment>>, EngineSetup) {
        let environment = Rc::new(RefCell::new(HeadlessEnvironment::new(800, 600)));
        let setup = EngineSetup::builder("test")
            .environment(environment.clone())
            .build()
            .expect("headless setup");
        (environment, setup)
    }

    struct StopAfter {
        remaining: u32,
        signal: StopSignal,
    }

    impl Listener<ProcessArg> for StopAfter {
        fn handle(&mut self, _: &ProcessArg) {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.signal.stop();
            }
        }
    }

    #[test]
    fn every_accessor_is_wired_after_construction() {
        let (_, mut setup) = headless();
        assert_eq!(setup.title(), "test");
        assert_eq!(setup.frame().borrow().width(), 800);
        assert!(setup.joystick().is_none());
        assert!(setup.logger().level() == log::LevelFilter::Info);

        // The default scene is a group with one directional light.
        let scene = setup.scene();
        assert_eq!(scene.borrow().children().len(), 1);
        assert!(matches!(
            scene.borrow().children()[0].borrow().kind(),
            NodeKind::DirectionalLight(_)
        ));

        // The renderer already points at it.
        let root = setup.renderer().borrow().scene_root().expect("scene root");
        assert!(Rc::ptr_eq(&root, &scene));

        // Setup-owned collaborators are marked as such.
        assert!(setup.engine.is_default());
        assert!(setup.renderer.is_default());
        assert!(setup.rendering_view.is_default());
        assert!(setup.camera.is_default());
        assert!(!setup.environment.is_default());
        let _ = setup.hud();
    }

    #[test]
    fn joystick_accessor_mirrors_environment_presence() {
        let environment =
            Rc::new(RefCell::new(HeadlessEnvironment::new(640, 480).with_joystick("pad")));
        let setup = EngineSetup::builder("joystick")
            .environment(environment)
            .build()
            .unwrap();
        assert_eq!(setup.joystick().unwrap().borrow().name(), "pad");
    }

    #[test]
    fn injected_collaborators_are_adopted_not_owned() {
        let environment = Rc::new(RefCell::new(HeadlessEnvironment::new(320, 240)));
        let engine = Rc::new(RefCell::new(Engine::new()));
        let viewport = Rc::new(RefCell::new(Viewport::new(320, 240)));
        let renderer = Rc::new(RefCell::new(Renderer::new(viewport.clone())));
        let view = Rc::new(RefCell::new(SceneRenderingView::new()));

        let setup = EngineSetup::builder("injected")
            .environment(environment)
            .engine(engine.clone())
            .renderer(renderer.clone())
            .rendering_view(view)
            .build()
            .unwrap();

        assert!(Rc::ptr_eq(&setup.engine(), &engine));
        assert!(Rc::ptr_eq(&setup.renderer(), &renderer));
        // The injected renderer's viewport became the active one, so the
        // default camera chain was bound into it.
        assert!(Rc::ptr_eq(&setup.viewport, &viewport));
        assert!(!setup.engine.is_default());
        assert!(!setup.renderer.is_default());
        assert!(!setup.rendering_view.is_default());
    }

    #[test]
    fn set_scene_repoints_renderer_and_scans_exactly_once_per_call() {
        let (_, mut setup) = headless();
        let loader = setup.texture_loader();
        assert_eq!(loader.borrow().scan_count(), 0);

        let scene_a = SceneNode::group();
        let scene_b = SceneNode::group();
        let engine = setup.engine();
        let shader_passes_before = engine.borrow_mut().initialize_event().len();

        setup.set_scene(scene_a.clone());
        assert_eq!(loader.borrow().scan_count(), 1);
        let root = setup.renderer().borrow().scene_root().unwrap();
        assert!(Rc::ptr_eq(&root, &scene_a));

        setup.set_scene(scene_b.clone());
        assert_eq!(loader.borrow().scan_count(), 2);
        let root = setup.renderer().borrow().scene_root().unwrap();
        assert!(Rc::ptr_eq(&root, &scene_b));
        assert!(Rc::ptr_eq(&setup.scene(), &scene_b));

        // Each set_scene installed one scene-scoped shader pass.
        let shader_passes_after = engine.borrow_mut().initialize_event().len();
        assert_eq!(shader_passes_after, shader_passes_before + 2);
    }

    #[test]
    fn hud_is_lazily_created_and_registered_exactly_once() {
        let (_, mut setup) = headless();
        let renderer = setup.renderer();
        let before = renderer.borrow_mut().post_process_event().len();

        let first = setup.hud();
        let second = setup.hud();
        let third = setup.hud();

        assert!(Rc::ptr_eq(&first, &second));
        assert!(Rc::ptr_eq(&second, &third));
        assert_eq!(renderer.borrow_mut().post_process_event().len(), before + 1);
    }

    #[test]
    fn camera_rebinding_never_leaves_the_viewport_unbound() {
        let (_, mut setup) = headless();
        assert!(setup.frustum.is_some());

        // Full-camera path: a fresh frustum wraps the caller's camera.
        let camera = Rc::new(RefCell::new(Camera::new(Rc::new(RefCell::new(
            PerspectiveViewingVolume::with_aspect(1.0),
        )))));
        setup.set_camera(camera.clone());
        assert!(setup.frustum.is_some());
        {
            use crate::display::volume::ViewingVolume;
            camera.borrow_mut().set_position(Point3::new(1.0, 2.0, 3.0));
            let bound = setup.viewport.borrow().viewing_volume();
            let position = bound.borrow().position();
            assert_eq!(position, Point3::new(1.0, 2.0, 3.0));
        }

        // Volume path: an internal camera binds directly, no frustum.
        let volume: VolumeRef = Rc::new(RefCell::new(PerspectiveViewingVolume::with_aspect(2.0)));
        setup.set_camera_volume(volume.clone());
        assert!(setup.frustum.is_none());
        assert!(setup.camera.is_default());
        {
            use crate::display::volume::ViewingVolume;
            volume.borrow_mut().set_position(Point3::new(7.0, 0.0, 0.0));
            let bound = setup.viewport.borrow().viewing_volume();
            assert_eq!(bound.borrow().position(), Point3::new(7.0, 0.0, 0.0));
        }
    }

    #[test]
    fn show_fps_registers_one_surface_anchored_top_left() {
        let (_, mut setup) = headless();
        let engine = setup.engine();
        let process_before = engine.borrow_mut().process_event().len();

        setup.show_fps();

        assert_eq!(engine.borrow_mut().process_event().len(), process_before + 1);
        assert_eq!(setup.texture_loader().borrow().queued_surfaces(), 1);

        let hud = setup.hud();
        let hud = hud.borrow();
        assert_eq!(hud.surface_count(), 1);
        let (_, surface) = hud.surfaces().next().expect("fps surface");
        assert_eq!(
            surface.anchor(),
            (HorizontalAnchor::Left, VerticalAnchor::Top)
        );
        assert_eq!(surface.source().borrow().name(), "fps");
    }

    #[test]
    fn enable_debugging_with_unwritable_path_still_enables_fps() {
        let environment = Rc::new(RefCell::new(HeadlessEnvironment::new(800, 600)));
        let mut setup = EngineSetup::builder("debug")
            .environment(environment)
            .debug_graph_path("/definitely/missing/dir/scene.dot")
            .build()
            .unwrap();

        let engine = setup.engine();
        let process_before = engine.borrow_mut().process_event().len();
        let scene_nodes_before = setup.scene().borrow().children().len();

        setup.enable_debugging();

        // The frustum outline joined the scene.
        assert_eq!(
            setup.scene().borrow().children().len(),
            scene_nodes_before + 1
        );
        assert!(setup
            .scene()
            .borrow()
            .children()
            .iter()
            .any(|child| matches!(child.borrow().kind(), NodeKind::FrustumOutline(_))));

        // The failed export did not keep show_fps from running.
        assert_eq!(engine.borrow_mut().process_event().len(), process_before + 1);
        assert_eq!(setup.hud().borrow().surface_count(), 1);
    }

    #[test]
    fn enable_debugging_writes_the_graph_when_it_can() {
        let path = std::env::temp_dir().join(format!("prism-debug-{}.dot", std::process::id()));
        let environment = Rc::new(RefCell::new(HeadlessEnvironment::new(800, 600)));
        let mut setup = EngineSetup::builder("debug-ok")
            .environment(environment)
            .debug_graph_path(&path)
            .build()
            .unwrap();

        setup.enable_debugging();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("digraph scene"));
        assert!(text.contains("frustum-outline"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn escape_stops_the_engine_and_other_keys_do_not() {
        let (_, setup) = headless();
        let signal = setup.engine().borrow().signal();

        setup.keyboard().borrow_mut().dispatch(KeyboardEventArg {
            key: KeyCode::A,
            state: ButtonState::Pressed,
        });
        assert!(signal.is_running());
        assert_eq!(signal.requests(), 0);

        setup.keyboard().borrow_mut().dispatch(KeyboardEventArg {
            key: KeyCode::Escape,
            state: ButtonState::Pressed,
        });
        assert!(!signal.is_running());
        assert_eq!(signal.requests(), 1);
    }

    #[test]
    fn environment_is_pumped_once_per_phase() {
        let (environment, setup) = headless();
        let engine = setup.engine();
        let signal = engine.borrow().signal();
        engine
            .borrow_mut()
            .process_event()
            .attach(Rc::new(RefCell::new(StopAfter {
                remaining: 2,
                signal,
            })));

        engine.borrow_mut().start();

        let environment = environment.borrow();
        assert_eq!(environment.pump_count(PumpPhase::Initialize), 1);
        assert_eq!(environment.pump_count(PumpPhase::Process), 2);
        assert_eq!(environment.pump_count(PumpPhase::Deinitialize), 1);
    }

    #[test]
    fn window_close_request_stops_the_run_loop() {
        let (environment, setup) = headless();
        environment.borrow_mut().request_close();

        let engine = setup.engine();
        engine.borrow_mut().start();

        let signal = engine.borrow().signal();
        assert!(!signal.is_running());
        assert_eq!(signal.requests(), 1);
    }

    #[test]
    fn a_full_run_drives_rendering_and_light_collection() {
        let environment = Rc::new(RefCell::new(HeadlessEnvironment::new(800, 600)));
        let view = Rc::new(RefCell::new(SceneRenderingView::new()));
        let setup = EngineSetup::builder("run")
            .environment(environment)
            .rendering_view(view.clone())
            .build()
            .unwrap();

        let engine = setup.engine();
        let signal = engine.borrow().signal();
        engine
            .borrow_mut()
            .process_event()
            .attach(Rc::new(RefCell::new(StopAfter {
                remaining: 3,
                signal,
            })));

        engine.borrow_mut().start();

        assert_eq!(view.borrow().frame_count(), 3);
        assert_eq!(
            view.borrow().last_stats(),
            FrameStats {
                geometry: 0,
                triangles: 0,
                lights: 1
            }
        );
        assert_eq!(setup.light_renderer().borrow().lights().len(), 1);
    }

    #[test]
    fn shared_resources_keep_earlier_plugins_first() {
        let resources = Arc::new(Resources::with_default_plugins());
        let environment = Rc::new(RefCell::new(HeadlessEnvironment::new(100, 100)));
        let setup = EngineSetup::builder("shared")
            .environment(environment)
            .resources(resources.clone())
            .build()
            .unwrap();

        // Bootstrap registration added defaults additively; the texture
        // registry still resolves png and now lists it twice.
        assert!(Arc::ptr_eq(&setup.resources(), &resources));
        let extensions = resources.supported_texture_extensions();
        assert!(extensions.iter().filter(|e| **e == "png").count() >= 2);
    }
}
