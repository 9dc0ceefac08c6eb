//! # Prism Engine
//!
//! The composition and bootstrap layer of a real-time rendering engine:
//! display surface, input devices, scene graph, camera, renderer, texture
//! streaming and an optional diagnostics overlay, assembled into one running
//! object graph behind a small stable facade.
//!
//! The interesting part is the lifecycle wiring. The engine drives three
//! phase events (initialize, process, deinitialize); the renderer fans each
//! process tick out into pre-process, process and post-process sub-phases;
//! and every subsystem participates by attaching listeners to exactly the
//! phases it cares about. Swapping the scene, camera or viewport at runtime
//! re-points references without touching the listener graph.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prism_engine::setup::EngineSetup;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut setup = EngineSetup::new("my project")?;
//!     setup.add_data_directory("assets");
//!     setup.engine().borrow_mut().start();
//!     Ok(())
//! }
//! ```
//!
//! Rendering backends, scene traversal acceleration and resource codecs are
//! collaborators behind traits ([`render::RenderingView`],
//! [`display::Environment`], the plugin traits in [`resources`]); the crate
//! ships working defaults for each.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod core;
pub mod devices;
pub mod display;
pub mod logging;
pub mod render;
pub mod resources;
pub mod scene;
pub mod setup;

pub use setup::{EngineSetup, SetupBuilder, SetupError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::core::{
        DeinitArg, DisplayConfig, Engine, EventDispatcher, InitArg, Listener, ProcessArg,
        SetupConfig, StopSignal,
    };
    pub use crate::devices::{ButtonState, KeyCode, KeyboardEventArg, MouseButton};
    pub use crate::display::{
        Camera, Environment, Frame, Frustum, GlfwEnvironment, HeadlessEnvironment,
        HorizontalAnchor, Hud, PerspectiveViewingVolume, Surface, VerticalAnchor, ViewingVolume,
        Viewport, VolumeRef,
    };
    pub use crate::render::{
        LightRenderer, ReloadPolicy, RenderArg, Renderer, RenderingView, SceneRenderingView,
        TextureLoader,
    };
    pub use crate::resources::{ResourceError, Resources};
    pub use crate::scene::{
        DirectionalLight, Geometry, Material, MeshData, NodeKind, SceneNode, SceneRef,
    };
    pub use crate::setup::{EngineSetup, SetupBuilder, SetupError};
}
