//! Display surface, viewing volumes and overlay subsystem.

pub mod camera;
pub mod environment;
pub mod frame;
pub mod frustum;
pub mod hud;
pub mod viewport;
pub mod volume;

pub use camera::Camera;
pub use environment::{
    Environment, EnvironmentError, GlfwEnvironment, HeadlessEnvironment, PumpPhase,
};
pub use frame::Frame;
pub use frustum::{Frustum, Plane};
pub use hud::{HorizontalAnchor, Hud, Surface, SurfaceKey, SurfaceRef, VerticalAnchor};
pub use viewport::Viewport;
pub use volume::{PerspectiveViewingVolume, ViewingVolume, VolumeRef};
