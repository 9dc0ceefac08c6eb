//! Frame orchestration and the passes hanging off it.

pub mod light_renderer;
pub mod renderer;
pub mod shader_loader;
pub mod texture_loader;
pub mod view;

pub use light_renderer::LightRenderer;
pub use renderer::{RenderArg, Renderer};
pub use shader_loader::ShaderLoader;
pub use texture_loader::{ReloadPolicy, TextureLoader};
pub use view::{FrameStats, RenderingView, SceneRenderingView};
