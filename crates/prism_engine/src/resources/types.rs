//! Resource payload types and errors

use std::path::PathBuf;
use thiserror::Error;

use crate::scene::node::MeshData;

/// Resource loading errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The path could not be resolved against the search path.
    #[error("resource not found: {0}")]
    NotFound(PathBuf),

    /// No registered plugin claims the file's extension.
    #[error("no plugin registered for extension '{0}'")]
    UnsupportedFormat(String),

    /// Reading the file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The image decoder rejected the file.
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// The model decoder rejected the file.
    #[error("model decode error: {0}")]
    Model(#[from] tobj::LoadError),
}

/// Decoded texture pixels, always RGBA8.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

/// Loaded shader stage sources.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    /// Vertex stage source text.
    pub vertex: String,
    /// Fragment stage source text.
    pub fragment: String,
}

/// Decoded model: one or more meshes.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    /// Meshes in file order.
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    /// Total triangle count across all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }
}
