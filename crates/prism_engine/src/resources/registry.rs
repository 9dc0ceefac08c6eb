//! Pluggable resource codec registry
//!
//! Registries are append-only: registering a plugin can add support for new
//! formats but never replaces an earlier plugin. Lookup returns the first
//! plugin that claims an extension, so registration order decides ties.

use std::path::Path;

use super::types::{ModelData, ResourceError, ShaderSource, TextureData};

/// Common contract of every resource codec.
pub trait ResourcePlugin: Send {
    /// Short plugin name for diagnostics.
    fn name(&self) -> &'static str;

    /// File extensions this plugin claims, lowercase, without the dot.
    fn extensions(&self) -> &'static [&'static str];
}

/// Codec producing model data.
pub trait ModelPlugin: ResourcePlugin {
    /// Decode the model at `path`.
    fn load(&self, path: &Path) -> Result<ModelData, ResourceError>;
}

/// Codec producing texture data.
pub trait TexturePlugin: ResourcePlugin {
    /// Decode the texture at `path`.
    fn load(&self, path: &Path) -> Result<TextureData, ResourceError>;
}

/// Codec producing shader sources.
pub trait ShaderPlugin: ResourcePlugin {
    /// Load the shader pair at `vertex`/`fragment`.
    fn load(&self, vertex: &Path, fragment: &Path) -> Result<ShaderSource, ResourceError>;
}

/// Append-only plugin list for one resource interface.
pub struct Registry<P: ?Sized> {
    plugins: Vec<Box<P>>,
}

impl<P: ResourcePlugin + ?Sized> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ResourcePlugin + ?Sized> Registry<P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Append a plugin. Earlier plugins keep priority for extensions they
    /// already claim.
    pub fn add_plugin(&mut self, plugin: Box<P>) {
        log::debug!(
            "registered resource plugin '{}' for {:?}",
            plugin.name(),
            plugin.extensions()
        );
        self.plugins.push(plugin);
    }

    /// First plugin claiming `extension` (case-insensitive).
    pub fn find(&self, extension: &str) -> Option<&P> {
        self.plugins
            .iter()
            .find(|plugin| {
                plugin
                    .extensions()
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(extension))
            })
            .map(|plugin| plugin.as_ref())
    }

    /// Whether any plugin claims `extension`.
    pub fn supports(&self, extension: &str) -> bool {
        self.find(extension).is_some()
    }

    /// Every claimed extension, in registration order.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.plugins
            .iter()
            .flat_map(|plugin| plugin.extensions().iter().copied())
            .collect()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
