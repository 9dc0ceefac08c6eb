//! Resource loading: pluggable codecs and the search path
//!
//! [`Resources`] is the explicit process-scoped state the bootstrap and the
//! loaders share: three append-only codec registries plus the data-directory
//! search path. It is handed around as `Arc<Resources>`; the interior mutexes
//! make mutation from another thread safe, although the default engine only
//! ever mutates from the run-loop thread.

pub mod glsl;
pub mod image;
pub mod obj;
pub mod registry;
pub mod search_path;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub use registry::{ModelPlugin, Registry, ResourcePlugin, ShaderPlugin, TexturePlugin};
pub use search_path::SearchPath;
pub use types::{ModelData, ResourceError, ShaderSource, TextureData};

/// Shared resource-loading state: codec registries plus the search path.
pub struct Resources {
    models: Mutex<Registry<dyn ModelPlugin>>,
    textures: Mutex<Registry<dyn TexturePlugin>>,
    shaders: Mutex<Registry<dyn ShaderPlugin>>,
    search_path: Mutex<SearchPath>,
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}

impl Resources {
    /// Create a resource context with empty registries.
    pub fn new() -> Self {
        Self {
            models: Mutex::new(Registry::new()),
            textures: Mutex::new(Registry::new()),
            shaders: Mutex::new(Registry::new()),
            search_path: Mutex::new(SearchPath::new()),
        }
    }

    /// Create a resource context with the default codecs registered:
    /// OBJ models, PNG textures and GLSL shader sources.
    pub fn with_default_plugins() -> Self {
        let resources = Self::new();
        resources.add_model_plugin(Box::new(obj::ObjModelPlugin));
        resources.add_texture_plugin(Box::new(image::PngTexturePlugin));
        resources.add_shader_plugin(Box::new(glsl::GlslShaderPlugin));
        resources
    }

    /// Register an additional model codec.
    pub fn add_model_plugin(&self, plugin: Box<dyn ModelPlugin>) {
        self.models.lock().unwrap().add_plugin(plugin);
    }

    /// Register an additional texture codec.
    pub fn add_texture_plugin(&self, plugin: Box<dyn TexturePlugin>) {
        self.textures.lock().unwrap().add_plugin(plugin);
    }

    /// Register an additional shader codec.
    pub fn add_shader_plugin(&self, plugin: Box<dyn ShaderPlugin>) {
        self.shaders.lock().unwrap().add_plugin(plugin);
    }

    /// Append a directory to the search path. The directory is not validated.
    pub fn append_directory(&self, directory: impl Into<PathBuf>) {
        let directory = directory.into();
        log::info!("data directory added: {:?}", directory);
        self.search_path.lock().unwrap().append(directory);
    }

    /// Resolve a path against the search path.
    pub fn resolve(&self, path: &Path) -> Option<PathBuf> {
        self.search_path.lock().unwrap().resolve(path)
    }

    /// Load a model through the registered codecs.
    pub fn load_model(&self, path: &Path) -> Result<ModelData, ResourceError> {
        let resolved = self
            .resolve(path)
            .ok_or_else(|| ResourceError::NotFound(path.to_path_buf()))?;
        let extension = extension_of(&resolved)?;
        let registry = self.models.lock().unwrap();
        let plugin = registry
            .find(&extension)
            .ok_or(ResourceError::UnsupportedFormat(extension))?;
        plugin.load(&resolved)
    }

    /// Load a texture through the registered codecs.
    pub fn load_texture(&self, path: &Path) -> Result<TextureData, ResourceError> {
        let resolved = self
            .resolve(path)
            .ok_or_else(|| ResourceError::NotFound(path.to_path_buf()))?;
        let extension = extension_of(&resolved)?;
        let registry = self.textures.lock().unwrap();
        let plugin = registry
            .find(&extension)
            .ok_or(ResourceError::UnsupportedFormat(extension))?;
        plugin.load(&resolved)
    }

    /// Load a shader pair through the registered codecs. The codec is picked
    /// by the vertex stage's extension.
    pub fn load_shader(&self, vertex: &Path, fragment: &Path) -> Result<ShaderSource, ResourceError> {
        let vertex = self
            .resolve(vertex)
            .ok_or_else(|| ResourceError::NotFound(vertex.to_path_buf()))?;
        let fragment = self
            .resolve(fragment)
            .ok_or_else(|| ResourceError::NotFound(fragment.to_path_buf()))?;
        let extension = extension_of(&vertex)?;
        let registry = self.shaders.lock().unwrap();
        let plugin = registry
            .find(&extension)
            .ok_or(ResourceError::UnsupportedFormat(extension))?;
        plugin.load(&vertex, &fragment)
    }

    /// Extensions currently claimed by texture codecs.
    pub fn supported_texture_extensions(&self) -> Vec<&'static str> {
        self.textures.lock().unwrap().supported_extensions()
    }
}

fn extension_of(path: &Path) -> Result<String, ResourceError> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ResourceError::UnsupportedFormat(String::from("<none>")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_plugins_cover_the_three_interfaces() {
        let resources = Resources::with_default_plugins();
        assert!(resources.models.lock().unwrap().supports("obj"));
        assert!(resources.textures.lock().unwrap().supports("png"));
        assert!(resources.shaders.lock().unwrap().supports("vert"));
    }

    #[test]
    fn loading_resolves_through_the_search_path() {
        let dir = std::env::temp_dir().join(format!("prism-res-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let resources = Resources::with_default_plugins();
        assert!(resources.load_model(Path::new("tri.obj")).is_err());

        resources.append_directory(&dir);
        let model = resources.load_model(Path::new("tri.obj")).unwrap();
        assert_eq!(model.triangle_count(), 1);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn unknown_extension_is_rejected_with_the_format_error() {
        let dir = std::env::temp_dir().join(format!("prism-fmt-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("mesh.xyz"), "").unwrap();

        let resources = Resources::with_default_plugins();
        resources.append_directory(&dir);
        match resources.load_model(Path::new("mesh.xyz")) {
            Err(ResourceError::UnsupportedFormat(ext)) => assert_eq!(ext, "xyz"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }

        fs::remove_dir_all(dir).ok();
    }
}
