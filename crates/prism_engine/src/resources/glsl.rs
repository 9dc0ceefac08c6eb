//! GLSL shader source plugin

use std::path::Path;

use super::registry::{ResourcePlugin, ShaderPlugin};
use super::types::{ResourceError, ShaderSource};

/// Default shader codec: plain GLSL source text, vertex + fragment pair.
pub struct GlslShaderPlugin;

impl ResourcePlugin for GlslShaderPlugin {
    fn name(&self) -> &'static str {
        "glsl"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["vert", "frag", "glsl"]
    }
}

impl ShaderPlugin for GlslShaderPlugin {
    fn load(&self, vertex: &Path, fragment: &Path) -> Result<ShaderSource, ResourceError> {
        let source = ShaderSource {
            vertex: std::fs::read_to_string(vertex)?,
            fragment: std::fs::read_to_string(fragment)?,
        };
        log::debug!("loaded shader pair {:?} / {:?}", vertex, fragment);
        Ok(source)
    }
}
