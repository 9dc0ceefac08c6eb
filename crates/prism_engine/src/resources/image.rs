//! PNG texture plugin

use std::path::Path;

use super::registry::{ResourcePlugin, TexturePlugin};
use super::types::{ResourceError, TextureData};

/// Default texture codec: PNG via the `image` crate, normalized to RGBA8.
pub struct PngTexturePlugin;

impl ResourcePlugin for PngTexturePlugin {
    fn name(&self) -> &'static str {
        "png"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["png"]
    }
}

impl TexturePlugin for PngTexturePlugin {
    fn load(&self, path: &Path) -> Result<TextureData, ResourceError> {
        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        log::debug!("loaded texture {:?}: {}x{}", path, width, height);
        Ok(TextureData {
            width,
            height,
            pixels: decoded.into_raw(),
        })
    }
}
