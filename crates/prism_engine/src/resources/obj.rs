//! Wavefront OBJ model plugin

use nalgebra::Point3;
use std::path::Path;

use super::registry::{ModelPlugin, ResourcePlugin};
use super::types::{ModelData, ResourceError};
use crate::scene::node::MeshData;

/// Default model codec: triangulated Wavefront OBJ via `tobj`.
pub struct ObjModelPlugin;

impl ResourcePlugin for ObjModelPlugin {
    fn name(&self) -> &'static str {
        "obj"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }
}

impl ModelPlugin for ObjModelPlugin {
    fn load(&self, path: &Path) -> Result<ModelData, ResourceError> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let mut data = ModelData::default();
        for model in models {
            let mesh = model.mesh;
            let positions = mesh
                .positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0], p[1], p[2]))
                .collect();
            data.meshes.push(MeshData {
                positions,
                indices: mesh.indices,
            });
        }
        log::debug!(
            "loaded model {:?}: {} meshes, {} triangles",
            path,
            data.meshes.len(),
            data.triangle_count()
        );
        Ok(data)
    }
}
