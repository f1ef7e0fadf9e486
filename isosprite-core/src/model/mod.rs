//! glTF 2.0 loading into a fresh [`Scene`].
//!
//! glTF is Y-up while the framing constants are Z-up, so the loader applies
//! the same axis conversion as common DCC importers: (x, y, z) -> (x, -z, y).
//! Only triangle-list primitives are kept; textures are not read.

use std::path::Path;

use glam::{Mat4, Vec3, Vec4};

use crate::error::{Error, Result};
use crate::scene::{MeshInstance, Scene};

/// Rotation taking glTF's Y-up axes into the Z-up world.
pub fn y_up_to_z_up() -> Mat4 {
    Mat4::from_cols(Vec4::X, Vec4::Z, Vec4::NEG_Y, Vec4::W)
}

pub fn load_scene(path: &Path) -> Result<Scene> {
    let load_err = |source| Error::ModelLoad {
        path: path.to_path_buf(), source
    };
    let gltf = gltf::Gltf::open(path).map_err(load_err)?;
    let buffers = gltf::import_buffers(&gltf.document, path.parent(), gltf.blob.clone())
        .map_err(load_err)?;

    let mut scene = Scene::new();
    let root = gltf.document.default_scene().or_else(|| gltf.document.scenes().next());
    if let Some(root) = root {
        for node in root.nodes() {
            visit(&node, y_up_to_z_up(), &buffers, &mut scene);
        }
    }
    if scene.is_empty() {
        return Err(Error::EmptyModel);
    }
    log::info!(
        "loaded {} meshes ({} triangles) from {}",
        scene.len(),
        scene.triangle_count(),
        path.display()
    );
    Ok(scene)
}

fn visit(node: &gltf::Node<'_>, parent: Mat4, buffers: &[gltf::buffer::Data], scene: &mut Scene) {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        let label = node.name().or(mesh.name()).unwrap_or("mesh");
        for (i, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("{label}: skipping primitive {i} with mode {:?}", primitive.mode());
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            let pbr = primitive.material().pbr_metallic_roughness();
            let color = Vec4::from_array(pbr.base_color_factor());
            if let Some(instance) = MeshInstance::new(format!("{label}#{i}"), positions, indices) {
                scene.add_mesh(instance.with_transform(transform).with_base_color(color));
            }
        }
    }
    for child in node.children() {
        visit(&child, transform, buffers, scene);
    }
}
