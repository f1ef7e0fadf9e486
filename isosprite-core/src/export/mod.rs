//! PNG output and render metadata.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder, RgbaImage};

use crate::error::{Error, Result};
use crate::framing::Framing;

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(Error::io(parent))
        }
        _ => Ok(()),
    }
}

/// Writes an RGBA8 PNG with maximum compression, creating parent directories.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(Error::io(path))?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Best,
        FilterType::Adaptive,
    );
    encoder
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
        .map_err(Error::image(path))
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraMeta {
    pub position: [f32; 3],
    /// Quaternion as x, y, z, w.
    pub rotation: [f32; 4],
    pub ortho_scale: f32,
}

/// Sidecar record of how a sprite was rendered.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpriteMeta {
    pub source: String,
    pub output: String,
    pub size: u32,
    pub mesh_count: usize,
    pub triangle_count: usize,
    pub recenter_offset: [f32; 3],
    pub camera: CameraMeta,
}

impl SpriteMeta {
    pub fn new(
        source: &Path,
        output: &Path,
        size: u32,
        mesh_count: usize,
        triangle_count: usize,
        framing: &Framing,
    ) -> Self {
        let camera = &framing.camera;
        Self {
            source: source.display().to_string(),
            output: output.display().to_string(),
            size,
            mesh_count,
            triangle_count,
            recenter_offset: framing.recenter_offset.to_array(),
            camera: CameraMeta {
                position: camera.position.to_array(),
                rotation: camera.rotation.to_array(),
                ortho_scale: camera.ortho_scale,
            },
        }
    }
}

pub fn write_meta(meta: &SpriteMeta, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(path, json).map_err(Error::io(path))
}
