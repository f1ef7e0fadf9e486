//! Render stage: load, frame, rasterize, write.

use std::path::Path;

use crate::config::SpriteConfig;
use crate::error::Result;
use crate::export::{self, SpriteMeta};
use crate::framing::{self, Framing};
use crate::model;
use crate::render::RenderBackend;
use crate::scene::Scene;

pub use crate::normalize::{normalize_batch, BatchReport};

#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub framing: Framing,
    pub size: u32,
    pub mesh_count: usize,
    pub triangle_count: usize,
}

impl RenderSummary {
    pub fn meta(&self, source: &Path, output: &Path) -> SpriteMeta {
        SpriteMeta::new(
            source,
            output,
            self.size,
            self.mesh_count,
            self.triangle_count,
            &self.framing,
        )
    }
}

/// Renders the model at `model_path` into a transparent `size` x `size` PNG.
///
/// The scene lives only for the duration of this call.
pub fn render_model<B: RenderBackend>(
    model_path: &Path,
    output: &Path,
    size: u32,
    config: &SpriteConfig,
    backend: &mut B,
) -> Result<RenderSummary> {
    config.validate()?;
    let mut scene = model::load_scene(model_path)?;
    render_scene(&mut scene, output, size, config, backend)
}

/// Frames an already built scene and writes the render to `output`.
pub fn render_scene<B: RenderBackend>(
    scene: &mut Scene,
    output: &Path,
    size: u32,
    config: &SpriteConfig,
    backend: &mut B,
) -> Result<RenderSummary> {
    let framing = framing::frame_scene(scene, &config.framing)?;
    let image = backend.render(scene, &framing.camera, size)?;
    export::write_png(&image, output)?;
    log::info!(
        "{} backend rendered {}x{} to {} (ortho_scale {:.4})",
        backend.name(), size, size, output.display(), framing.camera.ortho_scale
    );
    Ok(RenderSummary {
        framing,
        size,
        mesh_count: scene.len(),
        triangle_count: scene.triangle_count(),
    })
}
