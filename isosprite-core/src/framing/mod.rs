//! Automatic orthographic framing of a scene from a fixed view direction.
//!
//! The sequence is: recenter the model on the origin, recompute its bounds,
//! put the camera on the view direction, then size the orthographic view so
//! every bounding corner fits with `margin` to spare.

pub mod camera;

pub use camera::CameraFrame;

use glam::Vec3;

use crate::config::FramingConfig;
use crate::error::{Error, Result};
use crate::scene::{Aabb, Scene};

/// Aggregate bounds of every mesh corner in world space.
pub type WorldBounds = Aabb;

/// Result of framing a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub camera: CameraFrame,
    /// Translation that was applied to every mesh to center the model.
    pub recenter_offset: Vec3,
    /// Bounds after recentering.
    pub bounds: WorldBounds,
}

/// The bounding volume: 8 world-space corners per mesh.
pub fn world_corners(scene: &Scene) -> Result<Vec<Vec3>> {
    if scene.is_empty() {
        return Err(Error::EmptyModel);
    }
    Ok(scene.meshes().iter().flat_map(|m| m.world_corners()).collect())
}

pub fn world_bounds(scene: &Scene) -> Result<WorldBounds> {
    let corners = world_corners(scene)?;
    Aabb::from_points(corners).ok_or(Error::EmptyModel)
}

/// Translates every mesh so the world bounds center sits at the origin.
/// Returns the translation applied.
pub fn recenter(scene: &mut Scene) -> Result<Vec3> {
    let offset = -world_bounds(scene)?.center();
    for mesh in scene.meshes_mut() {
        mesh.translate(offset);
    }
    log::debug!("recentered {} meshes by {:?}", scene.len(), offset);
    Ok(offset)
}

/// Places the camera on the view direction looking at `target`.
///
/// The distance is the configured one, raised when needed so the whole model
/// stays in front of the camera. It has no effect on the framing itself.
pub fn place_camera(target: Vec3, bounds: &WorldBounds, cfg: &FramingConfig) -> CameraFrame {
    let distance = cfg.camera_distance.max(2.0 * bounds.half_diagonal() + 1.0);
    let position = target + cfg.view_direction() * distance;
    CameraFrame::looking_at(position, target, cfg.up_axis(), cfg.min_ortho_scale)
}

/// Orthographic view size that contains every corner with `margin` to spare.
///
/// Both image axes share one scale so the projection stays square.
pub fn fit_ortho_scale(camera: &CameraFrame, corners: &[Vec3], cfg: &FramingConfig) -> f32 {
    let (right, up) = (camera.right(), camera.up());
    let (half_w, half_h) = corners.iter().fold((0.0f32, 0.0f32), |(w, h), &p| {
        let rel = p - camera.position;
        (w.max(rel.dot(right).abs()), h.max(rel.dot(up).abs()))
    });
    let scale = 2.0 * half_w.max(half_h) * cfg.margin;
    if scale < cfg.min_ortho_scale {
        log::warn!(
            "degenerate model extent ({half_w}, {half_h}); ortho scale floored at {}",
            cfg.min_ortho_scale
        );
        return cfg.min_ortho_scale;
    }
    scale
}

/// Recenters the scene and computes the camera that frames it.
pub fn frame_scene(scene: &mut Scene, cfg: &FramingConfig) -> Result<Framing> {
    let recenter_offset = recenter(scene)?;
    let corners = world_corners(scene)?;
    let bounds = Aabb::from_points(corners.iter().copied()).ok_or(Error::EmptyModel)?;
    let mut camera = place_camera(bounds.center(), &bounds, cfg);
    camera.ortho_scale = fit_ortho_scale(&camera, &corners, cfg);
    log::debug!(
        "camera at {:?} rotation {:?} ortho_scale {:.4}",
        camera.position, camera.rotation, camera.ortho_scale
    );
    Ok(Framing { camera, recenter_offset, bounds })
}
