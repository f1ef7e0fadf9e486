pub mod mesh;
pub mod raster;
pub mod shading;

pub use raster::SoftwareRenderer;

use image::RgbaImage;

use crate::error::Result;
use crate::framing::CameraFrame;
use crate::scene::Scene;

/// Backend abstraction for turning a framed scene into a square RGBA raster.
///
/// The background must come out fully transparent.
pub trait RenderBackend {
    fn name(&self) -> &'static str;
    fn render(&mut self, scene: &Scene, camera: &CameraFrame, size: u32) -> Result<RgbaImage>;
}
