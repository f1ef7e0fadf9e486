//! CPU triangle rasterizer for orthographic sprite renders.
//!
//! Pixels not covered by geometry stay fully transparent. Supersampled
//! renders are reduced with a box filter on premultiplied color so edges do
//! not pick up the transparent background's black.

use glam::{Vec2, Vec3, Vec4};
use image::{Rgba, RgbaImage};

use super::shading::Lighting;
use super::RenderBackend;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::framing::CameraFrame;
use crate::scene::Scene;

pub struct SoftwareRenderer {
    lighting: Lighting,
    base_color: Vec4,
    supersample: u32,
}

impl SoftwareRenderer {
    pub fn new(cfg: &RenderConfig) -> Self {
        Self {
            lighting: Lighting::from_config(cfg),
            base_color: cfg.base_color(),
            supersample: cfg.supersample.max(1),
        }
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl RenderBackend for SoftwareRenderer {
    fn name(&self) -> &'static str {
        "software"
    }

    fn render(&mut self, scene: &Scene, camera: &CameraFrame, size: u32) -> Result<RgbaImage> {
        if size == 0 {
            return Err(Error::InvalidConfig("render size must be at least 1".into()));
        }
        let res = size * self.supersample;
        let mut target = Target::new(res);
        let ndc_from_world = camera.ndc_from_world();
        let toward_camera = -camera.forward();
        let half_res = res as f32 * 0.5;

        for mesh in scene.meshes() {
            let world: Vec<Vec3> =
                mesh.positions.iter().map(|&p| mesh.transform.transform_point3(p)).collect();
            let screen: Vec<Vec3> = world
                .iter()
                .map(|&p| {
                    let n = ndc_from_world.transform_point3(p);
                    Vec3::new((n.x + 1.0) * half_res, (1.0 - n.y) * half_res, n.z)
                })
                .collect();
            let base = mesh.base_color.unwrap_or(self.base_color);
            let mut skipped = 0usize;

            for tri in mesh.indices.chunks_exact(3) {
                let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                if a.max(b).max(c) >= world.len() {
                    skipped += 1;
                    continue;
                }
                let normal = (world[b] - world[a]).cross(world[c] - world[a]);
                if normal.length_squared() == 0.0 {
                    continue;
                }
                let mut normal = normal.normalize();
                // Faces are two-sided.
                if normal.dot(toward_camera) < 0.0 {
                    normal = -normal;
                }
                let color = self.lighting.shade(normal, base);
                target.fill_triangle([screen[a], screen[b], screen[c]], color);
            }
            if skipped > 0 {
                log::warn!(
                    "mesh '{}': skipped {} triangles with out-of-range indices",
                    mesh.name,
                    skipped
                );
            }
        }

        let image = target.into_image();
        Ok(if self.supersample > 1 { downsample(&image, self.supersample) } else { image })
    }
}

struct Target {
    size: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
}

impl Target {
    fn new(size: u32) -> Self {
        let n = (size as usize) * (size as usize);
        Self { size, color: vec![[0; 4]; n], depth: vec![f32::INFINITY; n] }
    }

    fn fill_triangle(&mut self, v: [Vec3; 3], color: [u8; 4]) {
        let area = edge(v[0], v[1], v[2].truncate());
        if area.abs() < 1e-12 {
            return;
        }
        let size = self.size as f32;
        let min_x = v.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
        let min_y = v.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
        let max_x = v.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max).ceil().min(size) as u32;
        let max_y = v.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max).ceil().min(size) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(v[1], v[2], p) / area;
                let w1 = edge(v[2], v[0], p) / area;
                let w2 = edge(v[0], v[1], p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let depth = w0 * v[0].z + w1 * v[1].z + w2 * v[2].z;
                if depth <= 0.0 {
                    continue;
                }
                let i = (y * self.size + x) as usize;
                if depth < self.depth[i] {
                    self.depth[i] = depth;
                    self.color[i] = color;
                }
            }
        }
    }

    fn into_image(self) -> RgbaImage {
        let raw = self.color.into_iter().flatten().collect();
        RgbaImage::from_raw(self.size, self.size, raw)
            .unwrap_or_else(|| RgbaImage::new(self.size, self.size))
    }
}

// Twice the signed area of (a, b, p) in screen space.
fn edge(a: Vec3, b: Vec3, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn downsample(image: &RgbaImage, factor: u32) -> RgbaImage {
    let samples = factor * factor;
    RgbaImage::from_fn(image.width() / factor, image.height() / factor, |x, y| {
        let mut acc = [0u32; 4];
        for dy in 0..factor {
            for dx in 0..factor {
                let p = image.get_pixel(x * factor + dx, y * factor + dy);
                let a = p[3] as u32;
                for c in 0..3 { acc[c] += p[c] as u32 * a; }
                acc[3] += a;
            }
        }
        if acc[3] == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let unpremul = |c: u32| ((c + acc[3] / 2) / acc[3]) as u8;
        let alpha = ((acc[3] + samples / 2) / samples) as u8;
        Rgba([unpremul(acc[0]), unpremul(acc[1]), unpremul(acc[2]), alpha])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FramingConfig;
    use crate::framing::frame_scene;
    use crate::render::mesh::{generate_box, generate_uv_sphere};
    use crate::scene::MeshInstance;
    use glam::Mat4;

    fn render_scene(mut scene: Scene, size: u32, supersample: u32) -> RgbaImage {
        let framing = frame_scene(&mut scene, &FramingConfig::default()).expect("frame");
        let cfg = RenderConfig {
            supersample, ..RenderConfig::default()
        };
        SoftwareRenderer::new(&cfg).render(&scene, &framing.camera, size).expect("render")
    }

    fn cube_scene() -> Scene {
        let (positions, indices) = generate_box(glam::Vec3::ONE);
        let mut scene = Scene::new();
        let at = Mat4::from_translation(glam::Vec3::new(3.0, 1.0, -2.0));
        let cube = MeshInstance::new("cube", positions, indices).expect("cube");
        scene.add_mesh(cube.with_transform(at));
        scene
    }

    #[test]
    fn framed_cube_keeps_clear_border() {
        let image = render_scene(cube_scene(), 64, 1);
        assert_eq!(image.dimensions(), (64, 64));
        let (w, h) = image.dimensions();
        for x in 0..w {
            assert_eq!(image.get_pixel(x, 0)[3], 0);
            assert_eq!(image.get_pixel(x, h - 1)[3], 0);
        }
        for y in 0..h {
            assert_eq!(image.get_pixel(0, y)[3], 0);
            assert_eq!(image.get_pixel(w - 1, y)[3], 0);
        }
        // The model projects onto the image center.
        assert_eq!(image.get_pixel(32, 32)[3], 255);
    }

    #[test]
    fn supersampled_render_has_soft_edges() {
        let image = render_scene(cube_scene(), 48, 4);
        assert_eq!(image.dimensions(), (48, 48));
        assert!(image.pixels().any(|p| p[3] > 0 && p[3] < 255));
        assert_eq!(image.get_pixel(0, 0)[3], 0);
        assert_eq!(image.get_pixel(24, 24)[3], 255);
    }

    #[test]
    fn nearer_surface_wins_depth_test() {
        let (positions, indices) = generate_uv_sphere(1.0, 12, 16);
        let mut scene = Scene::new();
        scene.add_mesh(
            MeshInstance::new("back", positions.clone(), indices.clone())
                .expect("sphere")
                .with_base_color(Vec4::new(1.0, 0.0, 0.0, 1.0)),
        );
        let toward_camera = FramingConfig::default().view_direction();
        scene.add_mesh(
            MeshInstance::new("front", positions, indices)
                .expect("sphere")
                .with_transform(
                    Mat4::from_translation(toward_camera * 1.5)
                        * Mat4::from_scale(glam::Vec3::splat(0.5)),
                )
                .with_base_color(Vec4::new(0.0, 0.0, 1.0, 1.0)),
        );
        let image = render_scene(scene, 96, 1);
        let mut blue = 0;
        for p in image.pixels() {
            if p[3] == 255 && p[2] > 0 {
                blue += 1; assert_eq!(p[0], 0);
            }
        }
        assert!(blue > 0);
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut scene = cube_scene();
        let framing = frame_scene(&mut scene, &FramingConfig::default()).expect("frame");
        assert!(SoftwareRenderer::default().render(&scene, &framing.camera, 0).is_err());
    }

    #[test]
    fn box_downsample_ignores_transparent_color() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, Rgba([200, 100, 50, 255]));
        let out = downsample(&image, 2);
        assert_eq!(out.get_pixel(0, 0), &Rgba([200, 100, 50, 64]));
    }
}
