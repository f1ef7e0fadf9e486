//! Flat Lambert shading from sun lights plus an ambient term.

use glam::{Vec3, Vec4};

use crate::config::RenderConfig;

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Direction the light travels, unit length.
    pub direction: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub struct Lighting {
    pub ambient: f32,
    pub lights: Vec<DirectionalLight>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl Lighting {
    pub fn from_config(cfg: &RenderConfig) -> Self {
        let lights = cfg
            .lights
            .iter()
            .map(|l| DirectionalLight {
                direction: Vec3::from_array(l.direction).normalize_or_zero(),
                intensity: l.intensity,
            })
            .collect();
        Self { ambient: cfg.ambient, lights }
    }

    /// Shades a surface with unit `normal`. The result is always opaque;
    /// material opacity is ignored.
    pub fn shade(&self, normal: Vec3, base: Vec4) -> [u8; 4] {
        let diffuse: f32 =
            self.lights.iter().map(|l| l.intensity * normal.dot(-l.direction).max(0.0)).sum();
        let rgb = (base.truncate() * (self.ambient + diffuse)).clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
        [rgb.x.round() as u8, rgb.y.round() as u8, rgb.z.round() as u8, 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_face_is_brighter_than_unlit() {
        let sun = DirectionalLight {
            direction: Vec3::NEG_Z, intensity: 0.8
        };
        let lighting = Lighting {
            ambient: 0.2, lights: vec![sun]
        };
        let base = Vec4::new(1.0, 0.5, 0.0, 1.0);
        let lit = lighting.shade(Vec3::Z, base);
        let unlit = lighting.shade(Vec3::NEG_Z, base);
        assert_eq!(lit, [255, 128, 0, 255]);
        assert_eq!(unlit, [51, 26, 0, 255]);
    }

    #[test]
    fn default_rig_lights_top_faces() {
        let lighting = Lighting::default();
        assert_eq!(lighting.lights.len(), 2);
        let top = lighting.shade(Vec3::Z, Vec4::ONE);
        let bottom = lighting.shade(Vec3::NEG_Z, Vec4::ONE);
        assert!(top[0] > bottom[0]);
        assert_eq!(top[3], 255);
    }
}
