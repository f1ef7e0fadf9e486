use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Every pipeline constant, grouped per stage. Any subset may be given in YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub framing: FramingConfig,
    pub render: RenderConfig,
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Direction from the model toward the camera. Need not be unit length.
    pub view_direction: [f32; 3],
    /// World axis the camera's vertical image axis leans toward.
    pub up_axis: [f32; 3],
    /// Scale-up applied to the tight fit; must exceed 1.
    pub margin: f32,
    pub camera_distance: f32,
    /// Floor for the orthographic view size of zero-extent models.
    pub min_ortho_scale: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            view_direction: [1.0, -1.0, 0.85],
            up_axis: [0.0, 0.0, 1.0],
            margin: 1.12,
            camera_distance: 10.0,
            min_ortho_scale: 1e-3,
        }
    }
}

impl FramingConfig {
    pub fn view_direction(&self) -> Vec3 {
        Vec3::from_array(self.view_direction).normalize_or_zero()
    }

    pub fn up_axis(&self) -> Vec3 {
        Vec3::from_array(self.up_axis).normalize_or_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub default_size: u32,
    /// Samples per pixel along each axis; 1 disables supersampling.
    pub supersample: u32,
    pub ambient: f32,
    /// Used for meshes that carry no material color.
    pub base_color: [f32; 4],
    pub lights: Vec<LightConfig>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_size: 512,
            supersample: 2,
            ambient: 0.3,
            base_color: [0.8, 0.8, 0.8, 1.0],
            lights: vec![
                LightConfig::new("key", [-0.3687, 0.5265, -0.766], 0.7),
                LightConfig::new("fill", [0.4924, -0.5868, -0.6428], 0.24),
            ],
        }
    }
}

impl RenderConfig {
    pub fn base_color(&self) -> Vec4 {
        Vec4::from_array(self.base_color)
    }
}

/// A sun light. `direction` is the direction the light travels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    #[serde(default)]
    pub name: String,
    pub direction: [f32; 3],
    pub intensity: f32,
}

impl LightConfig {
    pub fn new(name: impl Into<String>, direction: [f32; 3], intensity: f32) -> Self {
        Self { name: name.into(), direction, intensity }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub out_size: u32,
    pub pad_ratio: f32,
    /// Lower bound on the padding added around content, in pixels.
    pub min_pad: u32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { out_size: 512, pad_ratio: 0.09, min_pad: 2 }
    }
}
