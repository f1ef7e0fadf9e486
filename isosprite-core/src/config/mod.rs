pub mod schema;

pub use schema::{FramingConfig, LightConfig, NormalizeConfig, RenderConfig, SpriteConfig};

use crate::error::{Error, Result};

pub fn load_from_yaml_str(s: &str) -> Result<SpriteConfig> {
    if s.trim().is_empty() {
        return Ok(SpriteConfig::default());
    }
    let cfg: SpriteConfig = serde_yaml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<SpriteConfig> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(Error::io(path))?;
    load_from_yaml_str(&data)
}

pub fn to_yaml(cfg: &SpriteConfig) -> Result<String> {
    Ok(serde_yaml::to_string(cfg)?)
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidConfig(msg.into())
}

impl SpriteConfig {
    pub fn validate(&self) -> Result<()> {
        self.framing.validate()?;
        self.render.validate()?;
        self.normalize.validate()
    }
}

impl FramingConfig {
    pub fn validate(&self) -> Result<()> {
        let dir = self.view_direction();
        let up = self.up_axis();
        if dir == glam::Vec3::ZERO {
            return Err(invalid("framing.view_direction must be non-zero"));
        }
        if up == glam::Vec3::ZERO {
            return Err(invalid("framing.up_axis must be non-zero"));
        }
        // Parallel vectors leave the camera roll undefined.
        if dir.cross(up).length() < 1e-4 {
            return Err(invalid("framing.view_direction must not be parallel to framing.up_axis"));
        }
        if !(self.margin > 1.0) || !self.margin.is_finite() {
            let msg = format!("framing.margin must be greater than 1 (got {})", self.margin);
            return Err(invalid(msg));
        }
        if !(self.camera_distance > 0.0) {
            return Err(invalid("framing.camera_distance must be positive"));
        }
        if !(self.min_ortho_scale > 0.0) {
            return Err(invalid("framing.min_ortho_scale must be positive"));
        }
        Ok(())
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_size == 0 {
            return Err(invalid("render.default_size must be at least 1"));
        }
        if !(1..=8).contains(&self.supersample) {
            return Err(invalid("render.supersample must be in 1..=8"));
        }
        if self.ambient < 0.0 {
            return Err(invalid("render.ambient must not be negative"));
        }
        for light in &self.lights {
            if glam::Vec3::from_array(light.direction).length_squared() == 0.0 {
                return Err(invalid(format!("light '{}' has a zero direction", light.name)));
            }
        }
        Ok(())
    }
}

impl NormalizeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.out_size == 0 {
            return Err(invalid("normalize.out_size must be at least 1"));
        }
        if !(self.pad_ratio >= 0.0) || !self.pad_ratio.is_finite() {
            return Err(invalid("normalize.pad_ratio must be a finite non-negative number"));
        }
        Ok(())
    }
}
