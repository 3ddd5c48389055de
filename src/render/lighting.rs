//! Directional scene light and its GPU uniform

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// User-adjustable directional light
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    /// Horizontal angle in degrees, 0 = +Z, 90 = +X
    pub azimuth: f32,
    /// Angle above the horizon in degrees
    pub elevation: f32,
    pub diffuse: [f32; 3],
    pub ambient: [f32; 3],
    pub enabled: bool,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            azimuth: 135.0,
            elevation: 45.0,
            diffuse: [1.0, 0.98, 0.92],
            ambient: [0.25, 0.25, 0.3],
            enabled: true,
        }
    }
}

impl LightSettings {
    /// Unit vector pointing from the surface towards the light
    pub fn direction(&self) -> Vec3 {
        let az = self.azimuth.to_radians();
        let el = self.elevation.to_radians();
        Vec3::new(el.cos() * az.sin(), el.sin(), el.cos() * az.cos()).normalize()
    }

    /// Lambert factor for a surface normal, ambient excluded
    pub fn diffuse_factor(&self, normal: Vec3) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        normal.normalize_or_zero().dot(self.direction()).max(0.0)
    }

    pub fn to_uniform(&self) -> LightUniform {
        LightUniform {
            direction: self.direction().to_array(),
            enabled: self.enabled as u32,
            diffuse: self.diffuse,
            _pad0: 0.0,
            ambient: self.ambient,
            _pad1: 0.0,
        }
    }
}

/// Light data for the terrain shader (48 bytes, vec3 fields padded to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// Direction towards the light (offset 0)
    pub direction: [f32; 3],
    /// Non-zero when lighting is on (offset 12)
    pub enabled: u32,
    /// Diffuse colour (offset 16)
    pub diffuse: [f32; 3],
    pub _pad0: f32,
    /// Ambient colour (offset 32)
    pub ambient: [f32; 3],
    pub _pad1: f32,
}
