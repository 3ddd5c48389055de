//! Fractal Brownian motion height generator

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::terrain::TerrainPatch;
use super::TerrainAlgorithm;

/// Parameters controlling FBM height generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FbmParams {
    pub seed: u32,
    pub scale: f32,        // Horizontal scale (larger = smoother)
    pub height_scale: f32, // Vertical scale (max height)
    pub octaves: u32,      // FBM octaves (detail levels)
    pub persistence: f32,  // FBM persistence (0.5 typical)
    pub lacunarity: f32,   // FBM lacunarity (2.0 typical)
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 100.0,
            height_scale: 32.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Replaces every height with FBM Perlin noise mapped to `[0, height_scale]`
pub struct FbmNoise {
    params: FbmParams,
    noise: Fbm<Perlin>,
}

impl FbmNoise {
    pub fn new(params: FbmParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves((params.octaves as usize).max(1))
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    pub fn params(&self) -> &FbmParams {
        &self.params
    }

    /// Noise height at patch-local position (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // [-1, 1] -> [0, height_scale]
        let normalized = ((self.noise.get([nx, nz]) + 1.0) / 2.0).clamp(0.0, 1.0);
        (normalized * self.params.height_scale as f64) as f32
    }
}

impl Default for FbmNoise {
    fn default() -> Self {
        Self::new(FbmParams::default())
    }
}

impl TerrainAlgorithm for FbmNoise {
    fn name(&self) -> &str {
        "fbm-noise"
    }

    fn description(&self) -> &str {
        "Generate rolling hills from fractal Perlin noise"
    }

    fn apply(&self, patch: &mut TerrainPatch) -> Result<()> {
        if !(self.params.scale > 0.0) || self.params.octaves == 0 {
            return Err(Error::Algorithm {
                name: self.name().to_string(),
                reason: format!("scale must be positive and octaves non-zero ({:?})", self.params),
            });
        }
        let heights: Vec<f32> = patch
            .positions()
            .iter()
            .map(|p| self.height_at(p.x, p.z))
            .collect();
        patch.set_heights(&heights)
    }
}
