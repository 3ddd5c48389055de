//! Texture layers painted over the terrain grid

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::{Result, Vec2};

/// How a texture layer combines with the layers below it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendOp {
    #[default]
    Modulate,
    Modulate2x,
    Modulate4x,
    Add,
    AddSigned,
    Subtract,
    BlendTextureAlpha,
}

impl BlendOp {
    /// All blend operations in shader index order
    pub const ALL: [BlendOp; 7] = [
        BlendOp::Modulate,
        BlendOp::Modulate2x,
        BlendOp::Modulate4x,
        BlendOp::Add,
        BlendOp::AddSigned,
        BlendOp::Subtract,
        BlendOp::BlendTextureAlpha,
    ];

    /// Index passed to the terrain shader
    pub fn shader_index(self) -> u32 {
        match self {
            BlendOp::Modulate => 0,
            BlendOp::Modulate2x => 1,
            BlendOp::Modulate4x => 2,
            BlendOp::Add => 3,
            BlendOp::AddSigned => 4,
            BlendOp::Subtract => 5,
            BlendOp::BlendTextureAlpha => 6,
        }
    }
}

/// A texture layer: source image plus UV transform and blending
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    /// Image file backing this layer
    pub path: PathBuf,
    /// UV offset added after scaling
    pub shift: Vec2,
    /// Number of repeats across the whole patch
    pub scale: Vec2,
    /// Disabled layers keep their UVs but are skipped when drawing
    pub enabled: bool,
    pub blend: BlendOp,
}

impl Texture {
    /// Create an enabled layer covering the patch once
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            shift: Vec2::ZERO,
            scale: Vec2::ONE,
            enabled: true,
            blend: BlendOp::Modulate,
        }
    }

    pub fn with_transform(mut self, shift: Vec2, scale: Vec2) -> Self {
        self.shift = shift;
        self.scale = scale;
        self
    }

    pub fn with_blend(mut self, blend: BlendOp) -> Self {
        self.blend = blend;
        self
    }

    /// Display name (file stem of the source image)
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Map a normalized grid position to this layer's UV space
    pub fn uv_at(&self, grid: Vec2) -> Vec2 {
        grid * self.scale + self.shift
    }

    /// Source path with relative paths joined onto `base`
    pub fn resolved_path(&self, base: Option<&Path>) -> PathBuf {
        match base {
            Some(base) if self.path.is_relative() => base.join(&self.path),
            _ => self.path.clone(),
        }
    }

    /// Decode the source image to RGBA8, resolving relative paths against `base`
    pub fn load_image(&self, base: Option<&Path>) -> Result<image::RgbaImage> {
        Ok(image::open(self.resolved_path(base))?.to_rgba8())
    }
}
