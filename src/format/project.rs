//! Versioned JSON project file holding one terrain page and its lighting

use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::config::EditorConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::render::LightSettings;
use crate::terrain::{TerrainPage, TerrainPatch, Texture};
use super::{ImportedTerrain, TerrainFormat};

/// Current version of the project format
pub const PROJECT_VERSION: u32 = 1;

/// On-disk layout. Derived data (normals, indices, UVs) is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectFile {
    version: u32,
    name: String,
    rows: usize,
    columns: usize,
    width: f32,
    height: f32,
    max_vertex_height: f32,
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    heights: Vec<f32>,
    textures: Vec<Texture>,
    #[serde(default)]
    lighting: LightSettings,
}

impl ProjectFile {
    fn from_page(page: &TerrainPage, lighting: &LightSettings) -> Self {
        let patch = page.patch();
        Self {
            version: PROJECT_VERSION,
            name: page.name.clone(),
            rows: patch.rows(),
            columns: patch.columns(),
            width: patch.width(),
            height: patch.height(),
            max_vertex_height: page.max_vertex_height(),
            position: page.position(),
            rotation: page.rotation(),
            scale: page.scale(),
            heights: patch.heights(),
            textures: patch.textures().to_vec(),
            lighting: lighting.clone(),
        }
    }

    fn into_imported(self) -> Result<ImportedTerrain> {
        if self.version != PROJECT_VERSION {
            return Err(Error::Format(format!("unsupported project version {}", self.version)));
        }

        // Check against the stored heights before allocating a grid of that size
        if self.rows.checked_mul(self.columns) != Some(self.heights.len()) {
            return Err(Error::Format(format!(
                "{}x{} grid does not match {} stored heights",
                self.rows,
                self.columns,
                self.heights.len()
            )));
        }

        let mut patch = TerrainPatch::new(self.rows, self.columns, self.width, self.height)?;
        patch.set_heights(&self.heights)?;
        for texture in self.textures {
            patch.add_texture(texture);
        }
        patch.calculate_normals();
        patch.clear_changed();

        let mut page = TerrainPage::new(patch, self.max_vertex_height)?;
        page.set_placement(self.position, self.rotation, self.scale)?;
        page.name = self.name;
        page.patch_mut().clear_changed();

        Ok(ImportedTerrain {
            page,
            lighting: Some(self.lighting),
        })
    }
}

/// The native lossless format
pub struct ProjectFormat;

impl TerrainFormat for ProjectFormat {
    fn name(&self) -> &str {
        "project"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn import(&self, path: &Path, _config: &EditorConfig) -> Result<ImportedTerrain> {
        let json = std::fs::read_to_string(path)?;
        let file: ProjectFile = serde_json::from_str(&json)?;
        file.into_imported()
    }

    fn export(&self, page: &TerrainPage, lighting: &LightSettings, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&ProjectFile::from_page(page, lighting))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}
