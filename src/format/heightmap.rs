//! 16-bit grayscale PNG heightmaps.
//!
//! Image row `y` maps to grid row `y`, image column `x` to grid column `x`.
//! Import scales full white to `heightmap_max_height`; export scales
//! `max_vertex_height` to full white.

use std::path::Path;

use image::{ImageBuffer, Luma};

use crate::core::config::EditorConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::render::LightSettings;
use crate::terrain::{TerrainPage, TerrainPatch};
use super::{ImportedTerrain, TerrainFormat};

pub struct HeightmapFormat;

impl TerrainFormat for HeightmapFormat {
    fn name(&self) -> &str {
        "heightmap"
    }

    fn extensions(&self) -> &[&str] {
        &["png"]
    }

    fn import(&self, path: &Path, config: &EditorConfig) -> Result<ImportedTerrain> {
        let image = image::open(path)?.to_luma16();
        let (columns, rows) = image.dimensions();
        if rows < 2 || columns < 2 {
            return Err(Error::InvalidDimensions {
                rows: rows as usize,
                columns: columns as usize,
            });
        }

        let scale = config.heightmap_max_height / u16::MAX as f32;
        let heights: Vec<f32> = image.pixels().map(|p| p.0[0] as f32 * scale).collect();

        let mut patch = TerrainPatch::new(
            rows as usize,
            columns as usize,
            config.default_width,
            config.default_height,
        )?;
        patch.set_heights(&heights)?;
        patch.calculate_normals();
        patch.clear_changed();

        // Keep imported peaks intact even if the editor clamp is lower
        let max = config.max_vertex_height.max(config.heightmap_max_height);
        let mut page = TerrainPage::new(patch, max)?;
        page.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "heightmap".to_string());

        log::info!("Imported {}x{} heightmap from {}", columns, rows, path.display());
        Ok(ImportedTerrain { page, lighting: None })
    }

    fn export(&self, page: &TerrainPage, _lighting: &LightSettings, path: &Path) -> Result<()> {
        let patch = page.patch();
        let max = page.max_vertex_height();
        let pixels: Vec<u16> = patch
            .heights()
            .iter()
            .map(|h| ((h / max).clamp(0.0, 1.0) * u16::MAX as f32).round() as u16)
            .collect();

        let image: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(patch.columns() as u32, patch.rows() as u32, pixels)
                .ok_or_else(|| Error::Format("heightmap buffer size mismatch".into()))?;
        image.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ridge.png");

        let mut patch = TerrainPatch::new(3, 5, 40.0, 20.0).unwrap();
        let heights: Vec<f32> = (0..15).map(|i| (i % 5) as f32 * 4.0).collect();
        patch.set_heights(&heights).unwrap();
        let page = TerrainPage::new(patch, 16.0).unwrap();

        HeightmapFormat.export(&page, &LightSettings::default(), &path).unwrap();

        let config = EditorConfig {
            heightmap_max_height: 16.0,
            default_width: 40.0,
            default_height: 20.0,
            ..Default::default()
        };
        let imported = HeightmapFormat.import(&path, &config).unwrap();
        assert!(imported.lighting.is_none());

        let loaded = imported.page;
        assert_eq!(loaded.name, "ridge");
        assert_eq!(loaded.patch().rows(), 3);
        assert_eq!(loaded.patch().columns(), 5);
        for (a, b) in loaded.patch().heights().iter().zip(&heights) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_import_scales_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.png");
        let image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(2, 2, Luma([u16::MAX]));
        image.save(&path).unwrap();

        let config = EditorConfig {
            heightmap_max_height: 100.0,
            max_vertex_height: 50.0,
            ..Default::default()
        };
        let page = HeightmapFormat.import(&path, &config).unwrap().page;
        assert_eq!(page.max_vertex_height(), 100.0);
        assert!(page.patch().heights().iter().all(|&h| (h - 100.0).abs() < 1e-3));
    }

    #[test]
    fn test_rejects_single_pixel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(1, 1, Luma([0]));
        image.save(&path).unwrap();

        assert!(matches!(
            HeightmapFormat.import(&path, &EditorConfig::default()),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(HeightmapFormat
            .import(Path::new("/nonexistent/terrain.png"), &EditorConfig::default())
            .is_err());
    }
}
