//! Terrain import/export formats.
//!
//! Each format implements [`TerrainFormat`] and is selected by file
//! extension through a [`FormatRegistry`].

pub mod project;
pub mod heightmap;

pub use project::ProjectFormat;
pub use heightmap::HeightmapFormat;

use std::path::Path;

use crate::core::config::EditorConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::render::LightSettings;
use crate::terrain::TerrainPage;

/// Result of an import. Formats without lighting leave it `None`.
#[derive(Debug, Clone)]
pub struct ImportedTerrain {
    pub page: TerrainPage,
    pub lighting: Option<LightSettings>,
}

/// A file format that can read and/or write terrain pages
pub trait TerrainFormat {
    /// Short identifier, e.g. `"project"`
    fn name(&self) -> &str;

    /// Lower-case file extensions handled, without the dot
    fn extensions(&self) -> &[&str];

    fn import(&self, path: &Path, config: &EditorConfig) -> Result<ImportedTerrain>;

    fn export(&self, page: &TerrainPage, lighting: &LightSettings, path: &Path) -> Result<()>;
}

/// Formats indexed by extension
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<Box<dyn TerrainFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ProjectFormat));
        registry.register(Box::new(HeightmapFormat));
        registry
    }

    /// Later registrations win for shared extensions
    pub fn register(&mut self, format: Box<dyn TerrainFormat>) {
        self.formats.insert(0, format);
    }

    pub fn by_name(&self, name: &str) -> Result<&dyn TerrainFormat> {
        self.formats
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
            .ok_or_else(|| Error::UnknownFormat(name.to_string()))
    }

    /// Pick the format handling the extension of `path`
    pub fn for_path(&self, path: &Path) -> Result<&dyn TerrainFormat> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))?;

        self.formats
            .iter()
            .find(|f| f.extensions().iter().any(|&e| e == ext))
            .map(|f| f.as_ref())
            .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|f| f.name())
    }
}
