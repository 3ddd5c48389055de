//! Editor configuration loaded from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Default soft selection settings applied to vertex moves
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftSelectionConfig {
    /// Whether unselected neighbours follow selected vertices
    pub enabled: bool,
    /// Horizontal influence radius in patch units
    pub radius: f32,
    /// Scale neighbour movement by `1 - distance / radius`
    pub falloff: bool,
}

impl Default for SoftSelectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 8.0,
            falloff: true,
        }
    }
}

/// Configuration for a terrain editing session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo (and redo) entries kept
    pub history_depth: usize,
    /// Grid rows used for a new terrain
    pub default_rows: usize,
    /// Grid columns used for a new terrain
    pub default_columns: usize,
    /// Extent along X of a new terrain
    pub default_width: f32,
    /// Extent along Z of a new terrain
    pub default_height: f32,
    /// Height clamp applied to every vertex
    pub max_vertex_height: f32,
    /// Height change per pixel of vertical mouse movement
    pub mouse_sensitivity: f32,
    /// Soft selection defaults
    pub soft_selection: SoftSelectionConfig,
    /// Height mapped to full white when importing heightmaps
    pub heightmap_max_height: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 30,
            default_rows: 65,
            default_columns: 65,
            default_width: 256.0,
            default_height: 256.0,
            max_vertex_height: 64.0,
            mouse_sensitivity: 0.05,
            soft_selection: SoftSelectionConfig::default(),
            heightmap_max_height: 64.0,
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::debug!("Loaded editor config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the editor cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.history_depth == 0 {
            return Err(Error::InvalidParameter("history_depth must be at least 1".into()));
        }
        if self.default_rows < 2 || self.default_columns < 2 {
            return Err(Error::InvalidDimensions {
                rows: self.default_rows,
                columns: self.default_columns,
            });
        }
        let positive = [
            ("default_width", self.default_width),
            ("default_height", self.default_height),
            ("max_vertex_height", self.max_vertex_height),
            ("heightmap_max_height", self.heightmap_max_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.soft_selection.radius.is_finite() || self.soft_selection.radius < 0.0 {
            return Err(Error::InvalidParameter("soft_selection.radius must be >= 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_depth, 30);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "history_depth": 5 }"#).unwrap();
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.default_rows, 65);
        assert!(!config.soft_selection.enabled);
    }

    #[test]
    fn test_validate_rejects_small_grid() {
        let config = EditorConfig {
            default_rows: 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let config = EditorConfig {
            history_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");

        let mut config = EditorConfig::default();
        config.mouse_sensitivity = 0.25;
        config.soft_selection.enabled = true;
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
