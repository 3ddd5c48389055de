//! Editing session: ties the page, history, GPU caches and plugins together

pub mod terrain_editor;

pub use terrain_editor::TerrainEditor;
