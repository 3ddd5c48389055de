use std::path::{Path, PathBuf};

use glam::{Quat, Vec2, Vec3};

use crate::algorithm::AlgorithmRegistry;
use crate::core::camera::Camera;
use crate::core::config::{EditorConfig, SoftSelectionConfig};
use crate::core::types::Result;
use crate::format::FormatRegistry;
use crate::history::HistoryManager;
use crate::math::Ray;
use crate::render::{BufferObjects, LightSettings, SyncKind, TextureCache};
use crate::terrain::{BlendOp, SelectPhase, SoftSelection, TerrainPage, TerrainPatch, Texture};

/// Vertex drag in progress. The snapshot is recorded on the first move that
/// actually changes a height, so a drag is one history entry.
struct DragState {
    before: Option<TerrainPage>,
}

/// One open terrain document and everything needed to edit and draw it
pub struct TerrainEditor {
    config: EditorConfig,
    page: TerrainPage,
    lighting: LightSettings,
    history: HistoryManager,
    buffers: BufferObjects,
    textures: TextureCache,
    textures_dirty: bool,
    /// Directory relative texture paths resolve against
    texture_base: Option<PathBuf>,
    algorithms: AlgorithmRegistry,
    formats: FormatRegistry,
    soft_selection: SoftSelectionConfig,
    drag: Option<DragState>,
    modified: bool,
}

impl TerrainEditor {
    /// Start a session with a flat terrain of the configured default size
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let patch = TerrainPatch::new(
            config.default_rows,
            config.default_columns,
            config.default_width,
            config.default_height,
        )?;
        let page = TerrainPage::new(patch, config.max_vertex_height)?;

        Ok(Self {
            history: HistoryManager::new(config.history_depth),
            soft_selection: config.soft_selection,
            config,
            page,
            lighting: LightSettings::default(),
            buffers: BufferObjects::new(),
            textures: TextureCache::new(),
            textures_dirty: true,
            texture_base: None,
            algorithms: AlgorithmRegistry::with_builtins(),
            formats: FormatRegistry::with_builtins(),
            drag: None,
            modified: false,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn page(&self) -> &TerrainPage {
        &self.page
    }

    pub fn lighting(&self) -> &LightSettings {
        &self.lighting
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn buffers(&self) -> &BufferObjects {
        &self.buffers
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn algorithms(&self) -> &AlgorithmRegistry {
        &self.algorithms
    }

    pub fn algorithms_mut(&mut self) -> &mut AlgorithmRegistry {
        &mut self.algorithms
    }

    pub fn formats_mut(&mut self) -> &mut FormatRegistry {
        &mut self.formats
    }

    pub fn soft_selection(&self) -> SoftSelectionConfig {
        self.soft_selection
    }

    /// Unsaved edits since the last create, open or save
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    // ---------------------------------------------------------------------
    // Documents
    // ---------------------------------------------------------------------

    /// Replace the document with a flat terrain. History is cleared.
    pub fn create_terrain(&mut self, rows: usize, columns: usize, width: f32, height: f32) -> Result<()> {
        let patch = TerrainPatch::new(rows, columns, width, height)?;
        let page = TerrainPage::new(patch, self.config.max_vertex_height)?;
        log::info!("New terrain {}x{} ({} x {})", rows, columns, width, height);
        self.replace_document(page, None);
        self.texture_base = None;
        Ok(())
    }

    /// Rebuild the grid at a new resolution. Heights are reset.
    pub fn resize_terrain(&mut self, rows: usize, columns: usize) -> Result<()> {
        self.edit("Resize terrain", |page| page.patch_mut().resize(rows, columns))?;
        self.buffers.mark_refresh_buffers();
        log::info!("Resized terrain to {}x{}", rows, columns);
        Ok(())
    }

    /// Load a document with the format matching the file extension
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = self.formats.for_path(path)?;
        let imported = format.import(path, &self.config)?;
        log::info!("Opened {} as {}", path.display(), format.name());

        self.replace_document(imported.page, imported.lighting);
        self.texture_base = path.parent().map(Path::to_path_buf);
        Ok(())
    }

    /// Write the document with the format matching the file extension
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = self.formats.for_path(path)?;
        format.export(&self.page, &self.lighting, path)?;
        log::info!("Saved {} as {}", path.display(), format.name());
        self.modified = false;
        Ok(())
    }

    fn replace_document(&mut self, page: TerrainPage, lighting: Option<LightSettings>) {
        self.page = page;
        if let Some(lighting) = lighting {
            self.lighting = lighting;
        }
        self.history.clear();
        self.drag = None;
        self.buffers.mark_refresh_buffers();
        self.textures_dirty = true;
        self.modified = false;
    }

    // ---------------------------------------------------------------------
    // Selection and vertex movement
    // ---------------------------------------------------------------------

    /// Pick along a world-space ray. Selection is not part of history.
    pub fn select_vertex(&mut self, ray: &Ray, phase: SelectPhase, multi_select: bool) -> Option<usize> {
        let hit = self.page.select_vertex(ray, phase, multi_select);
        self.buffers.mark_refresh_vertices();
        hit
    }

    /// Pick under a cursor position in pixels
    #[allow(clippy::too_many_arguments)]
    pub fn pick_screen(
        &mut self,
        camera: &Camera,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        phase: SelectPhase,
        multi_select: bool,
    ) -> Option<usize> {
        let ray = camera.screen_ray(x, y, width, height);
        self.select_vertex(&ray, phase, multi_select)
    }

    pub fn clear_selection(&mut self) {
        self.page.patch_mut().reset_selection();
        self.buffers.mark_refresh_vertices();
    }

    /// Start a mouse drag. Returns false when nothing is selected.
    pub fn begin_vertex_drag(&mut self) -> bool {
        if self.page.patch().selected_count() == 0 {
            return false;
        }
        self.drag = Some(DragState {
            before: Some(self.page.clone()),
        });
        true
    }

    /// Move the selection by a vertical mouse delta in pixels. Moving the
    /// mouse up (negative delta) raises the terrain.
    pub fn drag_vertices(&mut self, mouse_dy: f32) -> usize {
        let soft = self.soft_option();
        let Some(drag) = self.drag.as_mut() else {
            return 0;
        };

        let dist = -mouse_dy * self.config.mouse_sensitivity;
        let moved = self.page.move_selected_vertices(dist, soft);
        if moved > 0 {
            if let Some(before) = drag.before.take() {
                self.history.record_edit(before, "Move vertices");
            }
            self.buffers.mark_refresh_vertices();
            self.modified = true;
        }
        moved
    }

    pub fn end_vertex_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            log::debug!("Vertex drag finished (moved: {})", drag.before.is_none());
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Move the selection by an absolute height offset as one edit
    pub fn move_selected(&mut self, dist_change: f32) -> usize {
        let soft = self.soft_option();
        let before = self.page.clone();
        let moved = self.page.move_selected_vertices(dist_change, soft);
        if moved > 0 {
            self.history.record_edit(before, "Move vertices");
            self.buffers.mark_refresh_vertices();
            self.modified = true;
        }
        moved
    }

    fn soft_option(&self) -> Option<SoftSelection> {
        let soft = self.soft_selection;
        soft.enabled.then(|| SoftSelection::new(soft.radius, soft.falloff))
    }

    // ---------------------------------------------------------------------
    // Algorithms
    // ---------------------------------------------------------------------

    /// Run a registered algorithm over the whole patch.
    ///
    /// On failure the page is restored and no history entry is recorded.
    pub fn apply_algorithm(&mut self, name: &str) -> Result<()> {
        let algorithm = self.algorithms.get(name)?;
        let before = self.page.clone();

        if let Err(e) = algorithm.apply(self.page.patch_mut()) {
            log::warn!("Algorithm '{}' failed: {}", name, e);
            self.page = before;
            return Err(e);
        }

        self.page.clamp_heights();
        self.page.patch_mut().calculate_normals();
        self.history.record_edit(before, format!("Apply {name}"));
        self.buffers.mark_refresh_vertices();
        self.modified = true;
        log::info!("Applied algorithm '{}'", name);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Texture layers
    // ---------------------------------------------------------------------

    pub fn add_texture(&mut self, texture: Texture) -> Result<usize> {
        let index = self.edit("Add texture", |page| Ok(page.patch_mut().add_texture(texture)))?;
        self.mark_layers_dirty();
        Ok(index)
    }

    pub fn remove_texture(&mut self, index: usize) -> Result<Texture> {
        let removed = self.edit("Remove texture", |page| page.patch_mut().remove_texture(index))?;
        self.mark_layers_dirty();
        Ok(removed)
    }

    /// Returns false (and records nothing) when the layer already is on top
    pub fn move_texture_up(&mut self, index: usize) -> Result<bool> {
        self.page.patch().texture(index)?;
        if index + 1 >= self.page.patch().texture_count() {
            return Ok(false);
        }
        self.edit("Move texture up", |page| page.patch_mut().move_texture_up(index))?;
        self.mark_layers_dirty();
        Ok(true)
    }

    /// Returns false (and records nothing) when the layer already is at the bottom
    pub fn move_texture_down(&mut self, index: usize) -> Result<bool> {
        self.page.patch().texture(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.edit("Move texture down", |page| page.patch_mut().move_texture_down(index))?;
        self.mark_layers_dirty();
        Ok(true)
    }

    pub fn set_texture_transform(&mut self, index: usize, shift: Vec2, scale: Vec2) -> Result<()> {
        self.edit("Texture transform", |page| {
            let patch = page.patch_mut();
            let texture = patch.texture_mut(index)?;
            texture.shift = shift;
            texture.scale = scale;
            patch.set_texture_coordinates(index)
        })?;
        self.buffers.mark_refresh_buffers();
        Ok(())
    }

    pub fn set_texture_blend(&mut self, index: usize, blend: BlendOp) -> Result<()> {
        self.edit("Texture blend", |page| {
            page.patch_mut().texture_mut(index)?.blend = blend;
            Ok(())
        })?;
        self.buffers.mark_refresh_buffers();
        Ok(())
    }

    pub fn set_texture_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.edit("Texture visibility", |page| {
            page.patch_mut().texture_mut(index)?.enabled = enabled;
            Ok(())
        })?;
        self.buffers.mark_refresh_buffers();
        Ok(())
    }

    fn mark_layers_dirty(&mut self) {
        self.buffers.mark_refresh_buffers();
        self.textures_dirty = true;
    }

    // ---------------------------------------------------------------------
    // Page settings
    // ---------------------------------------------------------------------

    pub fn set_max_vertex_height(&mut self, max: f32) -> Result<()> {
        self.edit("Max height", |page| page.set_max_vertex_height(max))?;
        self.buffers.mark_refresh_vertices();
        Ok(())
    }

    pub fn set_placement(&mut self, position: Vec3, rotation: Quat, scale: Vec3) -> Result<()> {
        self.edit("Placement", |page| page.set_placement(position, rotation, scale))
    }

    /// Lighting is a session setting and is not part of undo history
    pub fn set_lighting(&mut self, lighting: LightSettings) {
        self.lighting = lighting;
        self.modified = true;
    }

    pub fn set_soft_selection(&mut self, soft: SoftSelectionConfig) {
        self.soft_selection = soft;
    }

    /// Snapshot, mutate, and record one history entry. The page is restored
    /// if `f` fails.
    fn edit<T>(&mut self, label: &str, f: impl FnOnce(&mut TerrainPage) -> Result<T>) -> Result<T> {
        let before = self.page.clone();
        match f(&mut self.page) {
            Ok(value) => {
                self.history.record_edit(before, label);
                self.modified = true;
                Ok(value)
            }
            Err(e) => {
                self.page = before;
                Err(e)
            }
        }
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    pub fn undo(&mut self) -> Option<String> {
        let label = self.history.undo(&mut self.page)?;
        log::info!("Undo: {}", label);
        self.after_history_step();
        Some(label)
    }

    pub fn redo(&mut self) -> Option<String> {
        let label = self.history.redo(&mut self.page)?;
        log::info!("Redo: {}", label);
        self.after_history_step();
        Some(label)
    }

    fn after_history_step(&mut self) {
        self.drag = None;
        self.buffers.mark_refresh_buffers();
        self.textures_dirty = true;
        self.modified = true;
    }

    // ---------------------------------------------------------------------
    // GPU mirror
    // ---------------------------------------------------------------------

    /// Refresh the CPU staging copy of the terrain buffers
    pub fn sync_buffers(&mut self) -> SyncKind {
        self.buffers.sync(self.page.patch())
    }

    /// Sync and upload buffers, then bring the texture cache in line with the
    /// layer list.
    pub fn update_gpu(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<SyncKind> {
        let kind = self.buffers.update(self.page.patch(), device, queue)?;
        if self.textures_dirty {
            let loaded = self.textures.sync(
                device,
                queue,
                self.page.patch().textures(),
                self.texture_base.as_deref(),
            );
            log::debug!("Texture cache synced, {} images loaded", loaded);
            self.textures_dirty = false;
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::TerrainAlgorithm;
    use crate::core::error::Error;

    fn small_config() -> EditorConfig {
        EditorConfig {
            default_rows: 9,
            default_columns: 9,
            default_width: 32.0,
            default_height: 32.0,
            max_vertex_height: 10.0,
            ..Default::default()
        }
    }

    /// Straight down onto grid point (row, column) of a 4-unit grid
    fn ray_at(row: usize, column: usize) -> Ray {
        Ray::new(
            Vec3::new(column as f32 * 4.0, 100.0, row as f32 * 4.0),
            Vec3::NEG_Y,
        )
    }

    struct Broken;

    impl TerrainAlgorithm for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn apply(&self, patch: &mut TerrainPatch) -> Result<()> {
            patch.set_height(0, 5.0)?;
            Err(Error::Algorithm {
                name: "broken".into(),
                reason: "gave up halfway".into(),
            })
        }
    }

    #[test]
    fn test_new_editor_is_clean() {
        let editor = TerrainEditor::new(small_config()).unwrap();
        assert_eq!(editor.page().patch().vertex_count(), 81);
        assert!(!editor.is_modified());
        assert!(!editor.history().can_undo());
        assert!(editor.buffers().needs_refresh());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EditorConfig {
            default_rows: 1,
            ..small_config()
        };
        assert!(TerrainEditor::new(config).is_err());
    }

    #[test]
    fn test_drag_is_one_history_entry() {
        crate::core::logging::try_init_for_tests();
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        let index = editor.select_vertex(&ray_at(2, 3), SelectPhase::Begin, false);
        assert_eq!(index, Some(2 * 9 + 3));

        assert!(editor.begin_vertex_drag());
        assert!(editor.drag_vertices(-20.0) > 0);
        assert!(editor.drag_vertices(-20.0) > 0);
        editor.end_vertex_drag();

        assert_eq!(editor.history().undo_len(), 1);
        assert!((editor.page().patch().height_of(21).unwrap() - 2.0).abs() < 1e-5);
        assert!(editor.is_modified());

        assert_eq!(editor.undo().as_deref(), Some("Move vertices"));
        assert_eq!(editor.page().patch().height_of(21).unwrap(), 0.0);
        assert!(editor.redo().is_some());
        assert!((editor.page().patch().height_of(21).unwrap() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_pick_screen_center() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        let camera = Camera::look_at(Vec3::new(16.0, 40.0, 40.0), Vec3::new(16.0, 0.0, 16.0), Vec3::Y);

        let hit = editor.pick_screen(&camera, 640.0, 360.0, 1280.0, 720.0, SelectPhase::Begin, false);
        assert_eq!(hit, Some(4 * 9 + 4));
        assert_eq!(editor.page().patch().selected_count(), 1);

        // Off the terrain entirely: a fresh click clears the selection
        assert_eq!(editor.pick_screen(&camera, 0.0, 0.0, 1280.0, 720.0, SelectPhase::Begin, false), None);
        assert_eq!(editor.page().patch().selected_count(), 0);
    }

    #[test]
    fn test_drag_without_selection() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        assert!(!editor.begin_vertex_drag());
        assert_eq!(editor.drag_vertices(-10.0), 0);
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_drag_down_at_floor_records_nothing() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.select_vertex(&ray_at(1, 1), SelectPhase::Begin, false);
        assert!(editor.begin_vertex_drag());
        assert_eq!(editor.drag_vertices(40.0), 0);
        editor.end_vertex_drag();
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_soft_selection_moves_neighbours() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.set_soft_selection(SoftSelectionConfig {
            enabled: true,
            radius: 8.0,
            falloff: true,
        });
        editor.select_vertex(&ray_at(4, 4), SelectPhase::Begin, false);
        editor.move_selected(4.0);

        let patch = editor.page().patch();
        assert_eq!(patch.height_of(4 * 9 + 4).unwrap(), 4.0);
        // one cell away: 1 - 4/8
        assert!((patch.height_of(4 * 9 + 5).unwrap() - 2.0).abs() < 1e-5);
        // exactly on the radius
        assert_eq!(patch.height_of(4 * 9 + 6).unwrap(), 0.0);
    }

    #[test]
    fn test_failed_algorithm_restores_page() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.algorithms_mut().register(Box::new(Broken));
        let before = editor.page().clone();

        assert!(matches!(editor.apply_algorithm("broken"), Err(Error::Algorithm { .. })));
        assert_eq!(editor.page(), &before);
        assert!(!editor.history().can_undo());
        assert!(!editor.is_modified());

        assert!(matches!(editor.apply_algorithm("missing"), Err(Error::UnknownAlgorithm(_))));
    }

    #[test]
    fn test_algorithm_respects_height_clamp() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.apply_algorithm("fbm-noise").unwrap();

        let max = editor.page().max_vertex_height();
        assert!(editor.page().patch().heights().iter().all(|&h| (0.0..=max).contains(&h)));
        assert_eq!(editor.history().undo_label(), Some("Apply fbm-noise"));
    }

    #[test]
    fn test_texture_moves() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.add_texture(Texture::new("rock.png")).unwrap();
        editor.add_texture(Texture::new("grass.png")).unwrap();
        assert_eq!(editor.history().undo_len(), 2);

        assert!(!editor.move_texture_up(1).unwrap());
        assert!(!editor.move_texture_down(0).unwrap());
        assert_eq!(editor.history().undo_len(), 2);

        assert!(editor.move_texture_up(0).unwrap());
        assert_eq!(editor.page().patch().texture(0).unwrap().name(), "grass");
        assert!(editor.move_texture_up(5).is_err());

        editor.undo();
        assert_eq!(editor.page().patch().texture(0).unwrap().name(), "rock");
    }

    #[test]
    fn test_texture_settings() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        let layer = editor.add_texture(Texture::new("sand.png")).unwrap();

        editor.set_texture_transform(layer, Vec2::ZERO, Vec2::splat(2.0)).unwrap();
        editor.set_texture_blend(layer, BlendOp::Add).unwrap();
        editor.set_texture_enabled(layer, false).unwrap();

        let patch = editor.page().patch();
        assert_eq!(patch.uvs(layer).unwrap()[80], Vec2::splat(2.0));
        assert_eq!(patch.texture(layer).unwrap().blend, BlendOp::Add);
        assert!(!patch.texture(layer).unwrap().enabled);

        assert!(editor.remove_texture(3).is_err());
        assert_eq!(editor.history().undo_len(), 4);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.add_texture(Texture::new("a.png")).unwrap();
        editor.undo();
        assert!(editor.history().can_redo());

        editor.set_max_vertex_height(5.0).unwrap();
        assert!(!editor.history().can_redo());
    }

    #[test]
    fn test_unbounded_history_depth_from_config() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "history_depth": 18446744073709551615, "default_rows": 3, "default_columns": 3 }"#)
                .unwrap();
        let mut editor = TerrainEditor::new(config).unwrap();
        editor.add_texture(Texture::new("a.png")).unwrap();
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_invalid_placement_is_not_recorded() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        assert!(editor.set_placement(Vec3::ZERO, Quat::IDENTITY, Vec3::ZERO).is_err());
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_selection_syncs_single_vertex() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        assert_eq!(editor.sync_buffers(), SyncKind::Full);
        assert_eq!(editor.sync_buffers(), SyncKind::Clean);

        editor.select_vertex(&ray_at(3, 3), SelectPhase::Begin, false);
        assert_eq!(editor.sync_buffers(), SyncKind::Vertices(30..31));
    }

    #[test]
    fn test_resize_and_create() {
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.resize_terrain(5, 7).unwrap();
        assert_eq!(editor.page().patch().vertex_count(), 35);
        assert!(editor.history().can_undo());
        assert!(editor.resize_terrain(0, 7).is_err());

        editor.create_terrain(3, 3, 10.0, 10.0).unwrap();
        assert!(!editor.history().can_undo());
        assert!(!editor.is_modified());
        assert_eq!(editor.sync_buffers(), SyncKind::Full);
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("island.json");

        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.select_vertex(&ray_at(2, 2), SelectPhase::Begin, false);
        editor.move_selected(3.0);
        editor.set_lighting(LightSettings {
            elevation: 20.0,
            ..Default::default()
        });
        editor.save(&path).unwrap();
        assert!(!editor.is_modified());

        let mut other = TerrainEditor::new(EditorConfig::default()).unwrap();
        other.open(&path).unwrap();
        assert_eq!(other.page().patch().heights(), editor.page().patch().heights());
        assert_eq!(other.lighting().elevation, 20.0);
        assert!(!other.history().can_undo());

        assert!(matches!(other.open(dir.path().join("x.obj")), Err(Error::UnknownFormat(_))));
        assert_eq!(other.texture_base.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_new_terrain_forgets_texture_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("island.json");
        let mut editor = TerrainEditor::new(small_config()).unwrap();
        editor.save(&path).unwrap();

        editor.open(&path).unwrap();
        assert!(editor.texture_base.is_some());
        editor.create_terrain(3, 3, 10.0, 10.0).unwrap();
        assert!(editor.texture_base.is_none());
    }
}
