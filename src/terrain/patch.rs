//! Heightfield grid: vertices, normals, triangle indices, selection and texture layers

use std::ops::Range;

use crate::core::error::Error;
use crate::core::types::{Result, Vec2, Vec3};
use crate::math::{geometry, Ray};
use super::texture::Texture;

/// A `rows x columns` grid of vertices laid out row-major on the XZ plane.
///
/// Vertex `(row, column)` lives at index `row * columns + column` and starts at
/// `(column * dx, 0, row * dz)`. Heights are the Y components.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainPatch {
    rows: usize,
    columns: usize,
    /// Extent along X
    width: f32,
    /// Extent along Z
    height: f32,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    selected: Vec<bool>,
    selected_count: usize,
    changed: Vec<bool>,
    textures: Vec<Texture>,
    /// One UV array per texture, index-aligned with `textures`
    uvs: Vec<Vec<Vec2>>,
}

impl TerrainPatch {
    /// Create a flat patch. Needs at least 2x2 vertices and a positive extent.
    pub fn new(rows: usize, columns: usize, width: f32, height: f32) -> Result<Self> {
        Self::check_dimensions(rows, columns)?;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "patch extent must be positive, got {width}x{height}"
            )));
        }

        let mut patch = Self {
            rows,
            columns,
            width,
            height,
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            selected: Vec::new(),
            selected_count: 0,
            changed: Vec::new(),
            textures: Vec::new(),
            uvs: Vec::new(),
        };
        patch.build_grid();
        Ok(patch)
    }

    /// At least 2x2 vertices, with every vertex addressable by a `u32` index
    fn check_dimensions(rows: usize, columns: usize) -> Result<()> {
        let vertices = rows.checked_mul(columns);
        let indices = (rows.saturating_sub(1))
            .checked_mul(columns.saturating_sub(1))
            .and_then(|quads| quads.checked_mul(6));
        let fits = matches!((vertices, indices), (Some(v), Some(_)) if v <= u32::MAX as usize);
        if rows < 2 || columns < 2 || !fits {
            return Err(Error::InvalidDimensions { rows, columns });
        }
        Ok(())
    }

    /// (Re)allocate every per-vertex array for the current dimensions
    fn build_grid(&mut self) {
        let count = self.rows * self.columns;
        let (dx, dz) = self.spacing();

        self.positions = (0..count)
            .map(|i| {
                let (r, c) = (i / self.columns, i % self.columns);
                Vec3::new(c as f32 * dx, 0.0, r as f32 * dz)
            })
            .collect();
        self.normals = vec![Vec3::Y; count];
        self.selected = vec![false; count];
        self.selected_count = 0;
        self.changed = vec![false; count];
        self.indices = build_indices(self.rows, self.columns);

        self.uvs = vec![Vec::new(); self.textures.len()];
        for layer in 0..self.textures.len() {
            self.fill_uvs(layer);
        }
    }

    /// Rebuild the grid with new dimensions, keeping extent and texture layers.
    ///
    /// Heights are reset and the selection is cleared.
    pub fn resize(&mut self, rows: usize, columns: usize) -> Result<()> {
        Self::check_dimensions(rows, columns)?;
        self.rows = rows;
        self.columns = columns;
        self.build_grid();
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Distance between neighbouring vertices along X and Z
    pub fn spacing(&self) -> (f32, f32) {
        (
            self.width / (self.columns - 1) as f32,
            self.height / (self.rows - 1) as f32,
        )
    }

    /// Smallest distance between two grid vertices
    pub fn nearest_vertices(&self) -> f32 {
        let (dx, dz) = self.spacing();
        dx.min(dz)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn check_vertex(&self, index: usize) -> Result<()> {
        if index >= self.positions.len() {
            return Err(Error::VertexOutOfRange {
                index,
                count: self.positions.len(),
            });
        }
        Ok(())
    }

    /// [`set_height`](Self::set_height) for indices taken from this patch
    pub(crate) fn write_height(&mut self, index: usize, height: f32) {
        self.positions[index].y = height;
        self.changed[index] = true;
    }

    /// [`select_vertex`](Self::select_vertex) for indices taken from this patch
    pub(crate) fn write_selected(&mut self, index: usize) {
        if !self.selected[index] {
            self.selected[index] = true;
            self.selected_count += 1;
        }
    }

    fn check_texture(&self, index: usize) -> Result<()> {
        if index >= self.textures.len() {
            return Err(Error::TextureOutOfRange {
                index,
                count: self.textures.len(),
            });
        }
        Ok(())
    }

    /// Flattened index of `(row, column)`
    pub fn index_of(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }

    /// Inverse of [`index_of`](Self::index_of)
    pub fn row_column(&self, index: usize) -> Result<(usize, usize)> {
        self.check_vertex(index)?;
        Ok((index / self.columns, index % self.columns))
    }

    pub fn position(&self, index: usize) -> Result<Vec3> {
        self.check_vertex(index)?;
        Ok(self.positions[index])
    }

    pub fn normal(&self, index: usize) -> Result<Vec3> {
        self.check_vertex(index)?;
        Ok(self.normals[index])
    }

    pub fn height_of(&self, index: usize) -> Result<f32> {
        self.check_vertex(index)?;
        Ok(self.positions[index].y)
    }

    /// Set a vertex height and flag it changed. Normals are not recomputed.
    pub fn set_height(&mut self, index: usize, height: f32) -> Result<()> {
        self.check_vertex(index)?;
        self.positions[index].y = height;
        self.changed[index] = true;
        Ok(())
    }

    /// All heights in vertex order
    pub fn heights(&self) -> Vec<f32> {
        self.positions.iter().map(|p| p.y).collect()
    }

    /// Overwrite every height at once; `heights` must hold one entry per vertex
    pub fn set_heights(&mut self, heights: &[f32]) -> Result<()> {
        if heights.len() != self.positions.len() {
            return Err(Error::InvalidParameter(format!(
                "expected {} heights, got {}",
                self.positions.len(),
                heights.len()
            )));
        }
        for (p, &h) in self.positions.iter_mut().zip(heights) {
            p.y = h;
        }
        self.changed.fill(true);
        Ok(())
    }

    /// Recompute per-vertex normals.
    ///
    /// Each vertex sums the raw cross products of the up to four quadrants
    /// formed with its grid neighbours (bottom-left, top-left, bottom-right,
    /// top-right), then normalizes the sum. Boundary vertices use fewer quadrants.
    pub fn calculate_normals(&mut self) {
        let (rows, cols) = (self.rows, self.columns);
        let p = &self.positions;

        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                let here = p[i];
                let left = (c > 0).then(|| p[i - 1] - here);
                let right = (c + 1 < cols).then(|| p[i + 1] - here);
                let down = (r > 0).then(|| p[i - cols] - here);
                let up = (r + 1 < rows).then(|| p[i + cols] - here);

                let mut sum = Vec3::ZERO;
                // bottom-left
                if let (Some(d), Some(l)) = (down, left) {
                    sum += d.cross(l);
                }
                // top-left
                if let (Some(l), Some(u)) = (left, up) {
                    sum += l.cross(u);
                }
                // bottom-right
                if let (Some(rt), Some(d)) = (right, down) {
                    sum += rt.cross(d);
                }
                // top-right
                if let (Some(u), Some(rt)) = (up, right) {
                    sum += u.cross(rt);
                }

                self.normals[i] = sum.try_normalize().unwrap_or(Vec3::Y);
            }
        }
    }

    /// Brute-force scan for the vertex closest to the line carrying `ray`.
    ///
    /// `ray` must be in patch-local space. Returns the index and its distance.
    pub fn find_nearest_vertex(&self, ray: &Ray) -> Option<(usize, f32)> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &p)| (i, geometry::point_line_distance(p, ray.origin, ray.direction)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Mark a vertex selected. Selecting twice is harmless.
    pub fn select_vertex(&mut self, index: usize) -> Result<()> {
        self.check_vertex(index)?;
        if !self.selected[index] {
            self.selected[index] = true;
            self.selected_count += 1;
        }
        Ok(())
    }

    pub fn deselect_vertex(&mut self, index: usize) -> Result<()> {
        self.check_vertex(index)?;
        if self.selected[index] {
            self.selected[index] = false;
            self.selected_count -= 1;
        }
        Ok(())
    }

    pub fn reset_selection(&mut self) {
        self.selected.fill(false);
        self.selected_count = 0;
    }

    pub fn is_selected(&self, index: usize) -> Result<bool> {
        self.check_vertex(index)?;
        Ok(self.selected[index])
    }

    pub fn selected_count(&self) -> usize {
        self.selected_count
    }

    pub fn selection_flags(&self) -> &[bool] {
        &self.selected
    }

    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
    }

    // ---------------------------------------------------------------------
    // Change tracking
    // ---------------------------------------------------------------------

    pub fn mark_changed(&mut self, index: usize) -> Result<()> {
        self.check_vertex(index)?;
        self.changed[index] = true;
        Ok(())
    }

    pub fn is_changed(&self, index: usize) -> Result<bool> {
        self.check_vertex(index)?;
        Ok(self.changed[index])
    }

    pub fn changed_flags(&self) -> &[bool] {
        &self.changed
    }

    pub fn clear_changed(&mut self) {
        self.changed.fill(false);
    }

    /// Smallest index range covering every changed vertex
    pub fn changed_range(&self) -> Option<Range<usize>> {
        let first = self.changed.iter().position(|&c| c)?;
        let last = self.changed.iter().rposition(|&c| c)?;
        Some(first..last + 1)
    }

    // ---------------------------------------------------------------------
    // Textures
    // ---------------------------------------------------------------------

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture(&self, index: usize) -> Result<&Texture> {
        self.check_texture(index)?;
        Ok(&self.textures[index])
    }

    /// Mutable access to a layer. Call
    /// [`set_texture_coordinates`](Self::set_texture_coordinates) after
    /// changing its shift or scale.
    pub fn texture_mut(&mut self, index: usize) -> Result<&mut Texture> {
        self.check_texture(index)?;
        Ok(&mut self.textures[index])
    }

    pub fn uvs(&self, index: usize) -> Result<&[Vec2]> {
        self.check_texture(index)?;
        Ok(&self.uvs[index])
    }

    /// Append a layer on top and generate its UVs. Returns the layer index.
    pub fn add_texture(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.uvs.push(Vec::new());
        let index = self.textures.len() - 1;
        self.fill_uvs(index);
        index
    }

    pub fn remove_texture(&mut self, index: usize) -> Result<Texture> {
        self.check_texture(index)?;
        self.uvs.remove(index);
        Ok(self.textures.remove(index))
    }

    pub fn swap_textures(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_texture(a)?;
        self.check_texture(b)?;
        self.textures.swap(a, b);
        self.uvs.swap(a, b);
        Ok(())
    }

    /// Move a layer one step towards the top (higher index).
    /// Returns false when it already is the top layer.
    pub fn move_texture_up(&mut self, index: usize) -> Result<bool> {
        self.check_texture(index)?;
        if index + 1 >= self.textures.len() {
            return Ok(false);
        }
        self.swap_textures(index, index + 1)?;
        Ok(true)
    }

    /// Move a layer one step towards the bottom (lower index).
    pub fn move_texture_down(&mut self, index: usize) -> Result<bool> {
        self.check_texture(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.swap_textures(index, index - 1)?;
        Ok(true)
    }

    /// Regenerate the full UV array of one layer from its shift and scale
    pub fn set_texture_coordinates(&mut self, index: usize) -> Result<()> {
        self.check_texture(index)?;
        self.fill_uvs(index);
        Ok(())
    }

    fn fill_uvs(&mut self, layer: usize) {
        let texture = &self.textures[layer];
        let (cols, rows) = (self.columns, self.rows);
        let inv = Vec2::new(1.0 / (cols - 1) as f32, 1.0 / (rows - 1) as f32);

        self.uvs[layer] = (0..cols * rows)
            .map(|i| {
                let grid = Vec2::new((i % cols) as f32, (i / cols) as f32) * inv;
                texture.uv_at(grid)
            })
            .collect();
    }
}

/// Two counter-clockwise (seen from +Y) triangles per row-major quad
fn build_indices(rows: usize, columns: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(6 * (rows - 1) * (columns - 1));
    for r in 0..rows - 1 {
        for c in 0..columns - 1 {
            let v0 = (r * columns + c) as u32;
            let v1 = v0 + 1;
            let v2 = v0 + columns as u32;
            let v3 = v2 + 1;
            indices.extend_from_slice(&[v0, v2, v1, v1, v2, v3]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_rejects_small_grid() {
        assert!(matches!(
            TerrainPatch::new(1, 5, 10.0, 10.0),
            Err(Error::InvalidDimensions { rows: 1, columns: 5 })
        ));
        assert!(TerrainPatch::new(5, 0, 10.0, 10.0).is_err());
        assert!(TerrainPatch::new(3, 3, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_rejects_unaddressable_grid() {
        assert!(matches!(
            TerrainPatch::new(1 << 32, 1 << 32, 10.0, 10.0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            TerrainPatch::new(usize::MAX, 2, 10.0, 10.0),
            Err(Error::InvalidDimensions { .. })
        ));
        // More vertices than a u32 index can address
        assert!(TerrainPatch::new(65536, 65537, 10.0, 10.0).is_err());
    }

    #[test]
    fn test_counts_for_many_sizes() {
        for rows in 2..7 {
            for columns in 2..7 {
                let patch = TerrainPatch::new(rows, columns, 10.0, 20.0).unwrap();
                assert_eq!(patch.vertex_count(), rows * columns);
                assert_eq!(patch.indices().len(), 6 * (rows - 1) * (columns - 1));
                assert!(patch.indices().iter().all(|&i| (i as usize) < rows * columns));
            }
        }
    }

    #[test]
    fn test_grid_spacing() {
        let patch = TerrainPatch::new(3, 3, 10.0, 10.0).unwrap();
        assert_eq!(patch.spacing(), (5.0, 5.0));
        assert_eq!(patch.position(0).unwrap(), Vec3::ZERO);
        assert_eq!(patch.position(1).unwrap(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(patch.position(3).unwrap(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(patch.position(8).unwrap(), Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(patch.nearest_vertices(), 5.0);
    }

    #[test]
    fn test_triangles_face_up() {
        let patch = TerrainPatch::new(3, 4, 9.0, 6.0).unwrap();
        let p = patch.positions();
        for tri in patch.indices().chunks(3) {
            let n = geometry::triangle_normal(p[tri[0] as usize], p[tri[1] as usize], p[tri[2] as usize]);
            assert!(n.y > 0.0);
        }
    }

    #[test]
    fn test_center_bump_normals() {
        let mut patch = TerrainPatch::new(3, 3, 10.0, 10.0).unwrap();
        patch.set_height(4, 2.0).unwrap();
        patch.calculate_normals();

        // Corners only see edge neighbours, which did not move
        for corner in [0, 2, 6, 8] {
            assert!(approx(patch.normal(corner).unwrap(), Vec3::Y));
        }
        // Center is symmetric
        assert!(approx(patch.normal(4).unwrap(), Vec3::Y));
        // Edge neighbours tilt away from the bump
        let left = patch.normal(3).unwrap();
        let right = patch.normal(5).unwrap();
        let bottom = patch.normal(1).unwrap();
        let top = patch.normal(7).unwrap();
        assert!(left.x < -0.1 && left.y < 1.0);
        assert!(right.x > 0.1);
        assert!(bottom.z < -0.1);
        assert!(top.z > 0.1);
        for n in [left, right, bottom, top] {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_find_nearest_vertex() {
        let patch = TerrainPatch::new(3, 3, 10.0, 10.0).unwrap();
        let ray = Ray::new(Vec3::new(5.2, 100.0, 9.0), -Vec3::Y);
        let (index, distance) = patch.find_nearest_vertex(&ray).unwrap();
        assert_eq!(index, 7);
        assert!((distance - (0.04f32 + 1.0).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_selection_count_tracks_flags() {
        let mut patch = TerrainPatch::new(4, 4, 3.0, 3.0).unwrap();
        patch.select_vertex(1).unwrap();
        patch.select_vertex(1).unwrap();
        patch.select_vertex(5).unwrap();
        patch.select_vertex(15).unwrap();
        patch.deselect_vertex(5).unwrap();
        patch.deselect_vertex(6).unwrap();

        let flagged = patch.selection_flags().iter().filter(|&&s| s).count();
        assert_eq!(patch.selected_count(), flagged);
        assert_eq!(patch.selected_indices().collect::<Vec<_>>(), vec![1, 15]);

        patch.reset_selection();
        assert_eq!(patch.selected_count(), 0);
    }

    #[test]
    fn test_out_of_range_is_error() {
        let mut patch = TerrainPatch::new(2, 2, 1.0, 1.0).unwrap();
        assert!(matches!(
            patch.select_vertex(4),
            Err(Error::VertexOutOfRange { index: 4, count: 4 })
        ));
        assert!(patch.set_height(10, 1.0).is_err());
        assert!(matches!(patch.remove_texture(0), Err(Error::TextureOutOfRange { .. })));
        assert_eq!(patch.index_of(2, 0), None);
    }

    #[test]
    fn test_changed_range() {
        let mut patch = TerrainPatch::new(3, 3, 2.0, 2.0).unwrap();
        assert_eq!(patch.changed_range(), None);
        patch.set_height(2, 1.0).unwrap();
        patch.set_height(6, 1.0).unwrap();
        assert_eq!(patch.changed_range(), Some(2..7));
        patch.clear_changed();
        assert_eq!(patch.changed_range(), None);
    }

    #[test]
    fn test_texture_coordinates() {
        let mut patch = TerrainPatch::new(3, 5, 8.0, 4.0).unwrap();
        let layer = patch.add_texture(
            Texture::new("sand.png").with_transform(Vec2::new(0.25, 0.0), Vec2::new(2.0, 1.0)),
        );

        let uvs = patch.uvs(layer).unwrap();
        assert_eq!(uvs.len(), 15);
        assert_eq!(uvs[0], Vec2::new(0.25, 0.0));
        assert_eq!(uvs[4], Vec2::new(2.25, 0.0));
        assert_eq!(uvs[14], Vec2::new(2.25, 1.0));

        patch.texture_mut(layer).unwrap().scale = Vec2::splat(4.0);
        patch.set_texture_coordinates(layer).unwrap();
        assert_eq!(patch.uvs(layer).unwrap()[14], Vec2::new(4.25, 4.0));
    }

    #[test]
    fn test_texture_reorder_keeps_uvs_aligned() {
        let mut patch = TerrainPatch::new(2, 2, 1.0, 1.0).unwrap();
        patch.add_texture(Texture::new("a.png"));
        patch.add_texture(Texture::new("b.png").with_transform(Vec2::ZERO, Vec2::splat(3.0)));

        assert!(patch.move_texture_down(1).unwrap());
        assert_eq!(patch.texture(0).unwrap().name(), "b");
        assert_eq!(patch.uvs(0).unwrap()[3], Vec2::splat(3.0));
        assert!(!patch.move_texture_down(0).unwrap());
        assert!(!patch.move_texture_up(1).unwrap());

        let removed = patch.remove_texture(0).unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(patch.texture_count(), 1);
        assert_eq!(patch.uvs(0).unwrap()[3], Vec2::ONE);
    }

    #[test]
    fn test_resize_keeps_textures() {
        let mut patch = TerrainPatch::new(3, 3, 10.0, 10.0).unwrap();
        patch.add_texture(Texture::new("grass.png"));
        patch.select_vertex(4).unwrap();
        patch.set_height(4, 3.0).unwrap();

        patch.resize(5, 4).unwrap();
        assert_eq!(patch.vertex_count(), 20);
        assert_eq!(patch.indices().len(), 6 * 4 * 3);
        assert_eq!(patch.uvs(0).unwrap().len(), 20);
        assert_eq!(patch.selected_count(), 0);
        assert!(patch.heights().iter().all(|&h| h == 0.0));
        assert!(patch.resize(1, 4).is_err());
    }

    #[test]
    fn test_set_heights_length_checked() {
        let mut patch = TerrainPatch::new(2, 2, 1.0, 1.0).unwrap();
        assert!(patch.set_heights(&[1.0, 2.0]).is_err());
        patch.set_heights(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(patch.heights(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
