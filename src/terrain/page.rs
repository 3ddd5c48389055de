//! A placed terrain patch: world transform, height clamp and editing operations

use crate::core::error::Error;
use crate::core::types::{Mat4, Quat, Result, Vec3};
use crate::math::{geometry, Ray};
use super::patch::TerrainPatch;

/// Where a selection click sits within a mouse gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectPhase {
    /// Mouse pressed: without multi-select this replaces the selection
    Begin,
    /// Dragging or releasing: picks are added to the selection
    Continue,
}

/// Soft selection parameters for a single move
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoftSelection {
    /// Squared horizontal radius of influence around selected vertices
    pub radius_squared: f32,
    /// Scale movement by `1 - distance / radius` instead of moving fully
    pub falloff: bool,
}

impl SoftSelection {
    pub fn new(radius: f32, falloff: bool) -> Self {
        Self {
            radius_squared: radius * radius,
            falloff,
        }
    }
}

/// Triangle under a point, with the point lifted onto its plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneHit {
    pub indices: [usize; 3],
    pub point: Vec3,
}

/// One terrain patch placed in the world
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainPage {
    pub name: String,
    patch: TerrainPatch,
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    max_vertex_height: f32,
}

impl TerrainPage {
    /// Wrap a patch at the origin. Existing heights are clamped to `[0, max_vertex_height]`.
    pub fn new(patch: TerrainPatch, max_vertex_height: f32) -> Result<Self> {
        check_max_height(max_vertex_height)?;
        let mut page = Self {
            name: String::from("terrain"),
            patch,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            max_vertex_height,
        };
        page.clamp_heights();
        Ok(page)
    }

    pub fn patch(&self) -> &TerrainPatch {
        &self.patch
    }

    /// Direct access to the grid. Callers that change heights should finish
    /// with [`clamp_heights`](Self::clamp_heights).
    pub fn patch_mut(&mut self) -> &mut TerrainPatch {
        &mut self.patch
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Place the page in the world. Scale components must be non-zero and the
    /// rotation a finite, non-zero quaternion (it is normalized).
    pub fn set_placement(&mut self, position: Vec3, rotation: Quat, scale: Vec3) -> Result<()> {
        if scale.x == 0.0 || scale.y == 0.0 || scale.z == 0.0 || !scale.is_finite() {
            return Err(Error::InvalidParameter(format!("invalid page scale {scale}")));
        }
        if !rotation.is_finite() || rotation.length_squared() < geometry::EPSILON {
            return Err(Error::InvalidParameter(format!("invalid page rotation {rotation}")));
        }
        if !position.is_finite() {
            return Err(Error::InvalidParameter(format!("invalid page position {position}")));
        }
        self.position = position;
        self.rotation = rotation.normalize();
        self.scale = scale;
        Ok(())
    }

    pub fn max_vertex_height(&self) -> f32 {
        self.max_vertex_height
    }

    /// Change the height clamp and re-apply it to every vertex
    pub fn set_max_vertex_height(&mut self, max: f32) -> Result<()> {
        check_max_height(max)?;
        self.max_vertex_height = max;
        self.clamp_heights();
        Ok(())
    }

    /// Force every vertex into `[0, max_vertex_height]`, flagging the ones
    /// that moved, and refresh normals if anything changed.
    pub fn clamp_heights(&mut self) -> usize {
        let max = self.max_vertex_height;
        let mut clamped = 0;
        for i in 0..self.patch.vertex_count() {
            let h = self.patch.positions()[i].y;
            let c = h.clamp(0.0, max);
            if c != h {
                self.patch.write_height(i, c);
                clamped += 1;
            }
        }
        if clamped > 0 {
            self.patch.calculate_normals();
        }
        clamped
    }

    /// Local-to-world transform
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn world_to_local_ray(&self, ray: &Ray) -> Ray {
        ray.transform(&self.world_matrix().inverse())
    }

    /// Pick the vertex under a world-space ray and update the selection.
    ///
    /// Picks farther than half the vertex spacing from the ray count as a
    /// miss. A miss on [`SelectPhase::Begin`] without multi-select clears
    /// the selection. Returns the picked vertex.
    pub fn select_vertex(&mut self, ray: &Ray, phase: SelectPhase, multi_select: bool) -> Option<usize> {
        let local = self.world_to_local_ray(ray);
        let threshold = self.patch.nearest_vertices() * 0.5;
        let hit = self
            .patch
            .find_nearest_vertex(&local)
            .filter(|&(_, distance)| distance <= threshold)
            .map(|(index, _)| index);

        if phase == SelectPhase::Begin && !multi_select {
            self.patch.reset_selection();
        }

        match hit {
            Some(index) => {
                self.patch.write_selected(index);
                log::debug!("Picked vertex {index} ({} selected)", self.patch.selected_count());
            }
            None => log::debug!("Pick missed every vertex"),
        }
        hit
    }

    /// Raise (or lower) every selected vertex by `dist_change`.
    ///
    /// With `soft`, unselected vertices within the horizontal radius of the
    /// nearest selected vertex follow, optionally with linear falloff. Every
    /// height stays in `[0, max_vertex_height]`. The changed flags describe
    /// exactly the vertices moved by this call. Returns how many moved.
    pub fn move_selected_vertices(&mut self, dist_change: f32, soft: Option<SoftSelection>) -> usize {
        self.patch.clear_changed();
        if self.patch.selected_count() == 0 || dist_change == 0.0 {
            return 0;
        }

        let selected: Vec<usize> = self.patch.selected_indices().collect();
        let mut weights = vec![0.0f32; self.patch.vertex_count()];
        for &i in &selected {
            weights[i] = 1.0;
        }

        if let Some(soft) = soft.filter(|s| s.radius_squared > 0.0) {
            let positions = self.patch.positions();
            let selected_points: Vec<Vec3> = selected.iter().map(|&i| positions[i]).collect();
            let radius = soft.radius_squared.sqrt();

            for (i, &p) in positions.iter().enumerate() {
                if weights[i] > 0.0 {
                    continue;
                }
                let nearest_sq = selected_points
                    .iter()
                    .map(|&s| geometry::horizontal_distance_squared(p, s))
                    .fold(f32::INFINITY, f32::min);
                if nearest_sq < soft.radius_squared {
                    weights[i] = if soft.falloff {
                        1.0 - nearest_sq.sqrt() / radius
                    } else {
                        1.0
                    };
                }
            }
        }

        let max = self.max_vertex_height;
        let mut moved = 0;
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            let old = self.patch.positions()[i].y;
            let new = (old + dist_change * w).clamp(0.0, max);
            if new != old {
                self.patch.write_height(i, new);
                moved += 1;
            }
        }

        self.patch.calculate_normals();
        moved
    }

    /// Find the triangle under a local-space XZ point.
    ///
    /// Tries the first triangle of the containing quad and falls back to the
    /// second. The returned point carries the interpolated terrain height.
    pub fn get_plane(&self, point: Vec3) -> Option<PlaneHit> {
        let patch = &self.patch;
        let (dx, dz) = patch.spacing();
        let fx = point.x / dx;
        let fz = point.z / dz;
        let max_c = (patch.columns() - 1) as f32;
        let max_r = (patch.rows() - 1) as f32;
        if !(fx >= 0.0 && fz >= 0.0 && fx <= max_c && fz <= max_r) {
            return None;
        }

        // Points on the far edges belong to the last quad
        let c = (fx.floor() as usize).min(patch.columns() - 2);
        let r = (fz.floor() as usize).min(patch.rows() - 2);

        let v0 = r * patch.columns() + c;
        let v1 = v0 + 1;
        let v2 = v0 + patch.columns();
        let v3 = v2 + 1;
        let p = patch.positions();

        let triangles = [[v0, v2, v1], [v1, v2, v3]];
        for indices in triangles {
            let [pa, pb, pc] = indices.map(|i| p[i]);
            if geometry::point_in_triangle_xz(point, pa, pb, pc) {
                let y = geometry::plane_height_at(point, pa, pb, pc)?;
                return Some(PlaneHit {
                    indices,
                    point: Vec3::new(point.x, y, point.z),
                });
            }
        }
        None
    }

    /// Interpolated terrain height at a local XZ position
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.get_plane(Vec3::new(x, 0.0, z)).map(|hit| hit.point.y)
    }
}

fn check_max_height(max: f32) -> Result<()> {
    if !(max.is_finite() && max > 0.0) {
        return Err(Error::InvalidParameter(format!("max vertex height must be positive, got {max}")));
    }
    Ok(())
}
