//! CPU staging and GPU buffers mirroring a [`TerrainPatch`].
//!
//! The patch is always authoritative. [`BufferObjects`] rebuilds its staging
//! arrays when one of its dirty flags is set and uploads only what differs.

use std::ops::Range;

use crate::core::types::Result;
use crate::terrain::TerrainPatch;
use super::vertex::{TerrainVertex, TextureLayerParams, FLAG_CHANGED, FLAG_SELECTED};

/// Smallest buffer we allocate so bindings stay valid before the first upload
const MIN_BUFFER_SIZE: u64 = 16;

/// What a call to [`BufferObjects::sync`] rebuilt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncKind {
    /// Nothing to do
    Clean,
    /// Only vertices in this range differ from the previous staging data
    Vertices(Range<usize>),
    /// Topology, layers and vertices were all rebuilt
    Full,
}

impl SyncKind {
    /// Combine two pending updates into one that covers both
    fn merge(self, other: SyncKind) -> SyncKind {
        match (self, other) {
            (SyncKind::Full, _) | (_, SyncKind::Full) => SyncKind::Full,
            (SyncKind::Clean, x) | (x, SyncKind::Clean) => x,
            (SyncKind::Vertices(a), SyncKind::Vertices(b)) => {
                SyncKind::Vertices(a.start.min(b.start)..a.end.max(b.end))
            }
        }
    }
}

/// A GPU buffer that is recreated when data outgrows it
struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    label: &'static str,
    usage: wgpu::BufferUsages,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, label: &'static str, usage: wgpu::BufferUsages, size: u64) -> Self {
        let capacity = size.max(MIN_BUFFER_SIZE);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity, label, usage }
    }

    /// Write `bytes` at offset 0, recreating the buffer if it is too small.
    /// Returns true when the buffer was recreated.
    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) -> bool {
        let needed = bytes.len() as u64;
        let recreated = needed > self.capacity;
        if recreated {
            log::debug!("Growing {} buffer {} -> {} bytes", self.label, self.capacity, needed);
            *self = Self::new(device, self.label, self.usage, needed);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        recreated
    }
}

/// GPU side of [`BufferObjects`]
struct GpuTerrainBuffers {
    vertices: GrowableBuffer,
    indices: GrowableBuffer,
    layer_uvs: GrowableBuffer,
    layer_params: GrowableBuffer,
}

impl GpuTerrainBuffers {
    fn new(device: &wgpu::Device) -> Self {
        Self {
            vertices: GrowableBuffer::new(device, "terrain_vertices", wgpu::BufferUsages::VERTEX, 0),
            indices: GrowableBuffer::new(device, "terrain_indices", wgpu::BufferUsages::INDEX, 0),
            layer_uvs: GrowableBuffer::new(device, "terrain_layer_uvs", wgpu::BufferUsages::STORAGE, 0),
            layer_params: GrowableBuffer::new(device, "terrain_layer_params", wgpu::BufferUsages::STORAGE, 0),
        }
    }
}

/// Cache of renderable terrain data derived from a patch
pub struct BufferObjects {
    refresh_buffers: bool,
    refresh_vertices: bool,
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
    /// Layer-major: all vertices of layer 0, then layer 1, ...
    layer_uvs: Vec<[f32; 2]>,
    layers: Vec<TextureLayerParams>,
    /// Staged changes not yet written to the GPU
    pending: SyncKind,
    gpu: Option<GpuTerrainBuffers>,
}

impl Default for BufferObjects {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferObjects {
    /// Empty cache; the first sync is always a full rebuild
    pub fn new() -> Self {
        Self {
            refresh_buffers: true,
            refresh_vertices: false,
            vertices: Vec::new(),
            indices: Vec::new(),
            layer_uvs: Vec::new(),
            layers: Vec::new(),
            pending: SyncKind::Clean,
            gpu: None,
        }
    }

    /// Grid topology or texture layers changed
    pub fn mark_refresh_buffers(&mut self) {
        self.refresh_buffers = true;
    }

    /// Heights, normals or selection changed
    pub fn mark_refresh_vertices(&mut self) {
        self.refresh_vertices = true;
    }

    pub fn needs_refresh(&self) -> bool {
        self.refresh_buffers || self.refresh_vertices
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn layer_uvs(&self) -> &[[f32; 2]] {
        &self.layer_uvs
    }

    pub fn layers(&self) -> &[TextureLayerParams] {
        &self.layers
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Changes staged but not uploaded yet
    pub fn pending(&self) -> &SyncKind {
        &self.pending
    }

    pub fn vertex_buffer(&self) -> Option<&wgpu::Buffer> {
        self.gpu.as_ref().map(|g| &g.vertices.buffer)
    }

    pub fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.gpu.as_ref().map(|g| &g.indices.buffer)
    }

    pub fn layer_uv_buffer(&self) -> Option<&wgpu::Buffer> {
        self.gpu.as_ref().map(|g| &g.layer_uvs.buffer)
    }

    pub fn layer_param_buffer(&self) -> Option<&wgpu::Buffer> {
        self.gpu.as_ref().map(|g| &g.layer_params.buffer)
    }

    /// Rebuild staging data from `patch` according to the dirty flags
    pub fn sync(&mut self, patch: &TerrainPatch) -> SyncKind {
        // A patch of a different size can only be mirrored by a full rebuild
        if !self.refresh_buffers && self.vertices.len() != patch.vertex_count() {
            self.refresh_buffers = true;
        }

        let kind = if self.refresh_buffers {
            self.vertices = build_vertices(patch);
            self.indices = patch.indices().to_vec();
            self.rebuild_layers(patch);
            SyncKind::Full
        } else if self.refresh_vertices {
            let fresh = build_vertices(patch);
            let first = fresh.iter().zip(&self.vertices).position(|(a, b)| a != b);
            let kind = match first {
                Some(start) => {
                    let end = fresh
                        .iter()
                        .zip(&self.vertices)
                        .rposition(|(a, b)| a != b)
                        .map_or(start + 1, |i| i + 1);
                    SyncKind::Vertices(start..end)
                }
                None => SyncKind::Clean,
            };
            self.vertices = fresh;
            kind
        } else {
            SyncKind::Clean
        };

        self.refresh_buffers = false;
        self.refresh_vertices = false;
        if kind != SyncKind::Clean {
            log::debug!("Terrain buffers synced: {:?}", kind);
        }
        self.pending = std::mem::replace(&mut self.pending, SyncKind::Clean).merge(kind.clone());
        kind
    }

    fn rebuild_layers(&mut self, patch: &TerrainPatch) {
        let count = patch.vertex_count();
        self.layer_uvs.clear();
        self.layers.clear();
        for (layer, texture) in patch.textures().iter().enumerate() {
            if let Ok(uvs) = patch.uvs(layer) {
                self.layer_uvs.extend(uvs.iter().map(|uv| uv.to_array()));
            }
            self.layers.push(TextureLayerParams {
                blend_op: texture.blend.shader_index(),
                enabled: texture.enabled as u32,
                uv_offset: (layer * count) as u32,
                _pad: 0,
            });
        }
    }

    /// Write pending staging data to the GPU, creating buffers on first use
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<()> {
        let gpu = self.gpu.get_or_insert_with(|| GpuTerrainBuffers::new(device));
        let pending = std::mem::replace(&mut self.pending, SyncKind::Clean);

        match pending {
            SyncKind::Clean => {}
            SyncKind::Full => {
                gpu.vertices.write(device, queue, bytemuck::cast_slice(&self.vertices));
                gpu.indices.write(device, queue, bytemuck::cast_slice(&self.indices));
                gpu.layer_uvs.write(device, queue, bytemuck::cast_slice(&self.layer_uvs));
                gpu.layer_params.write(device, queue, bytemuck::cast_slice(&self.layers));
                log::debug!(
                    "Uploaded terrain: {} vertices, {} indices, {} layers",
                    self.vertices.len(),
                    self.indices.len(),
                    self.layers.len()
                );
            }
            SyncKind::Vertices(range) => {
                let stride = std::mem::size_of::<TerrainVertex>() as u64;
                let offset = range.start as u64 * stride;
                queue.write_buffer(
                    &gpu.vertices.buffer,
                    offset,
                    bytemuck::cast_slice(&self.vertices[range]),
                );
            }
        }
        Ok(())
    }

    /// Sync from `patch` and upload in one step
    pub fn update(&mut self, patch: &TerrainPatch, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<SyncKind> {
        let kind = self.sync(patch);
        self.upload(device, queue)?;
        Ok(kind)
    }

    /// Drop GPU resources (e.g. after device loss); staging data is kept and
    /// fully re-uploaded on the next [`upload`](Self::upload).
    pub fn release_gpu(&mut self) {
        self.gpu = None;
        self.pending = SyncKind::Full;
    }
}

/// Flatten patch vertex data into the GPU vertex format
///
/// The vertex UV comes from the first enabled texture layer, or the
/// normalized grid position when no layer is enabled.
pub fn build_vertices(patch: &TerrainPatch) -> Vec<TerrainVertex> {
    let (rows, cols) = (patch.rows(), patch.columns());
    let inv_u = 1.0 / (cols - 1) as f32;
    let inv_v = 1.0 / (rows - 1) as f32;
    let base_uvs = patch
        .textures()
        .iter()
        .position(|t| t.enabled)
        .and_then(|layer| patch.uvs(layer).ok());

    patch
        .positions()
        .iter()
        .zip(patch.normals())
        .zip(patch.selection_flags().iter().zip(patch.changed_flags()))
        .enumerate()
        .map(|(i, ((p, n), (&selected, &changed)))| {
            let mut flags = 0;
            if selected {
                flags |= FLAG_SELECTED;
            }
            if changed {
                flags |= FLAG_CHANGED;
            }
            TerrainVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: match base_uvs {
                    Some(uvs) => uvs[i].to_array(),
                    None => [(i % cols) as f32 * inv_u, (i / cols) as f32 * inv_v],
                },
                flags,
            }
        })
        .collect()
}
