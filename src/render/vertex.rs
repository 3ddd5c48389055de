//! GPU vertex and per-layer formats for terrain drawing

use bytemuck::{Pod, Zeroable};

/// Vertex flag: vertex is part of the selection
pub const FLAG_SELECTED: u32 = 1;
/// Vertex flag: vertex moved during the last edit
pub const FLAG_CHANGED: u32 = 1 << 1;

/// The single terrain vertex format, independent of how many layers are bound.
///
/// Per-layer UVs live in a separate storage buffer indexed by
/// `layer * vertex_count + vertex_index`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Normalized grid coordinate in `[0, 1]^2`
    pub uv: [f32; 2],
    /// `FLAG_SELECTED | FLAG_CHANGED`
    pub flags: u32,
}

impl TerrainVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Uint32,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.flags & FLAG_SELECTED != 0
    }

    pub fn is_changed(&self) -> bool {
        self.flags & FLAG_CHANGED != 0
    }
}

/// Per-layer shader parameters (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TextureLayerParams {
    /// [`BlendOp::shader_index`](crate::terrain::BlendOp::shader_index)
    pub blend_op: u32,
    pub enabled: u32,
    /// First element of this layer in the layer UV buffer
    pub uv_offset: u32,
    pub _pad: u32,
}
