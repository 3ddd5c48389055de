//! GPU-facing terrain data: vertex formats, buffer sync, textures and lighting

pub mod context;
pub mod vertex;
pub mod buffer;
pub mod texture;
pub mod lighting;

pub use context::GpuContext;
pub use vertex::{TerrainVertex, TextureLayerParams};
pub use buffer::{BufferObjects, SyncKind};
pub use texture::{GpuTexture, TextureCache};
pub use lighting::{LightSettings, LightUniform};
