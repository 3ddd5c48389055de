//! Heightfield terrain model

pub mod patch;
pub mod page;
pub mod texture;

pub use patch::TerrainPatch;
pub use page::{TerrainPage, SelectPhase, SoftSelection, PlaneHit};
pub use texture::{Texture, BlendOp};
