//! Error types for the terrain editor

use thiserror::Error;

/// Main error type for the editor core
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid grid dimensions: {rows}x{columns}")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("Vertex index out of range: {index} (count {count})")]
    VertexOutOfRange { index: usize, count: usize },

    #[error("Texture index out of range: {index} (count {count})")]
    TextureOutOfRange { index: usize, count: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("No format registered for: {0}")]
    UnknownFormat(String),

    #[error("Algorithm '{name}' failed: {reason}")]
    Algorithm { name: String, reason: String },

    #[error("Format error: {0}")]
    Format(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
