//! Mathematical utilities

pub mod ray;
pub mod geometry;

pub use ray::Ray;
