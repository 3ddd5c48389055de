//! Terrace - heightfield terrain editing core

pub mod core;
pub mod math;
pub mod terrain;
pub mod history;
pub mod algorithm;
pub mod format;
pub mod render;
pub mod editor;
