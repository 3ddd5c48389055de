//! Terrain algorithms: height generators and filters applied to a whole patch.
//!
//! Algorithms are plain trait objects collected in an [`AlgorithmRegistry`];
//! the editor looks them up by name and applies them inside a history entry.

pub mod noise;
pub mod filters;

pub use self::noise::{FbmNoise, FbmParams};
pub use filters::{Flatten, Smooth};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::terrain::TerrainPatch;

/// An operation that rewrites the heights of a patch
pub trait TerrainAlgorithm {
    /// Unique registry key, e.g. `"smooth"`
    fn name(&self) -> &str;

    /// One-line human readable summary
    fn description(&self) -> &str {
        ""
    }

    /// Modify the patch in place. Normals and height clamping are handled by
    /// the caller.
    fn apply(&self, patch: &mut TerrainPatch) -> Result<()>;
}

/// Named collection of algorithms
#[derive(Default)]
pub struct AlgorithmRegistry {
    algorithms: Vec<Box<dyn TerrainAlgorithm>>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the algorithms shipped in this crate
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FbmNoise::default()));
        registry.register(Box::new(Smooth::default()));
        registry.register(Box::new(Flatten::default()));
        registry
    }

    /// Add an algorithm, replacing any previous one with the same name
    pub fn register(&mut self, algorithm: Box<dyn TerrainAlgorithm>) {
        if let Some(existing) = self.algorithms.iter_mut().find(|a| a.name() == algorithm.name()) {
            log::debug!("Replacing algorithm '{}'", algorithm.name());
            *existing = algorithm;
        } else {
            self.algorithms.push(algorithm);
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn TerrainAlgorithm> {
        self.algorithms
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.iter().map(|a| a.name())
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
