//! Simple height filters

use crate::core::error::Error;
use crate::core::types::Result;
use crate::terrain::TerrainPatch;
use super::TerrainAlgorithm;

/// Box blur over each vertex and its eight grid neighbours
#[derive(Clone, Debug, PartialEq)]
pub struct Smooth {
    pub passes: u32,
    /// Blend between the original (0.0) and the blurred height (1.0)
    pub strength: f32,
    /// Only touch selected vertices when the patch has a selection
    pub selection_only: bool,
}

impl Default for Smooth {
    fn default() -> Self {
        Self {
            passes: 2,
            strength: 1.0,
            selection_only: true,
        }
    }
}

impl TerrainAlgorithm for Smooth {
    fn name(&self) -> &str {
        "smooth"
    }

    fn description(&self) -> &str {
        "Average each height with its neighbours"
    }

    fn apply(&self, patch: &mut TerrainPatch) -> Result<()> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(Error::Algorithm {
                name: self.name().to_string(),
                reason: format!("strength {} outside [0, 1]", self.strength),
            });
        }

        let (rows, cols) = (patch.rows(), patch.columns());
        let restrict = self.selection_only && patch.selected_count() > 0;
        let mask: Vec<bool> = if restrict {
            patch.selection_flags().to_vec()
        } else {
            vec![true; rows * cols]
        };

        let mut heights = patch.heights();
        for _ in 0..self.passes {
            let source = heights.clone();
            for r in 0..rows {
                for c in 0..cols {
                    let i = r * cols + c;
                    if !mask[i] {
                        continue;
                    }
                    let mut sum = 0.0;
                    let mut count = 0.0;
                    for nr in r.saturating_sub(1)..=(r + 1).min(rows - 1) {
                        for nc in c.saturating_sub(1)..=(c + 1).min(cols - 1) {
                            sum += source[nr * cols + nc];
                            count += 1.0;
                        }
                    }
                    let blurred = sum / count;
                    heights[i] = source[i] + (blurred - source[i]) * self.strength;
                }
            }
        }
        patch.set_heights(&heights)
    }
}

/// Sets every vertex (or every selected vertex) to one level
#[derive(Clone, Debug, PartialEq)]
pub struct Flatten {
    pub level: f32,
    pub selection_only: bool,
}

impl Default for Flatten {
    fn default() -> Self {
        Self {
            level: 0.0,
            selection_only: true,
        }
    }
}

impl TerrainAlgorithm for Flatten {
    fn name(&self) -> &str {
        "flatten"
    }

    fn description(&self) -> &str {
        "Set heights to a constant level"
    }

    fn apply(&self, patch: &mut TerrainPatch) -> Result<()> {
        if !self.level.is_finite() {
            return Err(Error::Algorithm {
                name: self.name().to_string(),
                reason: "level must be finite".into(),
            });
        }
        let restrict = self.selection_only && patch.selected_count() > 0;
        let flags = patch.selection_flags().to_vec();
        let heights: Vec<f32> = patch
            .heights()
            .into_iter()
            .zip(flags)
            .map(|(h, selected)| if !restrict || selected { self.level } else { h })
            .collect();
        patch.set_heights(&heights)
    }
}
