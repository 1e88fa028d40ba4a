//! Color mapping for cells

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cell::Cell;
use crate::config::DEFAULT_COLOR_SEED;

/// RGB color type
pub type CellColor = [f32; 3];

/// Trait for choosing the flat color of a cell
pub trait CellColorMapper {
    /// Map a cell to an RGB color
    fn map_color(&self, cell: &Cell) -> CellColor;
}

impl<F> CellColorMapper for F
where
    F: Fn(&Cell) -> CellColor,
{
    fn map_color(&self, cell: &Cell) -> CellColor {
        self(cell)
    }
}

/// Random color per cell, reproducible from a seed
///
/// Every cell draws from its own ChaCha stream, so a cell's color depends only on
/// the seed and its ID, not on how many cells came before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomColorMapper {
    pub seed: u64,
}

impl RandomColorMapper {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for RandomColorMapper {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_SEED)
    }
}

impl CellColorMapper for RandomColorMapper {
    fn map_color(&self, cell: &Cell) -> CellColor {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(cell.id as u64);
        [rng.gen(), rng.gen(), rng.gen()]
    }
}

/// Color from the cell's position: each axis maps to one channel
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionColorMapper;

impl CellColorMapper for PositionColorMapper {
    fn map_color(&self, cell: &Cell) -> CellColor {
        let color = (cell.center + 1.0) * 0.5;
        [color.x, color.y, color.z]
    }
}

/// The same color for every cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformColorMapper(pub CellColor);

impl Default for UniformColorMapper {
    fn default() -> Self {
        Self([0.8, 0.8, 0.8])
    }
}

impl CellColorMapper for UniformColorMapper {
    fn map_color(&self, _cell: &Cell) -> CellColor {
        self.0
    }
}
