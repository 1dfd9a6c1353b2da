#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod types;

/// Cells that stay mine-free around the first click: the clicked tile plus
/// its up-to-8 neighbors.
pub const SAFE_ZONE_CELLS: CellCount = 9;

/// Board shape plus the number of mines to bury in it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const fn new(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Rejection sampling only terminates when every mine fits outside the
    /// first click's neighborhood, so an oversized request is refused up
    /// front instead of looping forever.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidConfiguration);
        }
        if self.mines.saturating_add(SAFE_ZONE_CELLS) > self.total_cells() {
            return Err(BoardError::InvalidConfiguration);
        }
        Ok(())
    }
}
