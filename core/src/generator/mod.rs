use crate::*;
use alloc::collections::BTreeSet;
use ndarray::Array2;

pub use random::*;

mod random;

/// Strategy for burying mines in a fresh board, keeping the first click's
/// neighborhood clear. Returns the mine mask; counts are derived later.
pub trait MinePlacer {
    fn place(self, config: BoardConfig, safe_zone: &BTreeSet<Location>) -> Array2<bool>;
}
