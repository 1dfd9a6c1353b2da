use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Cell value marking a mine; non-mine cells hold their `0..=8` neighbor count.
pub const MINE: i8 = -1;

/// A tile plus its up-to-8 in-bounds neighbors.
pub type Adjacents = SmallVec<[Location; 9]>;

/// Mine layout, adjacency numbers, and the revealed set for one game.
///
/// The grid and mine set are fixed at construction; only the cleared set
/// grows afterwards, and only through [`BoardEngine::flood_fill_zeroes`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEngine {
    board: Array2<i8>,
    mine_set: BTreeSet<Location>,
    clears: BTreeSet<Location>,
}

impl BoardEngine {
    /// Builds the board for one game. `safe_location` is the first click;
    /// neither it nor its in-bounds neighbors receive a mine.
    pub fn new<P: MinePlacer>(
        config: BoardConfig,
        safe_location: Location,
        placer: P,
    ) -> Result<Self> {
        config.validate()?;
        let center = split_location(safe_location, config.size)?;

        let height = config.size.1;
        let mut safe_zone = BTreeSet::from([location_of(center, height)]);
        safe_zone.extend(
            NeighborIter::new(center, config.size).map(|coords| location_of(coords, height)),
        );

        Ok(Self::from_mine_mask(placer.place(config, &safe_zone)))
    }

    /// Builds a board from an explicit mine list, bypassing random placement.
    /// Used for fixtures and replays.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(BoardError::OutOfRange);
            }
            mask[coords.to_nd_index()] = true;
        }
        Ok(Self::from_mine_mask(mask))
    }

    fn from_mine_mask(mask: Array2<bool>) -> Self {
        let dim = mask.dim();
        let height: Coord = dim.1.try_into().unwrap();
        let mut board: Array2<i8> = Array2::zeros(dim);
        let mut mine_set = BTreeSet::new();

        for ((x, y), &is_mine) in mask.indexed_iter() {
            if is_mine {
                board[(x, y)] = MINE;
                mine_set.insert(location_of((x as Coord, y as Coord), height));
            }
        }

        for ((x, y), value) in board.indexed_iter_mut() {
            if *value == MINE {
                continue;
            }
            *value = mask
                .iter_neighbors((x as Coord, y as Coord))
                .filter(|&coords| mask[coords.to_nd_index()])
                .count() as i8;
        }

        Self {
            board,
            mine_set,
            clears: BTreeSet::new(),
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.board.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.board.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_set.len().try_into().unwrap()
    }

    /// The tile itself plus every in-bounds neighbor, self first, in a fixed
    /// order. Callers should treat the result as a set.
    pub fn adjacents(&self, location: Location) -> Result<Adjacents> {
        let center = split_location(location, self.size())?;
        let height = self.size().1;

        let mut tiles = Adjacents::new();
        tiles.push(location_of(center, height));
        tiles.extend(
            self.board
                .iter_neighbors(center)
                .map(|coords| location_of(coords, height)),
        );
        Ok(tiles)
    }

    /// The tile's value: [`MINE`] or the `0..=8` adjacent-mine count. Pure
    /// lookup; clearing is tracked separately by [`Self::flood_fill_zeroes`].
    pub fn reveal_tile(&self, location: Location) -> Result<i8> {
        let coords = split_location(location, self.size())?;
        Ok(self.board[coords.to_nd_index()])
    }

    /// Cascade reveal starting at `(x, y)`: zero tiles are cleared and spread
    /// to all 8 neighbors, numbered tiles are cleared and stop the spread,
    /// mines are never cleared. Out-of-bounds origins and already cleared
    /// tiles are no-ops, which also makes the cascade idempotent.
    pub fn flood_fill_zeroes(&mut self, x: Coord, y: Coord) {
        let (width, height) = self.size();
        if x >= width || y >= height {
            return;
        }

        let mut to_visit = VecDeque::from([(x, y)]);
        while let Some(coords) = to_visit.pop_front() {
            let location = location_of(coords, height);
            if self.clears.contains(&location) {
                continue;
            }

            let value = self.board[coords.to_nd_index()];
            if value == MINE {
                continue;
            }

            self.clears.insert(location);
            if value == 0 {
                to_visit.extend(self.board.iter_neighbors(coords));
            }
        }

        log::trace!("cleared set holds {} tiles", self.clears.len());
    }

    /// Read-only view of the cumulative cleared set.
    pub fn clears(&self) -> &BTreeSet<Location> {
        &self.clears
    }

    /// Read-only view of the mine locations, fixed at construction.
    pub fn mine_set(&self) -> &BTreeSet<Location> {
        &self.mine_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(size: Coord2, mines: &[Coord2]) -> BoardEngine {
        BoardEngine::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn random_placement_matches_requested_count_and_avoids_safe_zone() {
        let config = BoardConfig::new((9, 9), 10);
        let engine = BoardEngine::new(config, 40, RejectionPlacer::new(7)).unwrap();

        assert_eq!(engine.mine_count(), 10);
        for location in engine.adjacents(40).unwrap() {
            assert!(!engine.mine_set().contains(&location));
        }
    }

    #[test]
    fn numbers_count_adjacent_mines() {
        let config = BoardConfig::new((9, 9), 10);
        let engine = BoardEngine::new(config, 40, RejectionPlacer::new(99)).unwrap();

        for location in 0..config.total_cells() {
            let value = engine.reveal_tile(location).unwrap();
            if engine.mine_set().contains(&location) {
                assert_eq!(value, MINE);
                continue;
            }

            let mined_neighbors = engine
                .adjacents(location)
                .unwrap()
                .into_iter()
                .filter(|pos| *pos != location && engine.mine_set().contains(pos))
                .count();
            assert_eq!(value as usize, mined_neighbors);
        }
    }

    #[test]
    fn adjacents_stay_in_bounds_without_duplicates() {
        let engine = fixture((3, 3), &[]);

        // corner, edge, center
        for (location, expected) in [(0, 4), (1, 6), (4, 9)] {
            let tiles = engine.adjacents(location).unwrap();
            assert_eq!(tiles.len(), expected);
            assert_eq!(tiles[0], location);
            assert!(tiles.iter().all(|&pos| pos < 9));

            let unique: BTreeSet<Location> = tiles.iter().copied().collect();
            assert_eq!(unique.len(), expected);
        }
    }

    #[test]
    fn empty_board_cascade_clears_everything() {
        let mut engine = fixture((3, 3), &[]);

        engine.flood_fill_zeroes(1, 1);

        assert_eq!(engine.clears().len(), 9);
    }

    #[test]
    fn cascade_halts_at_the_numbered_boundary() {
        let mut engine = fixture((3, 3), &[(0, 0)]);

        assert_eq!(engine.reveal_tile(1).unwrap(), 1);
        engine.flood_fill_zeroes(2, 2);

        assert_eq!(engine.clears().len(), 8);
        assert!(!engine.clears().contains(&0));
    }

    #[test]
    fn cascade_is_idempotent() {
        let mut engine = fixture((3, 3), &[(0, 0)]);

        engine.flood_fill_zeroes(2, 2);
        let first = engine.clears().clone();
        engine.flood_fill_zeroes(2, 2);

        assert_eq!(engine.clears(), &first);
    }

    #[test]
    fn cascade_never_clears_a_mine() {
        let mut engine = fixture((3, 3), &[(0, 0), (2, 0)]);

        engine.flood_fill_zeroes(1, 2);

        assert!(engine.clears().is_disjoint(engine.mine_set()));
    }

    #[test]
    fn cascade_from_a_mine_is_a_no_op() {
        let mut engine = fixture((3, 3), &[(0, 0)]);

        engine.flood_fill_zeroes(0, 0);

        assert!(engine.clears().is_empty());
    }

    #[test]
    fn out_of_bounds_cascade_is_a_no_op() {
        let mut engine = fixture((3, 3), &[]);

        engine.flood_fill_zeroes(3, 0);
        engine.flood_fill_zeroes(0, 3);

        assert!(engine.clears().is_empty());
    }

    #[test]
    fn mine_set_is_fixed_after_construction() {
        let mut engine = fixture((3, 3), &[(0, 0), (2, 0)]);
        let before = engine.mine_set().clone();

        engine.flood_fill_zeroes(1, 2);
        engine.flood_fill_zeroes(0, 2);

        assert_eq!(engine.mine_set(), &before);
    }

    #[test]
    fn oversized_mine_count_is_refused() {
        let config = BoardConfig::new((3, 3), 1);
        assert_eq!(
            BoardEngine::new(config, 4, RejectionPlacer::new(0)).unwrap_err(),
            BoardError::InvalidConfiguration,
        );
    }

    #[test]
    fn out_of_range_locations_are_refused() {
        let engine = fixture((3, 3), &[]);

        assert_eq!(engine.reveal_tile(9).unwrap_err(), BoardError::OutOfRange);
        assert_eq!(engine.adjacents(9).unwrap_err(), BoardError::OutOfRange);
        assert_eq!(
            BoardEngine::from_mine_coords((3, 3), &[(3, 0)]).unwrap_err(),
            BoardError::OutOfRange,
        );
    }

    #[test]
    fn engine_state_survives_serialization() {
        let mut engine = fixture((3, 3), &[(0, 0)]);
        engine.flood_fill_zeroes(2, 2);

        let encoded = serde_json::to_string(&engine).unwrap();
        let decoded: BoardEngine = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, engine);
    }
}
