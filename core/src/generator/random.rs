use super::*;

/// Places mines by uniform rejection sampling: draw `(x, y)` pairs and throw
/// away hits on the safe zone or on an already buried mine. Terminates
/// because [`BoardConfig::validate`] keeps the mine count below capacity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RejectionPlacer {
    seed: u64,
}

impl RejectionPlacer {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for RejectionPlacer {
    fn place(self, config: BoardConfig, safe_zone: &BTreeSet<Location>) -> Array2<bool> {
        use rand::prelude::*;

        let (width, height) = config.size;
        let mut mask: Array2<bool> = Array2::default((width, height).to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: CellCount = 0;
        let mut samples: u64 = 0;

        while placed < config.mines {
            samples += 1;
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            if safe_zone.contains(&location_of((x, y), height)) {
                continue;
            }
            let cell = &mut mask[(x, y).to_nd_index()];
            if *cell {
                continue;
            }
            *cell = true;
            placed += 1;
        }

        log::debug!("buried {placed} mines in {samples} samples");
        mask
    }
}
