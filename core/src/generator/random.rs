use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// How one axis coordinate of a mine candidate is drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sampling {
    /// `round(r * (len - 1))` for `r` in `[0, 1)`. The two edge values get half the weight
    /// of the inner ones. Kept so boards match the classic generator draw for draw.
    #[default]
    Rounded,
    /// Every value in `0..len` equally likely.
    Uniform,
}

/// Rejection sampler: draws random cells and throws away any that are already mined or
/// inside the safe zone around the first click.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
    sampling: Sampling,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_sampling(seed, Sampling::default())
    }

    pub fn with_sampling(seed: u64, sampling: Sampling) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            sampling,
        }
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    fn draw(&mut self, len: Coord) -> Coord {
        match self.sampling {
            Sampling::Rounded => {
                let max = f64::from(len.saturating_sub(1));
                (self.rng.random::<f64>() * max).round() as Coord
            }
            Sampling::Uniform => self.rng.random_range(0..len),
        }
    }
}

/// Seeds from the wall clock.
impl Default for RandomMineGenerator {
    fn default() -> Self {
        Self::new(now_ms())
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, config: GameConfig, anchor: Coord2) -> MineLayout {
        let (width, height) = config.size;
        let total_cells = config.total_cells();
        let mut mine_mask: Array2<bool> = Array2::default((usize::from(height), usize::from(width)));

        // the anchor always stays safe, so one cell is never available
        let capacity = total_cells.saturating_sub(1);
        let mines = if config.mines > capacity {
            log::warn!(
                "Minefield too small, requested {} mines but only {} fit",
                config.mines,
                capacity
            );
            capacity
        } else {
            config.mines
        };

        let zone = siblings(anchor, config.size).len() as CellCount + 1;
        let keep_zone_clear = mines <= total_cells.saturating_sub(zone);
        if !keep_zone_clear {
            log::warn!("Cannot keep the start area clear, only the start cell stays safe");
        }

        let mut placed = 0;
        while placed < mines {
            let candidate = (self.draw(width), self.draw(height));
            let in_safe_zone = if keep_zone_clear {
                is_near(candidate, anchor)
            } else {
                candidate == anchor
            };
            if in_safe_zone || mine_mask[candidate.to_nd_index()] {
                continue;
            }

            mine_mask[candidate.to_nd_index()] = true;
            placed += 1;
        }

        log::debug!("Placed {} mines around start {:?}", placed, anchor);
        MineLayout::from_mine_mask(mine_mask)
    }
}
