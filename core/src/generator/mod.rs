use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// Decides where the mines go once the first cell is revealed.
pub trait MineGenerator {
    /// Builds a layout for `config`. `anchor` is the first revealed cell.
    fn generate(&mut self, config: GameConfig, anchor: Coord2) -> MineLayout;
}

impl<G: MineGenerator + ?Sized> MineGenerator for &mut G {
    fn generate(&mut self, config: GameConfig, anchor: Coord2) -> MineLayout {
        (**self).generate(config, anchor)
    }
}

/// Fixed set of mine positions, stored row-major like the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Builds a layout from a mask indexed `[y, x]`.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords((width, height): Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default((usize::from(height), usize::from(width)));

        for &(x, y) in mine_coords {
            if x >= width || y >= height {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[(x, y).to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (cols as Coord, rows as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mine coordinates in row-major order.
    pub fn mines(&self) -> impl Iterator<Item = Coord2> {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((y, x), _)| (x as Coord, y as Coord))
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Replays the same board every game, wherever the first click lands.
impl MineGenerator for MineLayout {
    fn generate(&mut self, _config: GameConfig, _anchor: Coord2) -> MineLayout {
        self.clone()
    }
}
