use serde::{Deserialize, Serialize};

use crate::*;

/// Owned copy of everything a presenter needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub size: Coord2,
    pub mines: CellCount,
    pub status: GameStatus,
    pub mine_generated: bool,
    pub start_ms: u64,
    pub end_ms: Option<u64>,
    pub rows: Vec<Vec<Cell>>,
}

impl GameSnapshot {
    pub fn from_game<G: MineGenerator>(game: &Game<G>) -> Self {
        Self {
            size: game.size(),
            mines: game.total_mines(),
            status: game.status(),
            mine_generated: game.mine_generated(),
            start_ms: game.start_ms(),
            end_ms: game.end_ms(),
            rows: game.board().rows().map(<[Cell]>::to_vec).collect(),
        }
    }

    pub fn cell(&self, (x, y): Coord2) -> Option<&Cell> {
        self.rows.get(usize::from(y))?.get(usize::from(x))
    }

    /// Player-facing grid, hiding whatever the status does not give away.
    pub fn views(&self) -> Vec<Vec<CellView>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.view(self.status)).collect())
            .collect()
    }

    pub fn flag_count(&self) -> CellCount {
        self.rows.iter().flatten().filter(|cell| cell.flagged).count() as CellCount
    }
}

impl<G: MineGenerator> Game<G> {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_game(self)
    }
}
