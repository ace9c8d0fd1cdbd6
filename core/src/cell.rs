use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2, GameStatus};

/// Whether a cell holds a mine, `Unknown` until the first reveal places them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MineState {
    #[default]
    Unknown,
    Mine,
    Safe,
}

impl MineState {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// One grid position. Only the board mutates these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: Coord,
    pub y: Coord,
    pub revealed: bool,
    pub mine: MineState,
    pub flagged: bool,
    /// Mined siblings, meaningful only for safe cells after generation.
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn new((x, y): Coord2) -> Self {
        Self {
            x,
            y,
            revealed: false,
            mine: MineState::Unknown,
            flagged: false,
            adjacent_mines: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }

    pub const fn is_mine(&self) -> bool {
        self.mine.is_mine()
    }

    /// Neither revealed nor flagged.
    pub const fn is_hidden(&self) -> bool {
        !self.revealed && !self.flagged
    }

    /// Counts as settled for the win check: opened, or a flag sitting on a mine.
    pub const fn is_resolved(&self) -> bool {
        self.revealed || (self.flagged && self.is_mine())
    }

    /// What a player is allowed to see of this cell.
    pub fn view(&self, status: GameStatus) -> CellView {
        use CellView::*;

        if self.flagged {
            let exposed = self.revealed || status == GameStatus::Lost;
            if exposed && self.mine == MineState::Safe {
                IncorrectFlag
            } else {
                Flagged
            }
        } else if self.revealed {
            if self.is_mine() {
                Mine
            } else {
                Revealed(self.adjacent_mines)
            }
        } else {
            Hidden
        }
    }
}

/// Player-facing rendering of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
    IncorrectFlag,
}

impl CellView {
    /// Whether the cell still looks covered.
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::IncorrectFlag)
    }
}
