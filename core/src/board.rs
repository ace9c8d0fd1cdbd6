use core::ops::Index;
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// Row-major grid of cells, fixed size for the lifetime of one game.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    pub fn new((width, height): Coord2) -> Self {
        let cells = Array2::from_shape_fn((usize::from(height), usize::from(width)), |(y, x)| {
            Cell::new((x as Coord, y as Coord))
        });
        Self { cells }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (cols as Coord, rows as Coord)
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        let (width, height) = self.size();
        x < width && y < height
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.contains(coords)
            .then(|| &self.cells[coords.to_nd_index()])
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        let (_, width) = self.cells.dim();
        self.cells
            .as_slice()
            .expect("layout should be standard")
            .chunks(width.max(1))
    }

    pub fn siblings(&self, coords: Coord2) -> Siblings {
        siblings(coords, self.size())
    }

    pub fn count_siblings(&self, coords: Coord2, filter: impl Fn(&Cell) -> bool) -> u8 {
        let count = self
            .siblings(coords)
            .into_iter()
            .filter(|&pos| filter(&self[pos]))
            .count();
        count as u8
    }

    pub fn mine_count(&self) -> CellCount {
        self.cells().filter(|cell| cell.is_mine()).count() as CellCount
    }

    pub fn flag_count(&self) -> CellCount {
        self.cells().filter(|cell| cell.flagged).count() as CellCount
    }

    /// Fixes every cell's mine state from `layout` and recomputes the numbers.
    pub(crate) fn place_mines(&mut self, layout: &MineLayout) -> Result<()> {
        if layout.size() != self.size() {
            return Err(GameError::LayoutMismatch);
        }

        for cell in self.cells.iter_mut() {
            cell.mine = if layout.contains_mine(cell.coords()) {
                MineState::Mine
            } else {
                MineState::Safe
            };
        }
        self.update_numbers();
        Ok(())
    }

    /// Stores the mined-sibling count on every safe cell.
    pub(crate) fn update_numbers(&mut self) {
        let (width, height) = self.size();
        for y in 0..height {
            for x in 0..width {
                let coords = (x, y);
                let adjacent_mines = if self[coords].is_mine() {
                    0
                } else {
                    self.count_siblings(coords, Cell::is_mine)
                };
                self.cell_mut(coords).adjacent_mines = adjacent_mines;
            }
        }
    }

    /// Opens the zero region around `start` and its numbered border.
    ///
    /// Walks an explicit stack, so board size does not bound recursion depth. Cells are
    /// marked revealed when pushed, which also keeps them from being pushed twice.
    /// Returns how many cells were newly revealed.
    pub(crate) fn expand_zero(&mut self, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            let cell = self[coords];
            if cell.adjacent_mines > 0 || cell.is_mine() {
                continue;
            }

            for sibling in self.siblings(coords) {
                let next = self.cell_mut(sibling);
                if !next.revealed {
                    next.revealed = true;
                    opened += 1;
                    log::trace!("Flood opened cell at {:?}", sibling);
                    to_visit.push(sibling);
                }
            }
        }

        opened
    }

    pub(crate) fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine()) {
            cell.revealed = true;
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
