use crate::*;

/// One game from reset to win or loss.
///
/// Every mutation goes through `&mut self`, so a single owner serializes all moves.
/// Actions on a finished game, on revealed cells, or that would not change anything return
/// [`Outcome::NoChange`]. Errors are reserved for bad configuration or coordinates.
#[derive(Clone, Debug)]
pub struct Game<G = RandomMineGenerator> {
    config: GameConfig,
    board: Board,
    mine_generated: bool,
    status: GameStatus,
    start_ms: u64,
    end_ms: Option<u64>,
    generator: G,
}

impl Game<RandomMineGenerator> {
    /// Game with a seeded random generator.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, RandomMineGenerator::new(seed))
    }
}

impl<G: MineGenerator> Game<G> {
    pub fn new(config: GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        let mut game = Self {
            config,
            board: Board::new(config.size),
            mine_generated: false,
            status: GameStatus::Play,
            start_ms: 0,
            end_ms: None,
            generator,
        };
        game.restart();
        Ok(game)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        self.board.get(coords).ok_or(GameError::InvalidCoords)
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn mine_generated(&self) -> bool {
        self.mine_generated
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> Option<u64> {
        self.end_ms
    }

    /// Milliseconds from start to end, or to now while still playing.
    pub fn elapsed_ms(&self) -> u64 {
        self.end_ms
            .unwrap_or_else(now_ms)
            .saturating_sub(self.start_ms)
    }

    /// Mines not yet flagged, negative when there are more flags than mines.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.board.flag_count() as isize)
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Starts over on a new board of the given dimensions.
    pub fn reset(&mut self, width: Coord, height: Coord, mines: CellCount) -> Result<()> {
        self.config = GameConfig::new((width, height), mines)?;
        self.restart();
        Ok(())
    }

    /// Starts over with the current dimensions and mine count.
    pub fn restart(&mut self) {
        self.board = Board::new(self.config.size);
        self.mine_generated = false;
        self.status = GameStatus::Play;
        self.start_ms = now_ms();
        self.end_ms = None;
        log::debug!(
            "New game {}x{} with {} mines",
            self.config.width(),
            self.config.height(),
            self.config.mines
        );
    }

    pub fn apply(&mut self, coords: Coord2, action: Action) -> Result<Outcome> {
        match action {
            Action::Reveal => self.reveal(coords),
            Action::ToggleFlag => self.toggle_flag(coords),
            Action::Chord => self.chord(coords),
        }
    }

    /// Opens a cell. The first reveal of a game places the mines around it.
    ///
    /// A flag does not protect the cell underneath: revealing a flagged mine loses, and a
    /// flagged safe cell opens with its flag still set.
    pub fn reveal(&mut self, coords: Coord2) -> Result<Outcome> {
        let coords = self.board.validate_coords(coords)?;

        let cell = self.board[coords];
        if self.status.is_finished() || cell.revealed {
            return Ok(Outcome::NoChange);
        }

        self.ensure_mines(coords)?;

        self.board.cell_mut(coords).revealed = true;
        if self.board[coords].is_mine() {
            log::debug!("Mine hit at {:?}", coords);
            return Ok(self.game_over(GameStatus::Lost));
        }

        self.board.expand_zero(coords);
        Ok(Outcome::Changed | self.check_status())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<Outcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() || self.board[coords].revealed {
            return Ok(Outcome::NoChange);
        }

        let cell = self.board.cell_mut(coords);
        cell.flagged = !cell.flagged;
        Ok(Outcome::Changed | self.check_status())
    }

    /// Chord on a revealed number.
    ///
    /// When the flagged siblings match the number, every other sibling is revealed, and
    /// an unflagged mine among them loses the game. When the hidden siblings exactly match
    /// the flags still missing, they all get flagged. Both checks use the counts from
    /// before this call, so both can apply at once.
    pub fn chord(&mut self, coords: Coord2) -> Result<Outcome> {
        let coords = self.board.validate_coords(coords)?;

        let cell = self.board[coords];
        if self.status.is_finished() || !cell.revealed {
            return Ok(Outcome::NoChange);
        }

        let siblings = self.board.siblings(coords);
        let flags = self.board.count_siblings(coords, |sibling| sibling.flagged);
        let hidden: Siblings = siblings
            .iter()
            .copied()
            .filter(|&pos| self.board[pos].is_hidden())
            .collect();
        let missing_flags = i16::from(cell.adjacent_mines) - i16::from(flags);

        let mut outcome = Outcome::NoChange;

        if flags == cell.adjacent_mines {
            let mut hit_mine = false;
            for &pos in &siblings {
                let sibling = self.board[pos];
                if sibling.revealed || (sibling.flagged && sibling.is_mine()) {
                    continue;
                }

                self.board.cell_mut(pos).revealed = true;
                outcome = outcome | Outcome::Changed;
                if sibling.is_mine() {
                    log::trace!("Chord from {:?} opened mine at {:?}", coords, pos);
                    hit_mine = true;
                } else {
                    self.board.expand_zero(pos);
                }
            }

            if hit_mine {
                outcome = outcome | self.game_over(GameStatus::Lost);
            }
        }

        if !self.status.is_finished() && missing_flags == hidden.len() as i16 {
            for &pos in &hidden {
                let sibling = self.board.cell_mut(pos);
                if sibling.is_hidden() {
                    sibling.flagged = true;
                    outcome = outcome | Outcome::Changed;
                }
            }
        }

        Ok(outcome | self.check_status())
    }

    /// Ends the game once every cell is revealed or a flagged mine.
    ///
    /// Reaching that point with a flag on a safe cell is a loss. Does nothing before the
    /// mines exist or after the game has ended.
    pub fn check_status(&mut self) -> Outcome {
        if !self.mine_generated || self.status.is_finished() {
            return Outcome::NoChange;
        }

        if !self.board.cells().all(Cell::is_resolved) {
            return Outcome::NoChange;
        }

        let misflagged = self
            .board
            .cells()
            .any(|cell| cell.flagged && !cell.is_mine());
        self.game_over(if misflagged {
            GameStatus::Lost
        } else {
            GameStatus::Won
        })
    }

    fn ensure_mines(&mut self, anchor: Coord2) -> Result<()> {
        if self.mine_generated {
            return Ok(());
        }

        let layout = self.generator.generate(self.config, anchor);
        if layout.mine_count() != self.config.mines {
            log::warn!(
                "Generated layout has {} mines but {} were requested",
                layout.mine_count(),
                self.config.mines
            );
            return Err(GameError::LayoutMismatch);
        }
        self.board.place_mines(&layout)?;
        self.mine_generated = true;
        Ok(())
    }

    fn game_over(&mut self, status: GameStatus) -> Outcome {
        if self.status.is_finished() {
            return Outcome::NoChange;
        }

        self.status = status;
        let now = now_ms();
        self.end_ms.replace(now);
        log::debug!("Game {:?} at {}", status, now);

        match status {
            GameStatus::Lost => {
                self.board.reveal_all_mines();
                Outcome::Lost
            }
            GameStatus::Won => Outcome::Won,
            GameStatus::Play => Outcome::NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2, mines: &[Coord2]) -> Game<MineLayout> {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        Game::new(layout.game_config(), layout).unwrap()
    }

    #[test]
    fn new_game_waits_for_first_reveal() {
        let game = Game::seeded(GameConfig::default(), 1).unwrap();

        assert_eq!(game.status(), GameStatus::Play);
        assert!(!game.mine_generated());
        assert!(game.end_ms().is_none());
        assert!(game.start_ms() > 0);
        assert!(game.board().cells().all(|cell| !cell.mine.is_known()));
    }

    #[test]
    fn new_rejects_bad_config() {
        let config = GameConfig::new_unchecked((3, 3), 9);
        assert_eq!(
            Game::seeded(config, 0).err(),
            Some(GameError::TooManyMines { mines: 9, cells: 9 })
        );
    }

    #[test]
    fn first_reveal_generates_once() {
        let mut game = Game::seeded(GameConfig::new((9, 9), 10).unwrap(), 9).unwrap();

        game.reveal((4, 4)).unwrap();
        let first: Vec<MineState> = game.board().cells().map(|cell| cell.mine).collect();
        assert!(game.mine_generated());
        assert_eq!(game.board().mine_count(), 10);

        let next = game
            .board()
            .cells()
            .find(|cell| !cell.revealed && !cell.is_mine())
            .map(Cell::coords);
        if let Some(coords) = next {
            game.reveal(coords).unwrap();
        }
        let second: Vec<MineState> = game.board().cells().map(|cell| cell.mine).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reveal_mine_loses_and_shows_all_mines() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);
        game.toggle_flag((2, 2)).unwrap();

        assert_eq!(game.reveal((0, 0)).unwrap(), Outcome::Lost);
        assert_eq!(game.status(), GameStatus::Lost);
        assert!(game.end_ms().is_some());
        assert!(game.board()[(0, 0)].revealed);
        assert!(game.board()[(2, 2)].revealed);
        assert!(!game.board()[(1, 1)].revealed);
    }

    #[test]
    fn finished_game_ignores_moves() {
        let mut game = game((3, 1), &[(0, 0)]);
        game.reveal((0, 0)).unwrap();
        let end_ms = game.end_ms();

        assert_eq!(game.reveal((2, 0)).unwrap(), Outcome::NoChange);
        assert_eq!(game.toggle_flag((2, 0)).unwrap(), Outcome::NoChange);
        assert_eq!(game.chord((0, 0)).unwrap(), Outcome::NoChange);
        assert!(!game.board()[(2, 0)].revealed);
        assert!(!game.board()[(2, 0)].flagged);
        assert_eq!(game.end_ms(), end_ms);
    }

    #[test]
    fn bad_coords_are_errors() {
        let mut game = game((2, 2), &[(0, 0)]);
        assert_eq!(game.reveal((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(game.apply((0, 5), Action::ToggleFlag), Err(GameError::InvalidCoords));
        assert_eq!(game.cell((9, 9)).err(), Some(GameError::InvalidCoords));
    }

    #[test]
    fn layout_of_wrong_size_fails_first_reveal() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut game = Game::new(GameConfig::new((3, 3), 1).unwrap(), layout).unwrap();

        assert_eq!(game.reveal((1, 1)), Err(GameError::LayoutMismatch));
        assert!(!game.mine_generated());
    }

    #[test]
    fn layout_with_wrong_mine_count_fails_first_reveal() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0)]).unwrap();
        let mut game = Game::new(GameConfig::new((3, 3), 2).unwrap(), layout).unwrap();

        assert_eq!(game.reveal((2, 2)), Err(GameError::LayoutMismatch));
        assert!(!game.mine_generated());
        assert!(!game.board()[(2, 2)].revealed);
        assert!(game.board().cells().all(|cell| !cell.mine.is_known()));
    }

    #[test]
    fn flag_toggles_only_unrevealed_cells() {
        let mut game = game((3, 1), &[(2, 0)]);

        assert_eq!(game.toggle_flag((0, 0)).unwrap(), Outcome::Changed);
        assert!(game.board()[(0, 0)].flagged);
        assert_eq!(game.mines_left(), 0);
        assert_eq!(game.toggle_flag((0, 0)).unwrap(), Outcome::Changed);
        assert!(!game.board()[(0, 0)].flagged);

        game.reveal((1, 0)).unwrap();
        assert_eq!(game.toggle_flag((1, 0)).unwrap(), Outcome::NoChange);
        assert!(!game.board()[(1, 0)].flagged);
    }

    #[test]
    fn reveal_opens_flagged_safe_cell() {
        let mut game = game((5, 1), &[(2, 0)]);
        game.reveal((0, 0)).unwrap();
        game.toggle_flag((3, 0)).unwrap();

        assert_eq!(game.reveal((3, 0)).unwrap(), Outcome::Changed);
        assert!(game.board()[(3, 0)].revealed);
        assert!(game.board()[(3, 0)].flagged);
        assert_eq!(game.status(), GameStatus::Play);
    }

    #[test]
    fn reveal_on_flagged_mine_loses() {
        let mut game = game((5, 1), &[(2, 0)]);
        game.reveal((0, 0)).unwrap();
        game.toggle_flag((2, 0)).unwrap();

        assert_eq!(game.reveal((2, 0)).unwrap(), Outcome::Lost);
        assert_eq!(game.status(), GameStatus::Lost);
        assert!(game.end_ms().is_some());
        assert!(game.board()[(2, 0)].revealed);
    }

    #[test]
    fn first_reveal_on_flagged_cell_generates_mines() {
        let mut game = game((3, 1), &[(2, 0)]);
        game.toggle_flag((0, 0)).unwrap();

        assert_eq!(game.reveal((0, 0)).unwrap(), Outcome::Changed);
        assert!(game.mine_generated());
        assert!(game.board()[(1, 0)].revealed);
    }

    #[test]
    fn win_needs_every_mine_flagged() {
        let mut game = game((2, 1), &[(1, 0)]);

        assert_eq!(game.reveal((0, 0)).unwrap(), Outcome::Changed);
        assert_eq!(game.status(), GameStatus::Play);

        assert_eq!(game.toggle_flag((1, 0)).unwrap(), Outcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
        assert!(game.end_ms().is_some());
    }

    #[test]
    fn flags_before_generation_do_not_end_game() {
        let mut game = game((2, 1), &[(1, 0)]);
        assert_eq!(game.toggle_flag((1, 0)).unwrap(), Outcome::Changed);
        assert_eq!(game.check_status(), Outcome::NoChange);

        assert_eq!(game.reveal((0, 0)).unwrap(), Outcome::Won);
    }

    #[test]
    fn flood_over_misflag_loses_at_completion() {
        // (2, 0) is flagged but safe, the zero region swallows it
        let mut game = game((4, 1), &[(3, 0)]);
        game.toggle_flag((3, 0)).unwrap();
        game.toggle_flag((1, 0)).unwrap();

        assert_eq!(game.reveal((0, 0)).unwrap(), Outcome::Lost);
        assert!(game.board()[(1, 0)].revealed);
        assert!(game.board()[(1, 0)].flagged);
    }

    #[test]
    fn chord_reveals_and_cascades() {
        let mut game = game((5, 1), &[(1, 0)]);
        game.reveal((0, 0)).unwrap();
        game.reveal((2, 0)).unwrap();
        game.toggle_flag((1, 0)).unwrap();

        assert_eq!(game.chord((2, 0)).unwrap(), Outcome::Won);
        assert!(game.board()[(3, 0)].revealed);
        assert!(game.board()[(4, 0)].revealed);
        assert!(!game.board()[(1, 0)].revealed);
    }

    #[test]
    fn chord_with_wrong_flag_loses() {
        // (1, 1) shows 1; the flag on (0, 0) is wrong, the mine is at (2, 0)
        let mut game = game((3, 3), &[(2, 0)]);
        game.reveal((1, 1)).unwrap();
        assert_eq!(game.board()[(1, 1)].adjacent_mines, 1);
        game.toggle_flag((0, 0)).unwrap();

        assert_eq!(game.chord((1, 1)).unwrap(), Outcome::Lost);
        assert_eq!(game.status(), GameStatus::Lost);
        assert!(game.board()[(0, 0)].revealed);
        assert!(game.board()[(2, 0)].revealed);
        assert_eq!(
            game.board()[(0, 0)].view(game.status()),
            CellView::IncorrectFlag
        );
    }

    #[test]
    fn chord_flags_forced_mines() {
        let mut game = game((3, 1), &[(0, 0), (2, 0)]);
        game.reveal((1, 0)).unwrap();

        assert_eq!(game.chord((1, 0)).unwrap(), Outcome::Won);
        assert!(game.board()[(0, 0)].flagged);
        assert!(game.board()[(2, 0)].flagged);
    }

    #[test]
    fn chord_leaves_undecided_siblings_alone() {
        let mut game = game((3, 2), &[(0, 0)]);
        game.reveal((1, 1)).unwrap();

        let before = game.board().clone();
        assert_eq!(game.chord((1, 1)).unwrap(), Outcome::NoChange);
        assert_eq!(&before, game.board());
    }

    #[test]
    fn chord_flags_last_hidden_sibling() {
        let mut game = game((4, 2), &[(0, 0)]);
        game.reveal((3, 1)).unwrap();
        assert!(game.board()[(1, 0)].revealed);
        assert!(!game.board()[(0, 1)].revealed);

        game.reveal((0, 1)).unwrap();
        assert_eq!(game.chord((1, 0)).unwrap(), Outcome::Won);
        assert!(game.board()[(0, 0)].flagged);
    }

    #[test]
    fn chord_on_hidden_cell_does_nothing() {
        let mut game = game((3, 1), &[(0, 0)]);
        game.reveal((2, 0)).unwrap();

        assert_eq!(game.chord((0, 0)).unwrap(), Outcome::NoChange);
        assert!(!game.board()[(0, 0)].flagged);
    }

    #[test]
    fn reset_discards_previous_game() {
        let mut game = Game::seeded(GameConfig::new((5, 5), 3).unwrap(), 4).unwrap();
        game.toggle_flag((0, 0)).unwrap();
        game.reveal((4, 4)).unwrap();

        game.reset(4, 3, 2).unwrap();

        assert_eq!(game.size(), (4, 3));
        assert_eq!(game.total_mines(), 2);
        assert_eq!(game.status(), GameStatus::Play);
        assert!(!game.mine_generated());
        assert!(game.end_ms().is_none());
        assert!(game.board().cells().all(|cell| {
            !cell.revealed && !cell.flagged && cell.mine == MineState::Unknown
        }));
    }

    #[test]
    fn reset_rejects_bad_dimensions_and_keeps_config() {
        let mut game = Game::seeded(GameConfig::default(), 0).unwrap();

        assert_eq!(game.reset(0, 3, 1), Err(GameError::EmptyBoard));
        assert_eq!(game.config(), GameConfig::default());
    }

    #[test]
    fn borrowed_generator_keeps_its_state() {
        let mut generator = RandomMineGenerator::new(3);
        let config = GameConfig::new((8, 8), 10).unwrap();

        let mut first = Game::new(config, &mut generator).unwrap();
        first.reveal((0, 0)).unwrap();
        let first_mines = first.board().mine_count();
        drop(first);

        let mut second = Game::new(config, &mut generator).unwrap();
        second.reveal((0, 0)).unwrap();

        assert_eq!(first_mines, 10);
        assert_eq!(second.board().mine_count(), 10);
    }
}
