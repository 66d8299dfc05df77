use bevy::prelude::*;

use crate::{
    board::Board,
    config::{ConfigError, SessionConfig},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Ongoing,
    Won,
    Lost,
}

/// What a call to [`GameSession::choose_color`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// the anchor's region was recolored and a move was spent
    Flooded,
    /// the color was already the anchor's color
    Unchanged,
    /// the game is over or the color does not exist
    Rejected,
}

/// One game: the board, the moves spent so far and where the game stands.
#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    board: Board,
    moves_used: u32,
    max_moves: u32,
    status: Status,
    rng: fastrand::Rng,
}

impl GameSession {
    /// Deals the first board. Fails if `config` does not pass [`SessionConfig::validate`].
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_valid_config(config.validate()?))
    }

    /// `config` must already be valid.
    pub(crate) fn from_valid_config(config: SessionConfig) -> Self {
        let mut rng = config.rng();
        let board = Board::new(config.board_size, config.num_colors, &mut rng);
        let mut session = Self {
            board,
            moves_used: 0,
            max_moves: config.max_moves,
            status: Status::Ongoing,
            rng,
        };
        session.update_status();
        session
    }

    /// Floods the anchor's region with `color`.
    pub fn choose_color(&mut self, color: u8) -> MoveOutcome {
        if self.status != Status::Ongoing || color >= self.board.num_colors() {
            return MoveOutcome::Rejected;
        }
        let anchor_color = self.board.anchor_color();
        if color == anchor_color {
            return MoveOutcome::Unchanged;
        }

        self.board.flood_fill(anchor_color, color);
        self.moves_used += 1;
        self.update_status();
        MoveOutcome::Flooded
    }

    /// Deals a fresh board and forgets all spent moves.
    pub fn restart(&mut self) {
        self.board.initialize(&mut self.rng);
        self.moves_used = 0;
        self.status = Status::Ongoing;
        self.update_status();
    }

    fn update_status(&mut self) {
        if self.board.is_uniform() {
            self.status = Status::Won;
        } else if self.moves_used >= self.max_moves {
            self.status = Status::Lost;
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.status != Status::Ongoing
    }

    #[inline]
    pub fn moves_used(&self) -> u32 {
        self.moves_used
    }

    #[inline]
    pub fn max_moves(&self) -> u32 {
        self.max_moves
    }

    #[inline]
    pub fn moves_left(&self) -> u32 {
        self.max_moves.saturating_sub(self.moves_used)
    }

    #[cfg(test)]
    pub(crate) fn with_board(board: Board, max_moves: u32) -> Self {
        let mut session = Self {
            board,
            moves_used: 0,
            max_moves,
            status: Status::Ongoing,
            rng: fastrand::Rng::with_seed(0),
        };
        session.update_status();
        session
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::from_valid_config(SessionConfig::default())
    }
}

#[cfg(test)]
mod test {
    use bevy::math::uvec2;

    use super::*;

    fn seeded(seed: u64) -> SessionConfig {
        SessionConfig {
            seed: Some(seed),
            ..default()
        }
    }

    #[test]
    fn new_session_is_ongoing() {
        let session = GameSession::new(seeded(3)).unwrap();
        assert_eq!(Status::Ongoing, session.status());
        assert_eq!(0, session.moves_used());
        assert_eq!(15, session.max_moves());
        assert_eq!(15, session.moves_left());
        assert_eq!(12, session.board().size());
    }

    #[test]
    fn seeded_sessions_deal_the_same_board() {
        assert_eq!(
            GameSession::new(seeded(11)).unwrap().board(),
            GameSession::new(seeded(11)).unwrap().board()
        );
    }

    #[test]
    fn choosing_anchor_color_is_free() {
        let mut session = GameSession::new(seeded(5)).unwrap();
        let before = session.board().clone();
        let anchor = session.board().anchor_color();

        assert_eq!(MoveOutcome::Unchanged, session.choose_color(anchor));
        assert_eq!(0, session.moves_used());
        assert_eq!(&before, session.board());
    }

    #[test]
    fn choose_color_floods_and_counts() {
        let board = Board::from_rows([[0, 1], [1, 0]], 2);
        let mut session = GameSession::with_board(board, 5);

        assert_eq!(MoveOutcome::Flooded, session.choose_color(1));
        assert_eq!(1, session.moves_used());
        assert_eq!(1, session.board().get(uvec2(0, 0)));
        assert_eq!(1, session.board().get(uvec2(1, 0)));
        assert_eq!(1, session.board().get(uvec2(0, 1)));
        assert_eq!(0, session.board().get(uvec2(1, 1)));
        assert_eq!(Status::Ongoing, session.status());

        assert_eq!(MoveOutcome::Flooded, session.choose_color(0));
        assert_eq!(2, session.moves_used());
        assert_eq!(Status::Won, session.status());
    }

    #[test]
    fn out_of_range_color_is_rejected() {
        let mut session = GameSession::new(seeded(2)).unwrap();
        assert_eq!(MoveOutcome::Rejected, session.choose_color(4));
        assert_eq!(0, session.moves_used());
    }

    #[test]
    fn invalid_config_is_refused() {
        let empty = SessionConfig {
            board_size: 0,
            ..seeded(1)
        };
        assert_eq!(
            Some(ConfigError::EmptyBoard),
            GameSession::new(empty).err()
        );

        let colorless = SessionConfig {
            num_colors: 0,
            ..seeded(1)
        };
        assert_eq!(
            Some(ConfigError::ColorCount(0)),
            GameSession::new(colorless).err()
        );
    }

    #[test]
    fn win_sticks_until_restart() {
        let board = Board::from_rows([[0, 1], [1, 1]], 2);
        let mut session = GameSession::with_board(board, 1);

        assert_eq!(MoveOutcome::Flooded, session.choose_color(1));
        // winning on the last allowed move is still a win
        assert_eq!(Status::Won, session.status());
        assert_eq!(MoveOutcome::Rejected, session.choose_color(0));
        assert_eq!(Status::Won, session.status());
        assert_eq!(1, session.moves_used());
    }

    #[test]
    fn running_out_of_moves_loses() {
        let board = Board::from_rows([[0, 1, 2], [1, 2, 0], [2, 0, 1]], 3);
        let mut session = GameSession::with_board(board, 2);

        assert_eq!(MoveOutcome::Flooded, session.choose_color(1));
        assert_eq!(Status::Ongoing, session.status());
        assert_eq!(MoveOutcome::Flooded, session.choose_color(2));
        assert_eq!(Status::Lost, session.status());
        assert_eq!(0, session.moves_left());

        let before = session.board().clone();
        assert_eq!(MoveOutcome::Rejected, session.choose_color(0));
        assert_eq!(&before, session.board());
        assert_eq!(2, session.moves_used());
    }

    #[test]
    fn moves_never_decrease_until_restart() {
        let mut session = GameSession::new(seeded(8)).unwrap();
        let mut last = 0;
        for i in 0..40u8 {
            session.choose_color(i % 4);
            assert!(session.moves_used() >= last);
            last = session.moves_used();
        }
        assert!(session.is_over());

        session.restart();
        assert_eq!(0, session.moves_used());
        assert_eq!(Status::Ongoing, session.status());
        assert!(!session.board().is_uniform());
    }

    #[test]
    fn restart_deals_a_new_board() {
        let mut session = GameSession::new(seeded(4)).unwrap();
        let before = session.board().clone();
        session.restart();
        assert_ne!(&before, session.board());
        assert!(session.board().cells().iter().all(|c| *c < 4));
    }

    #[test]
    fn single_color_session_starts_won() {
        let mut session = GameSession::new(SessionConfig {
            num_colors: 1,
            ..seeded(1)
        })
        .unwrap();
        assert!(session.board().is_uniform());
        assert_eq!(Status::Won, session.status());

        session.restart();
        assert!(session.board().is_uniform());
        assert_eq!(Status::Won, session.status());
    }
}
