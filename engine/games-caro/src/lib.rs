//! Caro (m,n,k) games for the caro-zero engine
//!
//! Two players alternately place stones on a square board; the first to line
//! up `k_to_win` stones along a row, column or diagonal wins. Tic-tac-toe is
//! the 3x3, k=3 member of the family.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{create_game, Player};
//! use games_caro::register_caro;
//!
//! register_caro();
//!
//! let game = create_game("caro7x7").expect("caro7x7 should be registered");
//! let start = game.initial_state();
//! let (next, won) = game.apply(&start, 24, Player::White).unwrap();
//! assert!(!won);
//! assert_eq!(game.legal_moves(&next).len(), 48);
//! ```

mod board;

pub use board::{Board, EMPTY};

use engine_core::{register_game, EncodedBatch, Game, GameError, Player, StateKey};

/// Shipped variants as `(env_id, board_len, k_to_win)`.
pub const VARIANTS: [(&str, usize, usize); 8] = [
    ("tictactoe", 3, 3),
    ("caro5x5", 5, 4),
    ("caro7x7", 7, 4),
    ("caro9x9", 9, 5),
    ("caro13x13", 13, 5),
    ("caro15x15", 15, 5),
    ("caro17x17", 17, 5),
    ("caro19x19", 19, 5),
];

/// Register every Caro variant with the global game registry.
pub fn register_caro() {
    register_game("tictactoe".to_string(), || Box::new(CaroGame::tictactoe()));
    register_game("caro5x5".to_string(), || {
        Box::new(CaroGame::new("caro5x5", 5, 4))
    });
    register_game("caro7x7".to_string(), || {
        Box::new(CaroGame::new("caro7x7", 7, 4))
    });
    register_game("caro9x9".to_string(), || {
        Box::new(CaroGame::new("caro9x9", 9, 5))
    });
    register_game("caro13x13".to_string(), || {
        Box::new(CaroGame::new("caro13x13", 13, 5))
    });
    register_game("caro15x15".to_string(), || {
        Box::new(CaroGame::new("caro15x15", 15, 5))
    });
    register_game("caro17x17".to_string(), || {
        Box::new(CaroGame::new("caro17x17", 17, 5))
    });
    register_game("caro19x19".to_string(), || {
        Box::new(CaroGame::new("caro19x19", 19, 5))
    });
}

/// One member of the Caro family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaroGame {
    env_id: String,
    board_len: usize,
    k_to_win: usize,
}

impl CaroGame {
    /// # Panics
    ///
    /// Panics if `k_to_win` is below 2 or larger than `board_len`; such a game
    /// is either trivial or unwinnable.
    pub fn new(env_id: impl Into<String>, board_len: usize, k_to_win: usize) -> Self {
        assert!(
            k_to_win > 1 && k_to_win <= board_len,
            "k_to_win must be in 2..=board_len"
        );
        Self {
            env_id: env_id.into(),
            board_len,
            k_to_win,
        }
    }

    pub fn tictactoe() -> Self {
        Self::new("tictactoe", 3, 3)
    }

    pub fn board_len(&self) -> usize {
        self.board_len
    }

    pub fn k_to_win(&self) -> usize {
        self.k_to_win
    }

    /// Decode a key produced by this variant.
    pub fn board(&self, state: &StateKey) -> Result<Board, GameError> {
        Board::from_key(state, self.board_len)
    }
}

impl Default for CaroGame {
    fn default() -> Self {
        Self::new("caro7x7", 7, 4)
    }
}

impl Game for CaroGame {
    fn env_id(&self) -> &str {
        &self.env_id
    }

    fn initial_state(&self) -> StateKey {
        Board::new(self.board_len).to_key()
    }

    fn action_space(&self) -> usize {
        self.board_len * self.board_len
    }

    fn obs_shape(&self) -> Vec<usize> {
        vec![2, self.board_len, self.board_len]
    }

    fn legal_moves(&self, state: &StateKey) -> Vec<usize> {
        state
            .as_bytes()
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == EMPTY)
            .map(|(i, _)| i)
            .collect()
    }

    fn illegal_moves(&self, state: &StateKey) -> Vec<usize> {
        state
            .as_bytes()
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != EMPTY)
            .map(|(i, _)| i)
            .collect()
    }

    fn apply(
        &self,
        state: &StateKey,
        action: usize,
        player: Player,
    ) -> Result<(StateKey, bool), GameError> {
        let mut board = self.board(state)?;
        if !board.is_empty_at(action) {
            return Err(GameError::IllegalMove {
                action,
                state: state.clone(),
            });
        }
        board.place(action, player);
        let won = board.has_run_through(
            action / self.board_len,
            action % self.board_len,
            self.k_to_win,
        );
        Ok((board.to_key(), won))
    }

    fn encode_batch(
        &self,
        states: &[StateKey],
        movers: &[Player],
    ) -> Result<EncodedBatch, GameError> {
        if states.len() != movers.len() {
            return Err(GameError::BatchMismatch {
                states: states.len(),
                movers: movers.len(),
            });
        }
        let cells = self.action_space();
        let mut batch = EncodedBatch::zeros(states.len(), &self.obs_shape());
        for (i, (state, &mover)) in states.iter().zip(movers).enumerate() {
            let board = self.board(state)?;
            let sample = batch.sample_mut(i);
            let (own, theirs) = sample.split_at_mut(cells);
            for (idx, &cell) in board.cells().iter().enumerate() {
                if cell == mover as u8 {
                    own[idx] = 1.0;
                } else if cell == mover.opponent() as u8 {
                    theirs[idx] = 1.0;
                }
            }
        }
        Ok(batch)
    }

    fn render(&self, state: &StateKey) -> String {
        let Ok(board) = self.board(state) else {
            return format!("<invalid {} key {:?}>", self.env_id, state);
        };
        let width = (self.action_space() - 1).to_string().len();
        let mut out = String::new();
        for row in 0..self.board_len {
            out.push('|');
            for col in 0..self.board_len {
                let cell = match board.get(row, col) {
                    c if c == Player::White as u8 => "X".to_string(),
                    c if c == Player::Black as u8 => "O".to_string(),
                    _ => (row * self.board_len + col).to_string(),
                };
                out.push_str(&format!("{:>width$}|", cell, width = width));
            }
            if row + 1 < self.board_len {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &CaroGame, moves: &[usize]) -> (StateKey, bool) {
        let mut state = game.initial_state();
        let mut player = Player::White;
        let mut won = false;
        for &m in moves {
            let (next, w) = game.apply(&state, m, player).unwrap();
            state = next;
            won = w;
            player = player.opponent();
        }
        (state, won)
    }

    #[test]
    fn test_initial_state() {
        let game = CaroGame::tictactoe();
        let s = game.initial_state();
        assert_eq!(s.len(), 9);
        assert_eq!(game.legal_moves(&s), (0..9).collect::<Vec<_>>());
        assert!(game.illegal_moves(&s).is_empty());
    }

    #[test]
    fn test_action_space_and_shape() {
        let game = CaroGame::new("caro9x9", 9, 5);
        assert_eq!(game.action_space(), 81);
        assert_eq!(game.obs_shape(), vec![2, 9, 9]);
    }

    #[test]
    fn test_apply_places_stone() {
        let game = CaroGame::tictactoe();
        let (s, won) = game.apply(&game.initial_state(), 4, Player::Black).unwrap();
        assert!(!won);
        assert_eq!(s.as_bytes()[4], Player::Black as u8);
        assert_eq!(game.illegal_moves(&s), vec![4]);
    }

    #[test]
    fn test_occupied_and_out_of_range_rejected() {
        let game = CaroGame::tictactoe();
        let (s, _) = game.apply(&game.initial_state(), 0, Player::White).unwrap();
        assert!(matches!(
            game.apply(&s, 0, Player::Black),
            Err(GameError::IllegalMove { action: 0, .. })
        ));
        assert!(matches!(
            game.apply(&s, 9, Player::Black),
            Err(GameError::IllegalMove { action: 9, .. })
        ));
    }

    #[test]
    fn test_tictactoe_row_win() {
        let game = CaroGame::tictactoe();
        // X: 0 1 2, O: 3 4
        let (_, won) = play(&game, &[0, 3, 1, 4, 2]);
        assert!(won);
    }

    #[test]
    fn test_tictactoe_draw_has_no_moves() {
        let game = CaroGame::tictactoe();
        // X O X / X O O / O X X
        let (s, won) = play(&game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(!won);
        assert!(game.legal_moves(&s).is_empty());
    }

    #[test]
    fn test_caro7x7_needs_four() {
        let game = CaroGame::new("caro7x7", 7, 4);
        // White on the anti-diagonal 6, 12, 18, Black elsewhere.
        let (s, won) = play(&game, &[6, 0, 12, 1, 18, 2]);
        assert!(!won);
        let (_, won) = game.apply(&s, 24, Player::White).unwrap();
        assert!(won);
    }

    #[test]
    fn test_encode_is_mover_relative() {
        let game = CaroGame::tictactoe();
        let (s, _) = play(&game, &[0, 8]);
        let batch = game
            .encode_batch(&[s.clone(), s], &[Player::White, Player::Black])
            .unwrap();

        assert_eq!(batch.obs_shape, vec![2, 3, 3]);
        let white = batch.sample(0);
        assert_eq!(white[0], 1.0);
        assert_eq!(white[9 + 8], 1.0);
        assert_eq!(white.iter().sum::<f32>(), 2.0);

        let black = batch.sample(1);
        assert_eq!(black[8], 1.0);
        assert_eq!(black[9], 1.0);
    }

    #[test]
    fn test_encode_batch_length_mismatch() {
        let game = CaroGame::tictactoe();
        let s = game.initial_state();
        assert_eq!(
            game.encode_batch(&[s.clone(), s], &[Player::White]),
            Err(GameError::BatchMismatch {
                states: 2,
                movers: 1
            })
        );
    }

    #[test]
    fn test_render() {
        let game = CaroGame::tictactoe();
        let (s, _) = play(&game, &[4, 0]);
        assert_eq!(game.render(&s), "|O|1|2|\n|3|X|5|\n|6|7|8|");
    }

    #[test]
    fn test_render_pads_indices() {
        let game = CaroGame::new("caro5x5", 5, 4);
        let first = game.render(&game.initial_state());
        assert!(first.starts_with("| 0| 1| 2| 3| 4|"));
    }

    #[test]
    #[should_panic]
    fn test_invalid_k_panics() {
        CaroGame::new("bad", 3, 4);
    }
}
