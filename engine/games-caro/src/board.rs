//! Square board storage and the k-in-a-row check.

use engine_core::{GameError, Player, StateKey};

/// Cell value for an empty square. Stones use the `Player` discriminant.
pub const EMPTY: u8 = 2;

/// Line directions checked through a freshly placed stone:
/// row, column, diagonal, anti-diagonal.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// Decoded `board_len x board_len` position in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    board_len: usize,
    cells: Vec<u8>,
}

impl Board {
    /// Empty board.
    pub fn new(board_len: usize) -> Self {
        Self {
            board_len,
            cells: vec![EMPTY; board_len * board_len],
        }
    }

    /// Decode a key, validating its width and every cell value.
    pub fn from_key(key: &StateKey, board_len: usize) -> Result<Self, GameError> {
        let expected = board_len * board_len;
        if key.len() != expected {
            return Err(GameError::InvalidKeyLength {
                expected,
                actual: key.len(),
            });
        }
        if let Some((idx, &cell)) = key
            .as_bytes()
            .iter()
            .enumerate()
            .find(|(_, &c)| c > EMPTY)
        {
            return Err(GameError::CorruptedKey(format!(
                "Invalid board cell {} at index {}",
                cell, idx
            )));
        }
        Ok(Self {
            board_len,
            cells: key.as_bytes().to_vec(),
        })
    }

    /// Canonical key: one byte per cell.
    pub fn to_key(&self) -> StateKey {
        StateKey::from(self.cells.clone())
    }

    pub fn board_len(&self) -> usize {
        self.board_len
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.board_len + col]
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.cells.get(index) == Some(&EMPTY)
    }

    /// Empty cell indices in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == EMPTY)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place `player`'s stone. The caller checks that the cell is empty.
    pub fn place(&mut self, index: usize, player: Player) {
        self.cells[index] = player as u8;
    }

    /// Whether the stone at `(row, col)` is part of a run of at least `k`
    /// same-colored stones along any of the four lines through it.
    pub fn has_run_through(&self, row: usize, col: usize, k: usize) -> bool {
        let token = self.get(row, col);
        if token == EMPTY {
            return false;
        }
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let run = 1 + self.count_dir(row, col, dr, dc, token)
                + self.count_dir(row, col, -dr, -dc, token);
            run >= k
        })
    }

    /// Consecutive `token` stones starting next to `(row, col)` and walking
    /// in direction `(dr, dc)`.
    fn count_dir(&self, row: usize, col: usize, dr: isize, dc: isize, token: u8) -> usize {
        let n = self.board_len as isize;
        let (mut r, mut c) = (row as isize + dr, col as isize + dc);
        let mut count = 0;
        while r >= 0 && r < n && c >= 0 && c < n && self.get(r as usize, c as usize) == token {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(len: usize, stones: &[(usize, Player)]) -> Board {
        let mut board = Board::new(len);
        for &(idx, p) in stones {
            board.place(idx, p);
        }
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(3);
        assert_eq!(board.cells(), &[EMPTY; 9]);
        assert_eq!(board.empty_cells(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_key_roundtrip() {
        let board = board_with(3, &[(0, Player::White), (4, Player::Black)]);
        let key = board.to_key();
        assert_eq!(key.as_bytes(), &[0, 2, 2, 2, 1, 2, 2, 2, 2]);
        assert_eq!(Board::from_key(&key, 3).unwrap(), board);
    }

    #[test]
    fn test_from_key_rejects_wrong_width() {
        let key = StateKey::from(vec![EMPTY; 8]);
        assert_eq!(
            Board::from_key(&key, 3),
            Err(GameError::InvalidKeyLength {
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn test_from_key_rejects_bad_cell() {
        let mut bytes = vec![EMPTY; 9];
        bytes[5] = 7;
        let err = Board::from_key(&StateKey::from(bytes), 3).unwrap_err();
        assert!(matches!(err, GameError::CorruptedKey(_)));
    }

    #[test]
    fn test_runs_in_all_directions() {
        // Row
        let b = board_with(5, &[(5, Player::White), (6, Player::White), (7, Player::White)]);
        assert!(b.has_run_through(1, 1, 3));
        assert!(!b.has_run_through(1, 1, 4));

        // Column
        let b = board_with(5, &[(2, Player::Black), (7, Player::Black), (12, Player::Black)]);
        assert!(b.has_run_through(2, 2, 3));

        // Diagonal
        let b = board_with(5, &[(0, Player::White), (6, Player::White), (12, Player::White)]);
        assert!(b.has_run_through(0, 0, 3));

        // Anti-diagonal
        let b = board_with(5, &[(4, Player::Black), (8, Player::Black), (12, Player::Black)]);
        assert!(b.has_run_through(1, 3, 3));
    }

    #[test]
    fn test_run_broken_by_opponent() {
        let b = board_with(
            5,
            &[
                (0, Player::White),
                (1, Player::White),
                (2, Player::Black),
                (3, Player::White),
            ],
        );
        assert!(!b.has_run_through(0, 1, 3));
    }

    #[test]
    fn test_empty_cell_never_wins() {
        let b = Board::new(3);
        assert!(!b.has_run_through(1, 1, 1));
    }
}
