//! Canonical state keys and player identities.
//!
//! A [`StateKey`] is the only handle the search engine ever holds on a game
//! position. It must be canonical: two move orders that reach the same board
//! produce byte-identical keys, so the tree store can merge them.

use std::fmt;
use std::sync::Arc;

/// One of the two seats in a zero-sum game.
///
/// The discriminant doubles as the stone value written into board keys, so
/// `White` is `0` and `Black` is `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::White, Player::Black];

    /// The other seat.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Index suitable for `[T; 2]` lookups.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Player::index`].
    pub fn from_index(index: usize) -> Option<Player> {
        match index {
            0 => Some(Player::White),
            1 => Some(Player::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => f.write_str("white"),
            Player::Black => f.write_str("black"),
        }
    }
}

/// Fixed-width canonical key for a game position.
///
/// Games encode one byte per board cell, so every key of a given variant has
/// the same length and there is no ambiguity from leading empty cells. The
/// bytes are reference counted: cloning a key along a descent is a pointer
/// copy, hashing touches the bytes once.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Arc<[u8]>);

impl StateKey {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for StateKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl From<&[u8]> for StateKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }
}

impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Digits keep small boards readable in logs: "222202122".
        f.write_str("StateKey(")?;
        for &b in self.0.iter() {
            if b < 10 {
                write!(f, "{}", b)?;
            } else {
                write!(f, "[{}]", b)?;
            }
        }
        f.write_str(")")
    }
}
