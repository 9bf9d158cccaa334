// SPDX-License-Identifier: MIT OR Apache-2.0

//! Square indices and the mapping between the two index spaces
//!
//! The server addresses cells with a [`Square`]: `rank * 8 + (7 - file)`, so
//! h1 is 0 and a8 is 63. The board view draws cells row-major from the top
//! left (a8 first), which is the same layout the `pieces` array of a snapshot
//! uses; those positions are [`RenderIndex`] values. The spaces mirror each
//! other and [`Square::to_render`] / [`RenderIndex::to_square`] are the only
//! places that convert between them.

use crate::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the board
pub const BOARD_CELLS: usize = 64;

const LAST: u8 = (BOARD_CELLS - 1) as u8;

/// Cell index in the server's (interaction) space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Square(u8);

/// Cell index in the drawing space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RenderIndex(u8);

impl Square {
    pub fn new(index: u8) -> Result<Self, GameError> {
        if index <= LAST {
            Ok(Self(index))
        } else {
            Err(GameError::InvalidSquare(index))
        }
    }

    /// Build from zero-based file (0 = a) and rank (0 = rank 1)
    pub fn from_file_rank(file: u8, rank: u8) -> Result<Self, GameError> {
        if file > 7 || rank > 7 {
            return Err(GameError::InvalidSquareName(format!("file {file} rank {rank}")));
        }
        Ok(Self(rank * 8 + (7 - file)))
    }

    /// Parse a name such as `e2`
    pub fn from_algebraic(name: &str) -> Result<Self, GameError> {
        let bytes = name.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(GameError::InvalidSquareName(name.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Self::from_file_rank(file, rank).map_err(|_| GameError::InvalidSquareName(name.to_string()))
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// Zero-based file, 0 = a
    pub fn file(&self) -> u8 {
        7 - self.0 % 8
    }

    /// Zero-based rank, 0 = rank 1
    pub fn rank(&self) -> u8 {
        self.0 / 8
    }

    /// True on rank 1 or rank 8, where pawns promote
    pub fn is_back_rank(&self) -> bool {
        self.0 < 8 || self.0 > 55
    }

    pub fn to_render(self) -> RenderIndex {
        RenderIndex(LAST - self.0)
    }

    /// All 64 squares in index order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..=LAST).map(Square)
    }
}

impl RenderIndex {
    pub fn new(index: u8) -> Result<Self, GameError> {
        if index <= LAST {
            Ok(Self(index))
        } else {
            Err(GameError::InvalidSquare(index))
        }
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// Row from the top of the drawn board
    pub fn row(&self) -> u8 {
        self.0 / 8
    }

    /// Column from the left of the drawn board
    pub fn column(&self) -> u8 {
        self.0 % 8
    }

    pub fn to_square(self) -> Square {
        Square(LAST - self.0)
    }
}

impl TryFrom<u8> for Square {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Square::new(index)
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl TryFrom<u8> for RenderIndex {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        RenderIndex::new(index)
    }
}

impl From<RenderIndex> for u8 {
    fn from(index: RenderIndex) -> Self {
        index.0
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl fmt::Display for RenderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
