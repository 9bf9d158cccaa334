// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game snapshots as handed out by the rules server

use crate::square::{RenderIndex, Square, BOARD_CELLS};
use crate::{Color, GameError, Piece, Winner};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Legal destinations per source square for the side to move
pub type LegalMoves = BTreeMap<Square, BTreeSet<Square>>;

/// The 64 cells of a snapshot, stored in render order (a8 first)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; BOARD_CELLS],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [None; BOARD_CELLS],
        }
    }

    /// Parse a diagram of eight rows, rank 8 first, `.` for empty cells.
    /// Whitespace inside a row is ignored.
    pub fn parse(diagram: &str) -> Result<Self, GameError> {
        let codes: Vec<char> = diagram.chars().filter(|c| !c.is_whitespace()).collect();
        if codes.len() != BOARD_CELLS {
            return Err(GameError::BoardSize(codes.len()));
        }
        let mut board = Self::empty();
        for (ix, code) in codes.into_iter().enumerate() {
            if code != '.' {
                board.cells[ix] = Some(Piece::from_code(&code.to_string())?);
            }
        }
        Ok(board)
    }

    /// Standard starting position
    pub fn initial() -> Self {
        // Diagram is a constant; parse cannot fail on it.
        Self::parse(
            "rnbqkbnr
             pppppppp
             ........
             ........
             ........
             ........
             PPPPPPPP
             RNBQKBNR",
        )
        .unwrap_or_else(|_| Self::empty())
    }

    pub fn at_render(&self, index: RenderIndex) -> Option<Piece> {
        self.cells[index.index() as usize]
    }

    pub fn at(&self, square: Square) -> Option<Piece> {
        self.at_render(square.to_render())
    }

    /// Return a copy with `piece` placed on `square`
    pub fn with_piece(mut self, square: Square, piece: Option<Piece>) -> Self {
        self.cells[square.to_render().index() as usize] = piece;
        self
    }

    /// Cells in render order
    pub fn cells(&self) -> &[Option<Piece>] {
        &self.cells
    }

    fn from_codes(codes: Vec<Option<String>>) -> Result<Self, GameError> {
        if codes.len() != BOARD_CELLS {
            return Err(GameError::BoardSize(codes.len()));
        }
        let mut board = Self::empty();
        for (ix, code) in codes.into_iter().enumerate() {
            board.cells[ix] = match code.as_deref() {
                None | Some("") | Some(".") => None,
                Some(code) => Some(Piece::from_code(code)?),
            };
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.cells.iter())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let codes = Vec::<Option<String>>::deserialize(deserializer)?;
        Board::from_codes(codes).map_err(serde::de::Error::custom)
    }
}

/// Immutable snapshot of a game as last confirmed by the server.
///
/// Snapshots are never edited in place: every server response replaces the
/// client's snapshot as a whole, and `legal_moves` is only ever read against
/// the `pieces` and `turn` of the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Board contents in render order
    pub pieces: Board,
    /// Side to move
    pub turn: Color,
    /// Whether the side to move is in check
    pub in_check: bool,
    /// Legal destinations for the pieces of the side to move
    #[serde(default)]
    pub legal_moves: LegalMoves,
    /// Outcome, `none` while the game is running
    #[serde(default)]
    pub winner: Winner,
    /// Notation tokens for the move(s) that produced this snapshot
    #[serde(default)]
    pub algebraic_notation_delta: Vec<String>,
}

impl GameState {
    /// Snapshot with the given board and no legal moves
    pub fn new(pieces: Board, turn: Color) -> Self {
        Self {
            pieces,
            turn,
            in_check: false,
            legal_moves: LegalMoves::new(),
            winner: Winner::None,
            algebraic_notation_delta: Vec::new(),
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pieces.at(square)
    }

    /// Destinations for `source`; `None` when the server sent no entry
    pub fn destinations(&self, source: Square) -> Option<&BTreeSet<Square>> {
        self.legal_moves.get(&source)
    }

    pub fn is_legal(&self, source: Square, target: Square) -> bool {
        self.destinations(source)
            .is_some_and(|targets| targets.contains(&target))
    }

    /// A pawn of either color moving onto the first or last rank
    pub fn is_promotion(&self, source: Square, target: Square) -> bool {
        target.is_back_rank() && self.piece_at(source).is_some_and(|p| p.is_pawn())
    }

    /// Turn and check indicator shown next to the board
    pub fn status_text(&self) -> String {
        let mut text = format!("{} to move", self.turn.name());
        if self.in_check {
            text.push_str(" (in check)");
        }
        text
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}
