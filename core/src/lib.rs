// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chess Client Core - Board snapshots and client-side bookkeeping
//!
//! This crate provides the data the client keeps about a game:
//! - Piece codes and colors as the rules server spells them
//! - The two mirrored square index spaces and the mapping between them
//! - Immutable game snapshots (`GameState`) with their wire format
//! - Move history accumulation and export

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod history;
pub mod square;
pub mod state;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub use history::MoveHistory;
pub use square::{RenderIndex, Square};
pub use state::{Board, GameState, LegalMoves};

/// Side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// White player (moves first)
    #[serde(rename = "w")]
    White,
    /// Black player
    #[serde(rename = "b")]
    Black,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

/// Kind of a chess piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase letter used by the server
    pub fn letter(&self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A piece on the board. On the wire this is a single letter,
/// uppercase for white and lowercase for black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Wire code of this piece (`P`, `n`, ...)
    pub fn code(&self) -> char {
        let letter = self.kind.letter();
        match self.color {
            Color::White => letter.to_ascii_uppercase(),
            Color::Black => letter,
        }
    }

    /// Parse a wire code
    pub fn from_code(code: &str) -> Result<Self, GameError> {
        let mut chars = code.chars();
        let (Some(letter), None) = (chars.next(), chars.next()) else {
            return Err(GameError::UnknownPiece(code.to_string()));
        };
        let kind = PieceKind::from_letter(letter)
            .ok_or_else(|| GameError::UnknownPiece(code.to_string()))?;
        let color = if letter.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self { kind, color })
    }

    pub fn is_pawn(&self) -> bool {
        self.kind == PieceKind::Pawn
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Piece {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code().to_string())
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Piece::from_code(&code).map_err(serde::de::Error::custom)
    }
}

/// Piece a pawn may be promoted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionKind {
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "n")]
    Knight,
}

impl PromotionKind {
    /// Parse the letter a user types (`q`, `Q`, `queen`, ...)
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "q" | "queen" => Some(PromotionKind::Queen),
            "r" | "rook" => Some(PromotionKind::Rook),
            "b" | "bishop" => Some(PromotionKind::Bishop),
            "n" | "knight" => Some(PromotionKind::Knight),
            _ => None,
        }
    }
}

/// Outcome reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Winner {
    /// Game still in progress
    #[default]
    #[serde(rename = "none", alias = "NONTERMINAL", alias = "nonterminal")]
    None,
    #[serde(rename = "white_wins", alias = "P1_WINS", alias = "white")]
    WhiteWins,
    #[serde(rename = "black_wins", alias = "P2_WINS", alias = "black")]
    BlackWins,
    #[serde(rename = "draw", alias = "DRAW")]
    Draw,
}

impl Winner {
    pub fn is_terminal(&self) -> bool {
        *self != Winner::None
    }

    /// Text shown to the user when the game ends
    pub fn announcement(&self) -> Option<&'static str> {
        match self {
            Winner::None => None,
            Winner::WhiteWins => Some("White wins"),
            Winner::BlackWins => Some("Black wins"),
            Winner::Draw => Some("Draw"),
        }
    }
}

/// Errors raised while reading snapshots and coordinates
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Index outside 0..64
    #[error("Square index {0} out of range")]
    InvalidSquare(u8),

    /// Text that does not name a square
    #[error("Invalid square name: {0}")]
    InvalidSquareName(String),

    /// Piece code the client does not know
    #[error("Unknown piece code: {0:?}")]
    UnknownPiece(String),

    /// Board with the wrong number of cells
    #[error("Board must have 64 cells, got {0}")]
    BoardSize(usize),
}
