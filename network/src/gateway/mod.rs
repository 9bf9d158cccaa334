// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway to the rules server
//!
//! The server is stateless between calls: every move request carries the
//! full snapshot it should be applied to, and every successful response is a
//! complete new snapshot.

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use chess_client_core::{GameState, Piece, PromotionKind, Square};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Glyph (e.g. SVG markup) per piece, as served by the server
pub type GlyphMap = BTreeMap<Piece, String>;

/// Body of a move submission: the move merged over the current snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MoveRequest<'a> {
    /// Square the moving piece stands on
    pub piece: Square,
    /// Destination square
    pub target: Square,
    /// Piece chosen for a pawn reaching the last rank
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_type: Option<PromotionKind>,
    /// Snapshot the move applies to
    #[serde(flatten)]
    pub state: &'a GameState,
}

impl<'a> MoveRequest<'a> {
    pub fn new(state: &'a GameState, piece: Square, target: Square) -> Self {
        Self {
            piece,
            target,
            promotion_type: None,
            state,
        }
    }

    pub fn with_promotion(mut self, kind: PromotionKind) -> Self {
        self.promotion_type = Some(kind);
        self
    }
}

/// Errors returned by a gateway call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The server refused the request, e.g. an illegal move
    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Non-success status without an explanation
    #[error("Server returned status {0}")]
    Status(u16),

    /// No answer within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Answer that is not a valid payload
    #[error("Could not decode server response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// True when the server looked at the move and said no
    pub fn is_rejection(&self) -> bool {
        matches!(self, GatewayError::Rejected { .. })
    }
}

/// Remote operations of the rules server
#[async_trait]
pub trait ServerGateway: Send + Sync {
    /// Start a new game
    async fn reset(&self) -> Result<GameState, GatewayError>;

    /// Fetch the piece glyphs; purely cosmetic
    async fn load_piece_glyphs(&self) -> Result<GlyphMap, GatewayError>;

    /// Apply a human move
    async fn submit_move(&self, request: &MoveRequest<'_>) -> Result<GameState, GatewayError>;

    /// Apply a human move and let the server answer with its own move
    async fn submit_move_vs_ai(&self, request: &MoveRequest<'_>)
        -> Result<GameState, GatewayError>;
}
