// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message types for front-end to worker communication.

use chess_client_core::{Board, PromotionKind, RenderIndex, Winner};
use chess_client_network::GlyphMap;

/// Messages sent from the front-end to the engine worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiToEngine {
    /// A board cell was clicked
    SquareClicked(RenderIndex),
    /// Piece picked in the promotion dialog
    PromotionChosen(PromotionKind),
    /// Promotion dialog dismissed
    CancelPromotion,
    /// Take back the last move
    Undo,
    /// Start a new game
    Reset,
    /// Play against the server's AI or not
    SetUseAi(bool),
    ToggleAi,
    /// Ask for the move list
    ShowHistory,
    /// Ask for the move list in export format
    ExportHistory,
    /// Stop the worker
    Shutdown,
}

/// Messages sent from the engine worker to the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineToUi {
    /// Redraw all pieces
    RenderPieces(Board),
    /// Mark destination cells
    Highlight(Vec<RenderIndex>),
    ClearHighlights,
    ShowPromotionDialog,
    ClosePromotionDialog,
    /// Turn and check indicator
    Status(String),
    /// The game is over
    Terminal(Winner),
    /// Something the user must be told
    Alert(String),
    /// Piece glyphs served by the server
    Glyphs(GlyphMap),
    /// Current AI toggle
    UseAi(bool),
    /// Move list
    History(Vec<String>),
    /// Move list as numbered pairs
    HistoryExport(String),
    /// The previous message has been fully handled
    Settled,
    /// The worker could not start
    Fatal(String),
    /// Acknowledgment that shutdown was processed
    ShutdownAck,
}
