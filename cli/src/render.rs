// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use chess_client_core::{Board, Color, MoveHistory, Piece, PieceKind, RenderIndex};
use chess_client_ui::EngineToUi;
use std::collections::BTreeSet;

/// What the terminal currently shows, rebuilt from engine messages
#[derive(Debug, Default)]
pub struct BoardView {
    board: Board,
    highlights: BTreeSet<RenderIndex>,
    status: String,
    use_ai: bool,
    promotion_open: bool,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one engine message; returns a line to print, if any
    pub fn apply(&mut self, msg: EngineToUi) -> Option<String> {
        match msg {
            EngineToUi::RenderPieces(board) => self.board = board,
            EngineToUi::Highlight(squares) => self.highlights = squares.into_iter().collect(),
            EngineToUi::ClearHighlights => self.highlights.clear(),
            EngineToUi::ShowPromotionDialog => {
                self.promotion_open = true;
                return Some("Promote to? promote <q|r|b|n>, or cancel".to_string());
            }
            EngineToUi::ClosePromotionDialog => self.promotion_open = false,
            EngineToUi::Status(text) => self.status = text,
            EngineToUi::Terminal(outcome) => {
                return outcome.announcement().map(|text| format!("Game over: {text}"));
            }
            EngineToUi::Alert(message) => return Some(format!("! {message}")),
            EngineToUi::Glyphs(glyphs) => {
                tracing::debug!(count = glyphs.len(), "Piece glyphs received, using text symbols");
            }
            EngineToUi::UseAi(use_ai) => {
                self.use_ai = use_ai;
                return Some(format!("AI opponent: {}", if use_ai { "on" } else { "off" }));
            }
            EngineToUi::History(tokens) => {
                if tokens.is_empty() {
                    return Some("No moves yet".to_string());
                }
                let listing = MoveHistory::from_tokens(tokens).export();
                return Some(listing.trim_end().to_string());
            }
            EngineToUi::HistoryExport(_)
            | EngineToUi::Settled
            | EngineToUi::Fatal(_)
            | EngineToUi::ShutdownAck => {}
        }
        None
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn promotion_open(&self) -> bool {
        self.promotion_open
    }

    /// Board, then the status line
    pub fn render(&self) -> String {
        let mut output = render_board(&self.board, &self.highlights);
        output.push_str(&self.status);
        if self.use_ai {
            output.push_str("  [vs AI]");
        }
        output.push('\n');
        output
    }
}

/// Render the board as text, rank 8 at the top. Highlighted empty cells show
/// `*`, highlighted pieces are bracketed.
pub fn render_board(board: &Board, highlights: &BTreeSet<RenderIndex>) -> String {
    let mut output = String::new();
    push_file_labels(&mut output);

    for (row, cells) in board.cells().chunks(8).enumerate() {
        let rank = 8 - row;
        output.push_str(&format!("{rank} "));

        for (column, cell) in cells.iter().enumerate() {
            let highlighted = RenderIndex::new((row * 8 + column) as u8)
                .map(|index| highlights.contains(&index))
                .unwrap_or(false);

            let cell = match (cell, highlighted) {
                (Some(piece), true) => format!("[{}]", symbol(piece)),
                (Some(piece), false) => format!(" {} ", symbol(piece)),
                (None, true) => " * ".to_string(),
                (None, false) => " . ".to_string(),
            };
            output.push_str(&cell);
        }

        output.push_str(&format!(" {rank}\n"));
    }

    push_file_labels(&mut output);
    output
}

fn push_file_labels(output: &mut String) {
    output.push_str("  ");
    for file in 'a'..='h' {
        output.push_str(&format!(" {file} "));
    }
    output.truncate(output.trim_end().len());
    output.push('\n');
}

fn symbol(piece: &Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::King) => '♔',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::Black, PieceKind::King) => '♚',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Pawn) => '♟',
    }
}
