// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drawing commands issued by the engine

use crate::msg::EngineToUi;
use chess_client_core::{Board, RenderIndex, Winner};
use chess_client_network::GlyphMap;
use crossbeam_channel::Sender;

/// Receiver of the engine's drawing commands.
///
/// All squares passed here are render indices. Commands are fire and
/// forget; a renderer that cannot draw drops them.
pub trait Renderer: Send {
    fn render_pieces(&mut self, board: &Board);
    fn highlight_squares(&mut self, squares: &[RenderIndex]);
    fn clear_highlights(&mut self);
    fn show_promotion_dialog(&mut self);
    fn close_promotion_dialog(&mut self);
    fn set_status_text(&mut self, text: &str);
    fn notify_terminal(&mut self, outcome: Winner);
    fn alert(&mut self, message: &str);
    fn set_piece_glyphs(&mut self, glyphs: &GlyphMap);
    fn set_use_ai(&mut self, use_ai: bool);
    fn show_history(&mut self, tokens: &[String]);
}

/// Renderer forwarding every command to a front-end thread
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    ui_tx: Sender<EngineToUi>,
}

impl ChannelRenderer {
    pub fn new(ui_tx: Sender<EngineToUi>) -> Self {
        Self { ui_tx }
    }

    fn send(&self, msg: EngineToUi) {
        if let Err(e) = self.ui_tx.send(msg) {
            tracing::debug!("Front-end gone, dropping {:?}", e.into_inner());
        }
    }
}

impl Renderer for ChannelRenderer {
    fn render_pieces(&mut self, board: &Board) {
        self.send(EngineToUi::RenderPieces(board.clone()));
    }

    fn highlight_squares(&mut self, squares: &[RenderIndex]) {
        self.send(EngineToUi::Highlight(squares.to_vec()));
    }

    fn clear_highlights(&mut self) {
        self.send(EngineToUi::ClearHighlights);
    }

    fn show_promotion_dialog(&mut self) {
        self.send(EngineToUi::ShowPromotionDialog);
    }

    fn close_promotion_dialog(&mut self) {
        self.send(EngineToUi::ClosePromotionDialog);
    }

    fn set_status_text(&mut self, text: &str) {
        self.send(EngineToUi::Status(text.to_string()));
    }

    fn notify_terminal(&mut self, outcome: Winner) {
        self.send(EngineToUi::Terminal(outcome));
    }

    fn alert(&mut self, message: &str) {
        self.send(EngineToUi::Alert(message.to_string()));
    }

    fn set_piece_glyphs(&mut self, glyphs: &GlyphMap) {
        self.send(EngineToUi::Glyphs(glyphs.clone()));
    }

    fn set_use_ai(&mut self, use_ai: bool) {
        self.send(EngineToUi::UseAi(use_ai));
    }

    fn show_history(&mut self, tokens: &[String]) {
        self.send(EngineToUi::History(tokens.to_vec()));
    }
}
