// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction engine: selection, promotion, history, undo and persistence.
//!
//! The server is the only authority on chess rules. The engine never decides
//! legality itself; it gates clicks against the legal moves of the snapshot it
//! holds and replaces that snapshot wholesale with whatever the server
//! confirms.

use crate::renderer::Renderer;
use chess_client_core::{
    Board, Color, GameState, MoveHistory, PromotionKind, RenderIndex, Square,
};
use chess_client_network::{
    GatewayError, KeyValueStore, MoveRequest, ServerGateway, SessionStore,
};
use thiserror::Error;

/// Alert shown when the server refuses a move
pub const ILLEGAL_MOVE_ALERT: &str = "illegal move";
/// Alert shown when a move could not be delivered
pub const UNREACHABLE_ALERT: &str = "could not reach server";
/// Alert shown when undo has nothing to restore
pub const CANNOT_UNDO_ALERT: &str = "cannot undo";
/// Alert shown when a new game could not be fetched
pub const RESET_FAILED_ALERT: &str = "could not reset game";

/// Where the user is in the two-click move gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// A piece with legal moves was clicked
    PieceSelected(Square),
    /// A pawn move to the last rank waits for the piece choice
    PromotionPending { source: Square, target: Square },
}

/// What a square click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// First click of a gesture, whether or not the square has moves
    Selected,
    /// Selection (or pending promotion) dropped
    Deselected,
    PromotionRequested,
    /// The server confirmed the move
    Moved,
    /// The move was submitted and failed
    Rejected,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("No promotion is pending")]
    NoPromotionPending,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Snapshot to go back to, and how many history tokens the move after it added
#[derive(Debug, Clone)]
struct UndoEntry {
    state: GameState,
    tokens_appended: usize,
}

pub struct InteractionEngine<G, S, R> {
    gateway: G,
    session: SessionStore<S>,
    renderer: R,
    state: GameState,
    selection: Selection,
    undo: Option<UndoEntry>,
    history: MoveHistory,
    use_ai: bool,
    default_use_ai: bool,
}

impl<G, S, R> InteractionEngine<G, S, R>
where
    G: ServerGateway,
    S: KeyValueStore,
    R: Renderer,
{
    /// Load glyphs, then resume the saved session or start a new game
    pub async fn start(
        gateway: G,
        store: S,
        mut renderer: R,
        default_use_ai: bool,
    ) -> Result<Self, EngineError> {
        match gateway.load_piece_glyphs().await {
            Ok(glyphs) => renderer.set_piece_glyphs(&glyphs),
            Err(e) => tracing::warn!("Could not load piece glyphs: {}", e),
        }

        let session = SessionStore::new(store);
        let saved = restore(&session, default_use_ai);

        let mut engine = Self {
            gateway,
            session,
            renderer,
            state: GameState::new(Board::empty(), Color::White),
            selection: Selection::Idle,
            undo: None,
            history: MoveHistory::new(),
            use_ai: default_use_ai,
            default_use_ai,
        };

        match saved {
            Some((state, history, use_ai)) => {
                tracing::info!(moves = history.len(), use_ai, "Resumed saved game");
                engine.state = state;
                engine.history = history;
                engine.use_ai = use_ai;
                engine.renderer.set_use_ai(use_ai);
                if engine.state.winner.is_terminal() {
                    engine.renderer.notify_terminal(engine.state.winner);
                }
                engine.redraw();
            }
            None => engine.reset().await?,
        }

        Ok(engine)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn use_ai(&self) -> bool {
        self.use_ai
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Handle a click on the cell at `index`
    pub async fn on_square_click(&mut self, index: RenderIndex) -> ClickOutcome {
        let square = index.to_square();

        match self.selection {
            Selection::Idle => self.select(square),
            Selection::PieceSelected(source) => {
                if !self.state.is_legal(source, square) {
                    tracing::debug!(%source, target = %square, "Deselected");
                    self.selection = Selection::Idle;
                    self.renderer.clear_highlights();
                    return ClickOutcome::Deselected;
                }

                self.renderer.clear_highlights();
                if self.state.is_promotion(source, square) {
                    tracing::debug!(%source, target = %square, "Promotion requested");
                    self.selection = Selection::PromotionPending {
                        source,
                        target: square,
                    };
                    self.renderer.show_promotion_dialog();
                    return ClickOutcome::PromotionRequested;
                }

                self.selection = Selection::Idle;
                self.submit(source, square, None).await
            }
            Selection::PromotionPending { .. } => {
                // A click elsewhere dismisses the dialog and is consumed
                self.close_promotion();
                ClickOutcome::Deselected
            }
        }
    }

    /// Submit the pending promotion with the chosen piece
    pub async fn choose_promotion(&mut self, kind: PromotionKind) -> Result<ClickOutcome, EngineError> {
        let Selection::PromotionPending { source, target } = self.selection else {
            return Err(EngineError::NoPromotionPending);
        };
        self.close_promotion();
        Ok(self.submit(source, target, Some(kind)).await)
    }

    pub fn cancel_promotion(&mut self) -> Result<(), EngineError> {
        if !matches!(self.selection, Selection::PromotionPending { .. }) {
            return Err(EngineError::NoPromotionPending);
        }
        self.close_promotion();
        Ok(())
    }

    /// Go back to the snapshot before the last confirmed move
    pub fn undo(&mut self) -> Result<(), EngineError> {
        let Some(entry) = self.undo.take() else {
            self.renderer.alert(CANNOT_UNDO_ALERT);
            return Err(EngineError::NothingToUndo);
        };

        self.drop_selection();
        self.history.truncate_last(entry.tokens_appended);
        self.state = entry.state;
        tracing::info!(moves = self.history.len(), "Undid last move");

        self.persist_game();
        self.redraw();
        Ok(())
    }

    /// Fetch a new game from the server; nothing changes if that fails
    pub async fn reset(&mut self) -> Result<(), EngineError> {
        let fresh = match self.gateway.reset().await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Reset failed: {}", e);
                self.renderer.alert(RESET_FAILED_ALERT);
                return Err(e.into());
            }
        };

        self.drop_selection();
        self.undo = None;
        self.history.clear();
        self.state = fresh;
        self.use_ai = self.default_use_ai;

        if let Err(e) = self.session.clear() {
            tracing::error!("Could not clear saved session: {}", e);
        }
        self.persist_game();
        tracing::info!("New game started");

        self.renderer.set_use_ai(self.use_ai);
        self.redraw();
        Ok(())
    }

    pub fn set_use_ai(&mut self, use_ai: bool) {
        self.use_ai = use_ai;
        if let Err(e) = self.session.save_use_ai(use_ai) {
            tracing::error!("Could not save AI toggle: {}", e);
        }
        tracing::info!(use_ai, "AI toggle changed");
        self.renderer.set_use_ai(use_ai);
    }

    pub fn toggle_ai(&mut self) {
        self.set_use_ai(!self.use_ai);
    }

    pub fn show_history(&mut self) {
        self.renderer.show_history(self.history.tokens());
    }

    pub fn export_history(&self) -> String {
        self.history.export()
    }

    /// Any first click selects; a square without moves highlights nothing
    fn select(&mut self, square: Square) -> ClickOutcome {
        let targets: Vec<RenderIndex> = self
            .state
            .destinations(square)
            .map(|targets| targets.iter().map(|target| target.to_render()).collect())
            .unwrap_or_default();

        tracing::debug!(%square, moves = targets.len(), "Square selected");
        self.selection = Selection::PieceSelected(square);
        if !targets.is_empty() {
            self.renderer.highlight_squares(&targets);
        }
        ClickOutcome::Selected
    }

    async fn submit(
        &mut self,
        source: Square,
        target: Square,
        promotion: Option<PromotionKind>,
    ) -> ClickOutcome {
        let mut request = MoveRequest::new(&self.state, source, target);
        if let Some(kind) = promotion {
            request = request.with_promotion(kind);
        }

        let result = if self.use_ai {
            self.gateway.submit_move_vs_ai(&request).await
        } else {
            self.gateway.submit_move(&request).await
        };

        match result {
            Ok(next) => {
                tracing::info!(%source, %target, ?promotion, "Move confirmed");
                self.apply_confirmed(next);
                ClickOutcome::Moved
            }
            Err(e) => {
                tracing::warn!(%source, %target, "Move failed: {}", e);
                let message = if e.is_rejection() {
                    ILLEGAL_MOVE_ALERT
                } else {
                    UNREACHABLE_ALERT
                };
                self.renderer.alert(message);
                ClickOutcome::Rejected
            }
        }
    }

    fn apply_confirmed(&mut self, next: GameState) {
        let tokens_appended = next.algebraic_notation_delta.len();
        self.history
            .extend(next.algebraic_notation_delta.iter().cloned());
        let previous = std::mem::replace(&mut self.state, next);
        self.undo = Some(UndoEntry {
            state: previous,
            tokens_appended,
        });

        self.persist_game();

        if let Some(text) = self.state.winner.announcement() {
            tracing::info!("Game over: {}", text);
            self.renderer.notify_terminal(self.state.winner);
        }
        self.redraw();
    }

    fn close_promotion(&mut self) {
        self.selection = Selection::Idle;
        self.renderer.close_promotion_dialog();
    }

    fn drop_selection(&mut self) {
        if matches!(self.selection, Selection::PromotionPending { .. }) {
            self.renderer.close_promotion_dialog();
        }
        self.selection = Selection::Idle;
    }

    /// Confirmed state stays in place even when it cannot be saved
    fn persist_game(&self) {
        if let Err(e) = self.session.save_state(&self.state) {
            tracing::error!("Could not save board: {}", e);
        }
        if let Err(e) = self.session.save_history(&self.history) {
            tracing::error!("Could not save move history: {}", e);
        }
    }

    fn redraw(&mut self) {
        self.renderer.clear_highlights();
        self.renderer.render_pieces(&self.state.pieces);
        self.renderer.set_status_text(&self.state.status_text());
    }
}

/// Saved board, history and AI toggle; `None` when there is no usable game
fn restore<S: KeyValueStore>(
    session: &SessionStore<S>,
    default_use_ai: bool,
) -> Option<(GameState, MoveHistory, bool)> {
    let state = match session.load_state() {
        Ok(Some(state)) => state,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Saved board unreadable, starting a new game: {}", e);
            return None;
        }
    };

    let history = match session.load_history() {
        Ok(history) => history.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Saved history unreadable, starting a new game: {}", e);
            return None;
        }
    };

    let use_ai = match session.load_use_ai() {
        Ok(flag) => flag.unwrap_or(default_use_ai),
        Err(e) => {
            tracing::warn!("Saved AI toggle unreadable: {}", e);
            default_use_ai
        }
    };

    Some((state, history, use_ai))
}
