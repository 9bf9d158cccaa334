// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted gateway and positions for engine tests

use crate::msg::EngineToUi;
use crate::renderer::ChannelRenderer;
use async_trait::async_trait;
use chess_client_core::{Board, Color, GameState, Piece, RenderIndex, Square};
use chess_client_network::{GatewayError, GlyphMap, MoveRequest, ServerGateway};
use crossbeam_channel::{unbounded, Receiver};
use parking_lot::Mutex;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

pub fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

pub fn render(name: &str) -> RenderIndex {
    sq(name).to_render()
}

pub fn channel_renderer() -> (ChannelRenderer, Receiver<EngineToUi>) {
    let (tx, rx) = unbounded();
    (ChannelRenderer::new(tx), rx)
}

/// Starting position with moves for the e-pawn and the king's knight
pub fn initial_state() -> GameState {
    let mut state = GameState::new(Board::initial(), Color::White);
    state.legal_moves.insert(sq("e2"), BTreeSet::from([sq("e3"), sq("e4")]));
    state.legal_moves.insert(sq("g1"), BTreeSet::from([sq("f3"), sq("h3")]));
    state
}

/// Server answer to 1. e4, with no legal moves for black.
/// `ui/tests/common` keeps its own copy that lets black move e7.
pub fn after_e4() -> GameState {
    let pieces = Board::initial()
        .with_piece(sq("e2"), None)
        .with_piece(sq("e4"), Piece::from_code("P").ok());
    let mut state = GameState::new(pieces, Color::Black);
    state.algebraic_notation_delta = vec!["e4".to_string()];
    state
}

/// White pawn on a7 about to promote, black pawn on h2
pub fn promotion_state() -> GameState {
    let board = Board::parse(
        "....k...
         P.......
         ........
         ........
         ........
         ........
         .......p
         ....K...",
    )
    .unwrap();
    let mut state = GameState::new(board, Color::White);
    state.legal_moves.insert(sq("a7"), BTreeSet::from([sq("a8")]));
    state.legal_moves.insert(sq("e1"), BTreeSet::from([sq("d1"), sq("f1")]));
    state
}

pub fn after_promotion() -> GameState {
    let board = promotion_state()
        .pieces
        .with_piece(sq("a7"), None)
        .with_piece(sq("a8"), Piece::from_code("N").ok());
    let mut state = GameState::new(board, Color::Black);
    state.algebraic_notation_delta = vec!["a8=N".to_string()];
    state
}

/// A move the mock gateway received
#[derive(Debug, Clone)]
pub struct RecordedMove {
    pub endpoint: &'static str,
    pub body: serde_json::Value,
}

#[derive(Default)]
struct MockInner {
    reset_state: Option<GameState>,
    offline: bool,
    responses: VecDeque<Result<GameState, GatewayError>>,
    requests: Vec<RecordedMove>,
    reset_calls: usize,
}

/// Scripted gateway; clones share the same script and log
#[derive(Clone, Default)]
pub struct MockGateway {
    inner: Arc<Mutex<MockInner>>,
}

impl MockGateway {
    pub fn new(reset_state: GameState) -> Self {
        let gateway = Self::default();
        gateway.inner.lock().reset_state = Some(reset_state);
        gateway
    }

    /// Queue the answer to the next move submission
    pub fn push_response(&self, response: Result<GameState, GatewayError>) {
        self.inner.lock().responses.push_back(response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().offline = offline;
    }

    pub fn requests(&self) -> Vec<RecordedMove> {
        self.inner.lock().requests.clone()
    }

    pub fn reset_calls(&self) -> usize {
        self.inner.lock().reset_calls
    }

    fn record(&self, endpoint: &'static str, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        let mut inner = self.inner.lock();
        if inner.offline {
            return Err(GatewayError::Transport("connection refused".into()));
        }
        inner.requests.push(RecordedMove {
            endpoint,
            body: serde_json::to_value(request).unwrap(),
        });
        inner
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Status(500)))
    }
}

#[async_trait]
impl ServerGateway for MockGateway {
    async fn reset(&self) -> Result<GameState, GatewayError> {
        let mut inner = self.inner.lock();
        if inner.offline {
            return Err(GatewayError::Transport("connection refused".into()));
        }
        inner.reset_calls += 1;
        inner.reset_state.clone().ok_or(GatewayError::Status(500))
    }

    async fn load_piece_glyphs(&self) -> Result<GlyphMap, GatewayError> {
        if self.inner.lock().offline {
            return Err(GatewayError::Transport("connection refused".into()));
        }
        let mut glyphs = GlyphMap::new();
        glyphs.insert(Piece::from_code("K").unwrap(), "<svg>K</svg>".to_string());
        Ok(glyphs)
    }

    async fn submit_move(&self, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        self.record("move", request)
    }

    async fn submit_move_vs_ai(&self, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        self.record("moveai", request)
    }
}
