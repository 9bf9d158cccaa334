// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for worker integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chess_client_core::{Board, Color, GameState, Piece, RenderIndex, Square};
use chess_client_network::{GatewayError, GlyphMap, KeyValueStore, MoveRequest, ServerGateway};
use chess_client_ui::{drive, ChannelRenderer, EngineToUi, UiToEngine};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

pub fn click(name: &str) -> UiToEngine {
    UiToEngine::SquareClicked(render(name))
}

pub fn render(name: &str) -> RenderIndex {
    sq(name).to_render()
}

// Integration tests cannot see the crate's `test_util` module, so these
// positions are kept here separately. They differ on purpose: only e2 moves
// in `initial_state`, and `after_e4` gives black e7 moves so queued clicks
// have something to select after the reply.
pub fn initial_state() -> GameState {
    let mut state = GameState::new(Board::initial(), Color::White);
    state.legal_moves.insert(sq("e2"), BTreeSet::from([sq("e3"), sq("e4")]));
    state
}

pub fn after_e4() -> GameState {
    let pieces = Board::initial()
        .with_piece(sq("e2"), None)
        .with_piece(sq("e4"), Piece::from_code("P").ok());
    let mut state = GameState::new(pieces, Color::Black);
    state.legal_moves.insert(sq("e7"), BTreeSet::from([sq("e6"), sq("e5")]));
    state.algebraic_notation_delta = vec!["e4".to_string()];
    state
}

#[derive(Default)]
struct Script {
    reset_state: Option<GameState>,
    replies: VecDeque<GameState>,
    moves: Vec<(Square, Square)>,
    resets: usize,
}

/// Gateway answering from a script, optionally after a delay
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
    delay: Duration,
}

impl ScriptedGateway {
    pub fn new(reset_state: Option<GameState>, replies: Vec<GameState>) -> Self {
        let gateway = Self::default();
        {
            let mut script = gateway.script.lock();
            script.reset_state = reset_state;
            script.replies = replies.into();
        }
        gateway
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn resets(&self) -> usize {
        self.script.lock().resets
    }

    pub fn moves(&self) -> Vec<(Square, Square)> {
        self.script.lock().moves.clone()
    }

    async fn answer(&self, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        let reply = {
            let mut script = self.script.lock();
            script.moves.push((request.piece, request.target));
            script.replies.pop_front()
        };
        tokio::time::sleep(self.delay).await;
        reply.ok_or(GatewayError::Rejected {
            status: 400,
            message: "Illegal move".into(),
        })
    }
}

#[async_trait]
impl ServerGateway for ScriptedGateway {
    async fn reset(&self) -> Result<GameState, GatewayError> {
        let mut script = self.script.lock();
        script.resets += 1;
        script
            .reset_state
            .clone()
            .ok_or_else(|| GatewayError::Transport("connection refused".into()))
    }

    async fn load_piece_glyphs(&self) -> Result<GlyphMap, GatewayError> {
        Ok(GlyphMap::new())
    }

    async fn submit_move(&self, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        self.answer(request).await
    }

    async fn submit_move_vs_ai(&self, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        self.answer(request).await
    }
}

pub struct WorkerHandle {
    pub tx: Sender<UiToEngine>,
    pub rx: Receiver<EngineToUi>,
    pub thread: JoinHandle<anyhow::Result<()>>,
}

/// Run `drive` on its own thread, the way the real worker does
pub fn start_worker<S>(gateway: ScriptedGateway, store: S) -> WorkerHandle
where
    S: KeyValueStore + 'static,
{
    let (tx, engine_rx) = unbounded();
    let (ui_tx, rx) = unbounded();
    let thread = std::thread::spawn(move || -> anyhow::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let renderer = ChannelRenderer::new(ui_tx.clone());
        drive(&rt, gateway, store, renderer, engine_rx, ui_tx, false)
    });
    WorkerHandle { tx, rx, thread }
}

/// Messages up to (not including) the next `Settled`
pub fn until_settled(rx: &Receiver<EngineToUi>) -> Vec<EngineToUi> {
    let mut seen = Vec::new();
    loop {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            EngineToUi::Settled => return seen,
            msg => seen.push(msg),
        }
    }
}

/// Send `Shutdown` and return everything received until the acknowledgment
pub fn shutdown(worker: WorkerHandle) -> Vec<EngineToUi> {
    worker.tx.send(UiToEngine::Shutdown).unwrap();
    let mut seen = Vec::new();
    loop {
        match worker.rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            EngineToUi::ShutdownAck => break,
            msg => seen.push(msg),
        }
    }
    worker.thread.join().unwrap().unwrap();
    seen
}
