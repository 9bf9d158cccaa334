// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rules server stand-in for end-to-end tests

#![allow(dead_code)]

use chess_client::game::{Board, Color, GameState, Piece, Square};
use chess_client::{EngineToUi, UiToEngine};
use crossbeam_channel::Receiver;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use warp::Filter;

pub fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

pub fn click(name: &str) -> UiToEngine {
    UiToEngine::SquareClicked(sq(name).to_render())
}

pub fn initial_state() -> GameState {
    let mut state = GameState::new(Board::initial(), Color::White);
    state.legal_moves.insert(sq("e2"), BTreeSet::from([sq("e3"), sq("e4")]));
    state
}

/// Server answer to 1. e4, whatever was asked
pub fn after_e4() -> GameState {
    let pieces = Board::initial()
        .with_piece(sq("e2"), None)
        .with_piece(sq("e4"), Piece::from_code("P").ok());
    let mut state = GameState::new(pieces, Color::Black);
    state.algebraic_notation_delta = vec!["e4".to_string()];
    state
}

/// A running stand-in server and its runtime
pub struct RulesServer {
    pub url: String,
    resets: Arc<AtomicUsize>,
    _runtime: Runtime,
}

impl RulesServer {
    pub fn start() -> Self {
        let runtime = Runtime::new().unwrap();
        let resets = Arc::new(AtomicUsize::new(0));

        let counter = resets.clone();
        let reset = warp::path("reset").map(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            warp::reply::json(&initial_state())
        });
        let pieces = warp::path("load_pieces").map(|| warp::reply::json(&json!({ "K": "<svg/>" })));
        let moves = warp::post()
            .and(warp::path("move").or(warp::path("moveai")).unify())
            .and(warp::body::json())
            .map(|_body: Value| warp::reply::json(&after_e4()));

        let routes = reset.or(pieces).or(moves);
        let (addr, server) = {
            let _guard = runtime.enter();
            warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0))
        };
        runtime.spawn(server);

        Self {
            url: format!("http://{addr}"),
            resets,
            _runtime: runtime,
        }
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

/// Messages up to (not including) the next `Settled`
pub fn until_settled(rx: &Receiver<EngineToUi>) -> Vec<EngineToUi> {
    let mut seen = Vec::new();
    loop {
        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            EngineToUi::Settled => return seen,
            msg => seen.push(msg),
        }
    }
}
