// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local rules server stand-in for gateway integration tests

#![allow(dead_code)]

use chess_client_core::{Board, Color, GameState, Square};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use warp::http::StatusCode;
use warp::{Filter, Reply};

/// Requests seen by the stand-in server: endpoint name and JSON body
pub type Recorded = Arc<Mutex<Vec<(String, Value)>>>;

pub fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

/// Starting position as the server sends it, with the server's own spellings
pub fn initial_state_json() -> Value {
    let mut state = GameState::new(Board::initial(), Color::White);
    state.legal_moves.insert(sq("e2"), BTreeSet::from([sq("e3"), sq("e4")]));
    state.legal_moves.insert(sq("g1"), BTreeSet::from([sq("f3"), sq("h3")]));

    let mut value = serde_json::to_value(&state).unwrap();
    value["winner"] = json!("NONTERMINAL");
    value["server_version"] = json!("1.0");
    value
}

/// Answer to a move: the request snapshot with the move's effects applied
fn answer_move(mut body: Value, delta: &[&str], turn: &str) -> Value {
    if let Some(fields) = body.as_object_mut() {
        fields.remove("piece");
        fields.remove("target");
        fields.remove("promotion_type");
    }
    body["turn"] = json!(turn);
    body["legal_moves"] = json!({});
    body["algebraic_notation_delta"] = json!(delta);
    body
}

fn move_reply(body: Value, delta: &[&str], turn: &str) -> warp::reply::Response {
    // e5 stands in for any illegal destination
    if body["target"] == json!(sq("e5").index()) {
        return warp::reply::with_status(
            warp::reply::json(&json!({ "message": "Illegal move" })),
            StatusCode::BAD_REQUEST,
        )
        .into_response();
    }
    warp::reply::json(&answer_move(body, delta, turn)).into_response()
}

/// Bind `routes` to an ephemeral local port and return its base URL
macro_rules! serve {
    ($routes:expr) => {{
        let (addr, server) = warp::serve($routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        format!("http://{addr}")
    }};
}

/// Serve the four endpoints on an ephemeral port
pub fn spawn_rules_server() -> (String, Recorded) {
    let recorded: Recorded = Arc::default();

    let reset = warp::get()
        .and(warp::path("reset"))
        .and(warp::path::end())
        .map(|| warp::reply::json(&initial_state_json()));

    let pieces = warp::get()
        .and(warp::path("load_pieces"))
        .and(warp::path::end())
        .map(|| {
            warp::reply::json(&json!({
                "P": "<svg>white pawn</svg>",
                "k": "<svg>black king</svg>",
                "X": "<svg>not a piece</svg>",
            }))
        });

    let log = recorded.clone();
    let human = warp::post()
        .and(warp::path("move"))
        .and(warp::path::end())
        .and(warp::body::json())
        .map(move |body: Value| {
            log.lock().push(("move".to_string(), body.clone()));
            move_reply(body, &["e4"], "b")
        });

    let log = recorded.clone();
    let versus_ai = warp::post()
        .and(warp::path("moveai"))
        .and(warp::path::end())
        .and(warp::body::json())
        .map(move |body: Value| {
            log.lock().push(("moveai".to_string(), body.clone()));
            move_reply(body, &["e4", "e5"], "w")
        });

    let routes = reset.or(pieces).or(human).or(versus_ai);
    (serve!(routes), recorded)
}

/// Every request answered with `status` and a plain text body
pub fn spawn_status_server(status: StatusCode) -> String {
    let routes = warp::any().map(move || warp::reply::with_status("boom", status));
    serve!(routes)
}

/// Every request answered after `delay`
pub fn spawn_slow_server(delay: Duration) -> String {
    let routes = warp::any().and_then(move || async move {
        tokio::time::sleep(delay).await;
        Ok::<_, Infallible>(warp::reply::json(&initial_state_json()))
    });
    serve!(routes)
}

/// Address nothing listens on
pub fn closed_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

