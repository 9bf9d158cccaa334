// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thin chess client driven by a rules server.
//!
//! The server decides everything about the rules. This workspace holds the
//! client side of the game:
//! - [`game`]: snapshots, square index spaces and move history
//! - [`network`]: the server gateway, session storage and configuration
//! - [`ui`]: the interaction engine and its background worker

#![deny(unsafe_code)]

pub use chess_client_core as game;
pub use chess_client_network as network;
pub use chess_client_ui as ui;

pub use chess_client_core::{GameState, MoveHistory, RenderIndex, Square};
pub use chess_client_network::{ClientConfig, HttpGateway, ServerGateway};
pub use chess_client_ui::{spawn_worker, EngineToUi, InteractionEngine, UiToEngine};
