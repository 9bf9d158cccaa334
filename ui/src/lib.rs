// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chess Client UI - the client-side interaction core
//!
//! The engine turns square clicks into move submissions, keeps the move
//! history and undo cache, and tells a [`Renderer`] what to draw. The worker
//! runs it on a background thread behind a pair of channels.

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod engine;
pub mod msg;
pub mod renderer;
pub mod worker;

#[cfg(test)]
mod test_util;

pub use engine::{ClickOutcome, EngineError, InteractionEngine, Selection};
pub use msg::{EngineToUi, UiToEngine};
pub use renderer::{ChannelRenderer, Renderer};
pub use worker::{drive, spawn_worker};
