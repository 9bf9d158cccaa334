// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal front-end pieces: command parsing and the ASCII board view

#![deny(unsafe_code)]

pub mod command;
pub mod render;

pub use command::{default_export_path, Command, HELP};
pub use render::{render_board, BoardView};
