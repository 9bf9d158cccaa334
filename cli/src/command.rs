// SPDX-License-Identifier: MIT OR Apache-2.0

//! Commands typed at the prompt

use anyhow::{anyhow, bail, Result};
use chess_client_core::{PromotionKind, Square};
use chess_client_ui::UiToEngine;
use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  <square>            click a square, e.g. e2 then e4
  promote <q|r|b|n>   pick the piece for a pending promotion
  cancel              close the promotion dialog
  undo                take back the last move
  reset               start a new game
  ai [on|off]         play against the server (toggles without argument)
  history             list the moves so far
  export [path]       write the moves to a file
  help                show this text
  quit                leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Square(Square),
    Promote(PromotionKind),
    Cancel,
    Undo,
    Reset,
    /// `None` toggles
    Ai(Option<bool>),
    History,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            bail!("empty command");
        };
        let arg = words.next();
        if words.next().is_some() {
            bail!("too many arguments: {}", line.trim());
        }

        let command = match (head.to_ascii_lowercase().as_str(), arg) {
            ("promote", Some(kind)) => Command::Promote(
                PromotionKind::parse(kind).ok_or_else(|| anyhow!("unknown piece: {kind}"))?,
            ),
            ("promote", None) => bail!("usage: promote <q|r|b|n>"),
            ("cancel", None) => Command::Cancel,
            ("undo", None) => Command::Undo,
            ("reset", None) => Command::Reset,
            ("ai", None) => Command::Ai(None),
            ("ai", Some(flag)) => match flag.to_ascii_lowercase().as_str() {
                "on" => Command::Ai(Some(true)),
                "off" => Command::Ai(Some(false)),
                _ => bail!("usage: ai [on|off]"),
            },
            ("history", None) => Command::History,
            ("export", path) => Command::Export(path.map(PathBuf::from)),
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit", None) => Command::Quit,
            (_, None) => Command::Square(
                Square::from_algebraic(head).map_err(|_| anyhow!("unknown command: {head}"))?,
            ),
            (_, Some(_)) => bail!("unknown command: {}", line.trim()),
        };
        Ok(command)
    }
}

impl Command {
    /// Message for the engine worker; `None` for commands handled locally
    pub fn to_message(&self) -> Option<UiToEngine> {
        match self {
            Command::Square(square) => Some(UiToEngine::SquareClicked(square.to_render())),
            Command::Promote(kind) => Some(UiToEngine::PromotionChosen(*kind)),
            Command::Cancel => Some(UiToEngine::CancelPromotion),
            Command::Undo => Some(UiToEngine::Undo),
            Command::Reset => Some(UiToEngine::Reset),
            Command::Ai(Some(use_ai)) => Some(UiToEngine::SetUseAi(*use_ai)),
            Command::Ai(None) => Some(UiToEngine::ToggleAi),
            Command::History => Some(UiToEngine::ShowHistory),
            Command::Export(_) => Some(UiToEngine::ExportHistory),
            Command::Help | Command::Quit => None,
        }
    }
}

/// `moves-<YYYYmmdd-HHMMSS>.txt`
pub fn default_export_path(now: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("moves-{}.txt", now.format("%Y%m%d-%H%M%S")))
}
