// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background worker owning the engine and a single-threaded tokio runtime.
//!
//! Messages are handled strictly one at a time: a move submission runs to
//! completion before the next message is taken from the inbox, so clicks made
//! while the server is thinking queue up instead of racing the response.

use crate::engine::{EngineError, InteractionEngine};
use crate::msg::{EngineToUi, UiToEngine};
use crate::renderer::{ChannelRenderer, Renderer};
use chess_client_network::{
    ClientConfig, FileStore, HttpGateway, KeyValueStore, MemoryStore, ServerGateway,
};
use crossbeam_channel::{Receiver, Sender};
use std::thread;
use tokio::runtime::{Builder, Runtime};
use uuid::Uuid;

/// Spawn the background worker thread.
///
/// With `ephemeral` set nothing is written to disk and every start is a new
/// game.
pub fn spawn_worker(
    engine_rx: Receiver<UiToEngine>,
    ui_tx: Sender<EngineToUi>,
    config: ClientConfig,
    ephemeral: bool,
) -> anyhow::Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("chess-engine".to_string())
        .spawn(move || {
            if let Err(e) = run_worker(engine_rx, ui_tx, config, ephemeral) {
                tracing::error!("Worker thread error: {:#}", e);
            }
        })?;
    Ok(handle)
}

fn run_worker(
    engine_rx: Receiver<UiToEngine>,
    ui_tx: Sender<EngineToUi>,
    config: ClientConfig,
    ephemeral: bool,
) -> anyhow::Result<()> {
    let rt = Builder::new_current_thread().enable_all().build()?;
    let renderer = ChannelRenderer::new(ui_tx.clone());

    let gateway = match HttpGateway::from_config(&config) {
        Ok(gateway) => gateway,
        Err(e) => {
            let _ = ui_tx.send(EngineToUi::Fatal(e.to_string()));
            return Err(e.into());
        }
    };
    tracing::info!(server = gateway.base_url(), ephemeral, "Starting worker");

    if ephemeral {
        return drive(&rt, gateway, MemoryStore::new(), renderer, engine_rx, ui_tx, config.default_use_ai);
    }

    let store = config
        .resolved_state_dir()
        .and_then(|dir| FileStore::open(dir).map_err(anyhow::Error::from));
    match store {
        Ok(store) => drive(&rt, gateway, store, renderer, engine_rx, ui_tx, config.default_use_ai),
        Err(e) => {
            let _ = ui_tx.send(EngineToUi::Fatal(format!("{e:#}")));
            Err(e)
        }
    }
}

/// Start an engine and feed it messages until shutdown or until either
/// channel closes. [`EngineToUi::Settled`] follows startup and every handled
/// message.
pub fn drive<G, S, R>(
    rt: &Runtime,
    gateway: G,
    store: S,
    renderer: R,
    engine_rx: Receiver<UiToEngine>,
    ui_tx: Sender<EngineToUi>,
    default_use_ai: bool,
) -> anyhow::Result<()>
where
    G: ServerGateway,
    S: KeyValueStore,
    R: Renderer,
{
    let session_id = Uuid::new_v4();
    let span = tracing::info_span!("session", id = %session_id);
    let _enter = span.enter();

    let started = rt.block_on(InteractionEngine::start(gateway, store, renderer, default_use_ai));
    let mut engine = match started {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Could not start game: {}", e);
            let _ = ui_tx.send(EngineToUi::Fatal(e.to_string()));
            return Err(e.into());
        }
    };
    ui_tx.send(EngineToUi::Settled)?;

    for msg in engine_rx.iter() {
        tracing::debug!(?msg, "Handling message");
        if msg == UiToEngine::Shutdown {
            let _ = ui_tx.send(EngineToUi::ShutdownAck);
            break;
        }

        rt.block_on(dispatch(&mut engine, msg, &ui_tx));
        if ui_tx.send(EngineToUi::Settled).is_err() {
            break;
        }
    }

    tracing::info!("Worker stopped");
    Ok(())
}

async fn dispatch<G, S, R>(
    engine: &mut InteractionEngine<G, S, R>,
    msg: UiToEngine,
    ui_tx: &Sender<EngineToUi>,
) where
    G: ServerGateway,
    S: KeyValueStore,
    R: Renderer,
{
    let result = match msg {
        UiToEngine::SquareClicked(index) => {
            let outcome = engine.on_square_click(index).await;
            tracing::debug!(?outcome, "Click handled");
            Ok(())
        }
        UiToEngine::PromotionChosen(kind) => engine.choose_promotion(kind).await.map(|_| ()),
        UiToEngine::CancelPromotion => engine.cancel_promotion(),
        // The engine alerts on these itself
        UiToEngine::Undo => {
            let _ = engine.undo();
            Ok(())
        }
        UiToEngine::Reset => {
            let _ = engine.reset().await;
            Ok(())
        }
        UiToEngine::SetUseAi(use_ai) => {
            engine.set_use_ai(use_ai);
            Ok(())
        }
        UiToEngine::ToggleAi => {
            engine.toggle_ai();
            Ok(())
        }
        UiToEngine::ShowHistory => {
            engine.show_history();
            Ok(())
        }
        UiToEngine::ExportHistory => {
            let _ = ui_tx.send(EngineToUi::HistoryExport(engine.export_history()));
            Ok(())
        }
        UiToEngine::Shutdown => Ok(()),
    };

    if let Err(e @ EngineError::NoPromotionPending) = result {
        let _ = ui_tx.send(EngineToUi::Alert(e.to_string()));
    }
}
