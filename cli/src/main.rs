// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chess client - terminal front-end
//!
//! Reads commands from stdin, forwards them to the engine worker and prints
//! the board after every handled command.

// Initialize logging at the start of the program
use anyhow::{anyhow, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, Naming};
use std::path::PathBuf;

fn init_logging() -> Result<()> {
    let log_dir = match std::env::consts::OS {
        "macos" => {
            let mut path = PathBuf::from(std::env::var("HOME")?);
            path.push("Library");
            path.push("Logs");
            path.push("chess-client");
            path
        }
        _ => PathBuf::from("logs"),
    };

    std::fs::create_dir_all(&log_dir)?;

    Logger::try_with_env_or_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename("chess-client")
                .suffix("log"),
        )
        .rotate(
            Criterion::Size(10 * 1024 * 1024),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()?;

    Ok(())
}

static LOGGER_INIT: std::sync::Once = std::sync::Once::new();

fn ensure_logging_initialized() -> Result<()> {
    let mut result = Ok(());
    LOGGER_INIT.call_once(|| {
        if let Err(e) = init_logging() {
            result = Err(e);
        }
    });
    result
}

use chess_client_cli::{default_export_path, BoardView, Command, HELP};
use chess_client_network::config::{load_config, load_config_from};
use chess_client_network::ClientConfig;
use chess_client_ui::{spawn_worker, EngineToUi, UiToEngine};
use clap::Parser;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io::{BufRead, Write};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(name = "chess-client", about = "Play chess against a rules server", version)]
struct Args {
    /// Base URL of the rules server
    #[clap(long)]
    server: Option<String>,

    /// Config file to use instead of the per-user one
    #[clap(long)]
    config: Option<PathBuf>,

    /// Directory for the saved session
    #[clap(long)]
    state_dir: Option<PathBuf>,

    /// Keep nothing on disk; every start is a new game
    #[clap(long)]
    ephemeral: bool,

    /// Play against the server's AI by default
    #[clap(long)]
    ai: bool,

    /// Enable debug logging to stderr
    #[clap(long)]
    debug: bool,
}

fn main() -> Result<()> {
    if let Err(e) = ensure_logging_initialized() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let args = Args::parse();

    if args.debug {
        // Takes over from the log file for the rest of the run
        if let Err(e) = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .try_init()
        {
            eprintln!("Warning: Failed to enable debug output: {}", e);
        }
    }

    let config = resolve_config(&args)?;
    tracing::info!(server = %config.server_url, "Starting chess client");

    let (engine_tx, engine_rx) = unbounded();
    let (ui_tx, ui_rx) = unbounded();
    let worker = spawn_worker(engine_rx, ui_tx, config, args.ephemeral)?;

    let mut view = BoardView::new();
    let result = run_command_loop(&engine_tx, &ui_rx, &mut view);

    // The worker may already be gone after a fatal error
    if engine_tx.send(UiToEngine::Shutdown).is_ok() {
        while let Ok(msg) = ui_rx.recv() {
            if msg == EngineToUi::ShutdownAck {
                break;
            }
        }
    }
    if worker.join().is_err() {
        tracing::error!("Worker thread panicked");
    }

    result
}

fn resolve_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {:#}", e);
            ClientConfig::default()
        }),
    };

    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if let Some(dir) = &args.state_dir {
        config.state_dir = Some(dir.clone());
    }
    if args.ai {
        config.default_use_ai = true;
    }
    Ok(config)
}

fn run_command_loop(
    engine_tx: &Sender<UiToEngine>,
    ui_rx: &Receiver<EngineToUi>,
    view: &mut BoardView,
) -> Result<()> {
    wait_until_settled(ui_rx, view, None)?;
    println!("{}", view.render());
    println!("Type 'help' for commands.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        tracing::debug!(?command, "Command entered");

        match &command {
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
            _ => {}
        }

        let export_to = match &command {
            Command::Export(path) => Some(
                path.clone()
                    .unwrap_or_else(|| default_export_path(chrono::Local::now().naive_local())),
            ),
            _ => None,
        };

        if let Some(msg) = command.to_message() {
            engine_tx
                .send(msg)
                .map_err(|_| anyhow!("Engine worker stopped"))?;
            wait_until_settled(ui_rx, view, export_to)?;
            if changes_board(&command) {
                println!("{}", view.render());
            }
        }
    }

    Ok(())
}

fn changes_board(command: &Command) -> bool {
    matches!(
        command,
        Command::Square(_) | Command::Promote(_) | Command::Cancel | Command::Undo | Command::Reset
    )
}

/// Print what the engine reports until it has finished the current message
fn wait_until_settled(
    ui_rx: &Receiver<EngineToUi>,
    view: &mut BoardView,
    export_to: Option<PathBuf>,
) -> Result<()> {
    loop {
        let msg = ui_rx.recv().map_err(|_| anyhow!("Engine worker stopped"))?;
        match msg {
            EngineToUi::Settled => return Ok(()),
            EngineToUi::Fatal(reason) => return Err(anyhow!("Could not start game: {reason}")),
            EngineToUi::HistoryExport(text) => match &export_to {
                Some(path) => match std::fs::write(path, text) {
                    Ok(()) => println!("Moves written to {}", path.display()),
                    Err(e) => {
                        tracing::error!("Export to {} failed: {}", path.display(), e);
                        println!("! could not write {}: {e}", path.display());
                    }
                },
                None => print!("{text}"),
            },
            other => {
                if let Some(line) = view.apply(other) {
                    println!("{line}");
                }
            }
        }
    }
}
