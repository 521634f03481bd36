//! keyreplay: hotkey-triggered keystroke replayer
//!
//! A background process that:
//! - Listens for one global trigger hotkey (via rdev)
//! - Replays a configured keystroke/delay sequence into the active window
//! - Works around latched modifiers under Linux sticky keys
//!
//! The listener thread and the trigger loop share nothing but a single-slot
//! trigger signal; the keyboard controller belongs to the trigger loop.

mod backend;
mod cli;
mod config;
mod events;
mod hotkey;
mod lifecycle;
mod playback;
mod trigger;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::backend::EnigoBackend;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::events::PlaybackEvent;
use crate::hotkey::{HotkeyListener, TriggerCombo};
use crate::lifecycle::ShutdownSignal;
use crate::playback::{KeystrokeExecutor, Player};
use crate::trigger::{TriggerLoop, TriggerSignal};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Command::Go(args) => go(&args.keystrokes).await,
        Command::Check(args) => check(&args.keystrokes),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)
        .with_context(|| format!("failed to load keystrokes from {}", path.display()))?;
    info!(
        ?path,
        trigger = %config.trigger,
        directives = config.directives.len(),
        sticky_keys = config.sticky_keys.is_enabled(),
        pre_delay_ms = config.pre_delay.as_millis() as u64,
        "configuration loaded"
    );
    Ok(config)
}

async fn go(path: &Path) -> Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "keyreplay starting");

    let config = load_config(path)?;

    // Listener -> trigger loop
    let (signal, waiter) = TriggerSignal::new();
    // Trigger loop -> event log
    let (event_tx, mut event_rx) = broadcast::channel::<PlaybackEvent>(64);

    let listener = HotkeyListener::new(&config.trigger, signal.clone())
        .context("trigger hotkey cannot be monitored")?;

    let backend = EnigoBackend::new().context("failed to open the keyboard controller")?;
    let player = Player::new(KeystrokeExecutor::new(config.sticky_keys), config.pre_delay);
    let mut trigger_loop = TriggerLoop::new(
        signal,
        waiter,
        player,
        config.directives,
        backend,
        event_tx,
    );

    // Start the hotkey listener (runs on dedicated thread)
    let listener_failed = listener.start().context("failed to start hotkey listener")?;
    info!(trigger = %config.trigger, "hotkey listener started");

    let shutdown = ShutdownSignal::new();

    info!("ready, entering main loop");

    let mut outcome = Ok(());
    tokio::select! {
        _ = trigger_loop.run() => {
            info!("trigger loop exited");
        }

        _ = async {
            loop {
                match event_rx.recv().await {
                    Ok(event) => info!(%event, "playback event"),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "playback event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        } => {
            info!("playback event handler exited");
        }

        Ok(failure) = listener_failed => {
            error!(%failure, "hotkey listener stopped");
            outcome = Err(failure).context("trigger hotkey cannot be monitored");
        }

        result = shutdown.wait() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => error!(?e, "failed to listen for shutdown signals"),
            }
        }
    }

    info!("shutting down...");
    listener.stop();
    info!("keyreplay stopped");

    outcome
}

fn check(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    TriggerCombo::from_hotkey(&config.trigger).context("trigger hotkey cannot be monitored")?;

    println!("trigger:     {}", config.trigger);
    println!(
        "sticky keys: {}",
        if config.sticky_keys.is_enabled() { "on" } else { "off" }
    );
    println!("pre-delay:   {}s", config.pre_delay.as_secs_f64());
    println!("playback:");
    for (index, directive) in config.directives.iter().enumerate() {
        println!("  {:>3}. {}", index + 1, directive);
    }
    Ok(())
}
