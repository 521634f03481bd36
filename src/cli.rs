//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_PATH;

/// Replay a configured keystroke sequence whenever a global hotkey is pressed
#[derive(Debug, Parser)]
#[command(name = "keyreplay", version, about)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Listen for the trigger hotkey and replay keystrokes until interrupted
    Go(KeystrokeArgs),
    /// Validate the keystroke file and print the playback plan
    Check(KeystrokeArgs),
}

#[derive(Debug, Args)]
pub struct KeystrokeArgs {
    /// File from which to import keystrokes
    #[arg(long, default_value = DEFAULT_PATH)]
    pub keystrokes: PathBuf,
}
