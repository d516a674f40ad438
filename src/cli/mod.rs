//! CLI module for the chat chain service
//!
//! Subcommands:
//! - `serve`: compile the chain and serve HTTP until a shutdown signal (default)
//! - `check`: compile the chain from configuration and exit

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

/// Chat Chain Service - HTTP chat facade over a compiled prompt/model chain
#[derive(Parser)]
#[command(name = "chat-chain-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the chat API (default)
    Serve,

    /// Validate configuration by compiling the chain, then exit
    Check,
}
