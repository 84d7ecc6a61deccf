//! CLI commands.

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// kubelift CLI - Bootstrap and inspect cluster configuration.
#[derive(Debug, Parser)]
#[command(name = "kubelift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Work with cluster configuration documents.
    Config(config::ConfigCommand),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Config(cmd) => cmd.run(),
        }
    }
}
