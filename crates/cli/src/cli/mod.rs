// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use rl_core::{Action, EntityType};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Which entries `list` shows.
#[derive(Args, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[group(multiple = false)]
pub struct ListFilter {
    /// Only unsynced entries (including failed ones)
    #[arg(long)]
    pub pending: bool,

    /// Only entries whose last attempt failed
    #[arg(long)]
    pub failed: bool,

    /// Only synced entries kept for audit
    #[arg(long)]
    pub synced: bool,
}

fn parse_entity(s: &str) -> Result<EntityType, String> {
    s.parse::<EntityType>().map_err(|e| e.to_string())
}

fn parse_action(s: &str) -> Result<Action, String> {
    s.parse::<Action>().map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "relais")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline mutation queue for field data collection")]
#[command(
    long_about = "Offline mutation queue for field data collection.\n\n\
    Record creates, updates and deletes while disconnected, then replay them \
    against the remote system of record once it can be reached."
)]
#[command(after_help = "\
Quickstart:
  relais init --remote https://api.example.org/api/v1
  relais enqueue producteur create --data '{\"nom_complet\":\"KOUASSI JEAN\"}'
  relais status
  relais sync")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize the queue in a project directory
    #[command(after_help = "\
Examples:
  relais init --remote https://api.example.org/api/v1
  relais init --remote http://localhost:8080 --store-dir data/queue")]
    Init {
        /// Base URL of the remote CRUD API
        #[arg(long, value_name = "url")]
        remote: String,

        /// Where to keep the pending log (relative to the project root or absolute)
        #[arg(long, value_name = "dir")]
        store_dir: Option<String>,

        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Queue a create, update or delete
    #[command(after_help = "\
Examples:
  relais enqueue producteur create --data '{\"nom_complet\":\"KOUASSI JEAN\"}'
  relais enqueue parcelle update --target p-123 --data '{\"superficie\":2.5}'
  relais enqueue parcelle update --target local-3f2a9c01b4de --data '{\"culture\":\"cacao\"}'
  relais enqueue village delete --target v-42

Entity types: operation, producteur, parcelle, agent, organisation, section, village")]
    Enqueue {
        /// Entity type
        #[arg(value_parser = parse_entity)]
        entity: EntityType,

        /// Action: create, update or delete
        #[arg(value_parser = parse_action)]
        action: Action,

        /// Record to update or delete (remote id, or local id of a queued create)
        #[arg(long, short = 't', value_name = "id")]
        target: Option<String>,

        /// Record fields as a JSON object
        #[arg(long, short = 'd', value_name = "json")]
        data: Option<String>,

        /// Output format
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List queued operations
    List {
        #[command(flatten)]
        filter: ListFilter,

        /// Output format
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show pending and failed counts and the last sync time
    Status {
        /// Also check whether the remote can be reached
        #[arg(long)]
        probe: bool,

        /// Output format
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Send every pending operation to the remote now
    Sync {
        /// Output format
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Remove operations that have been synced
    Clean,

    /// Remove every queued operation, synced or not
    Clear {
        /// Confirm the reset
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Remove one queued operation
    Delete {
        /// Local id of the operation
        id: String,
    },

    /// Write a snapshot of the queue as JSON
    Export {
        /// Output file path (defaults to stdout)
        path: Option<String>,
    },

    /// Watch connectivity and sync whenever the remote comes back
    Watch,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
