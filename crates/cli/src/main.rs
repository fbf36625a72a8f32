// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use rlrs::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    let default_level = match cli.command {
        Command::Watch => "info",
        _ => "warn",
    };
    setup_logging(default_level);

    if let Err(e) = rlrs::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RELAIS_LOG` (falls back to `default_level`).
fn setup_logging(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = rlrs::env::log_filter()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
