// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use leash::{install_from, status_from, uninstall_from};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  leash [options] <leash-command> [path]",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        match self.command {
            Command::Install(opts) => run_install(opts),
            Command::Uninstall(opts) => run_uninstall(opts),
            Command::Status(opts) => run_status(opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Install generated hooks into free hook slots.
    #[command(override_usage = "leash install [options] [path]")]
    Install(PathOptions),

    /// Remove generated hooks, keeping hand-written ones.
    #[command(override_usage = "leash uninstall [options] [path]")]
    Uninstall(PathOptions),

    /// Show state of each hook slot.
    #[command(override_usage = "leash status [options] [path]")]
    Status(PathOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct PathOptions {
    /// Path inside project, or to leash's installed package.
    #[arg(value_name = "path", default_value = ".")]
    pub path: PathBuf,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn run_install(opts: PathOptions) -> Result<()> {
    install_from(opts.path)?;
    Ok(())
}

fn run_uninstall(opts: PathOptions) -> Result<()> {
    uninstall_from(opts.path)?;
    Ok(())
}

fn run_status(opts: PathOptions) -> Result<()> {
    let Some(slots) = status_from(opts.path)? else {
        return Ok(());
    };

    for (slot, state) in slots {
        info!("{:<24} {state}", slot.name());
    }

    Ok(())
}
