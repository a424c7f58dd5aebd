// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! heph - wait for Kubernetes resources to become ready

mod commands;
mod completions;
mod error;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::wait;
use completions::CompletionsArgs;

#[derive(Parser)]
#[command(
    name = "heph",
    version,
    about = "Heph - wait for Kubernetes resources to become ready"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Block until resources reach a condition or phase
    Wait(wait::WaitArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Wait(args) => {
            setup_logging(cli.verbose);
            wait::handle(args).await?;
            println!("All resources ready");
        }
        Commands::Completions(args) => {
            completions::generate_completions::<Cli>(args.shell);
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
