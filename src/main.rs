mod cli;
mod application;
mod domain;
mod data;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use infra::secrets::Secrets;
use tracing_subscriber::{filter::Directive, EnvFilter};

fn main() -> Result<()> {
    let directive: Directive = "finetune_prep=info".parse()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    // Resolved once here; everything below receives them by reference
    let secrets    = Secrets::from_env();
    let started_at = chrono::Local::now().naive_local();
    tracing::debug!("Secrets: {:?}", secrets);

    let cli = Cli::parse();
    cli.run(&secrets, started_at)
}
