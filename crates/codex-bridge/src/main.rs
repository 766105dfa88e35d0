mod bootstrap_helpers;
mod bridge_entry;

use anyhow::Result;
use clap::Parser;
use codex_bridge_cli::Cli;

use crate::bootstrap_helpers::init_tracing;
use crate::bridge_entry::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_cli(cli).await
}
