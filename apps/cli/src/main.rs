//! tutorial-llms CLI: turn a tutorial content tree into `llms.txt` files.
//!
//! Renders every tutorial, an index and a combined dump for language-model
//! ingestion, either once (`generate`) or on every content change (`watch`).

mod commands;
mod watch;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
