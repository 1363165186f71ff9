//! BlockBuilder CLI: rebuild product descriptions as typed blocks.
//!
//! Reads exported or third-party HTML descriptions and prints the
//! reconstructed block list as JSON, or renders a block list back to HTML.

mod commands;

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
