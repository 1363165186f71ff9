//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use blockbuilder_reconstruct::Reconstructor;
use blockbuilder_render::render_html;
use blockbuilder_shared::{AppConfig, Block, ReconstructConfig, init_config, load_config, load_config_from};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Input name that reads from standard input.
const STDIN: &str = "-";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// BlockBuilder: rebuild product descriptions as editable blocks.
#[derive(Parser)]
#[command(
    name = "blockbuilder",
    version,
    about = "Reconstruct HTML product descriptions into typed blocks and render them back.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file to use instead of ~/.blockbuilder/blockbuilder.toml.
    #[arg(long, global = true, env = "BLOCKBUILDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Reconstruct HTML files into block lists and print them as JSON.
    Reconstruct {
        /// HTML files to read, or `-` for standard input.
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<String>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,

        /// Print one line per block instead of JSON.
        #[arg(long, conflicts_with = "pretty")]
        summary: bool,
    },

    /// Render a JSON block list to description HTML.
    Render {
        /// Block list JSON file, or `-` for standard input.
        input: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays
/// clean for JSON and HTML output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "blockbuilder=info",
        1 => "blockbuilder=debug",
        _ => "blockbuilder=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Reconstruct {
            inputs,
            pretty,
            summary,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_reconstruct(&config, &inputs, pretty, summary).await
        }
        Command::Render { input } => cmd_render(&input).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()).await,
        },
    }
}

/// Config from `--config` when given, else the user config file or defaults.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_reconstruct(config: &AppConfig, inputs: &[String], pretty: bool, summary: bool) -> Result<()> {
    if inputs.iter().filter(|i| i.as_str() == STDIN).count() > 1 {
        return Err(eyre!("standard input ('-') can only be read once"));
    }

    let reconstructor = Arc::new(Reconstructor::new(ReconstructConfig::from(config)));
    let progress = (inputs.len() > 1).then(|| progress_bar(inputs.len())).transpose()?;

    let mut tasks = Vec::with_capacity(inputs.len());
    for input in inputs {
        let html = read_input(input).await?;
        let reconstructor = Arc::clone(&reconstructor);
        let task = tokio::task::spawn_blocking(move || reconstructor.reconstruct(&html));
        tasks.push((input.as_str(), task));
    }

    let mut results = Vec::with_capacity(tasks.len());
    for (input, task) in tasks {
        let blocks = task
            .await
            .wrap_err_with(|| format!("reconstruction of {input} did not complete"))?;
        debug!(input, blocks = blocks.len(), "reconstructed");
        if let Some(bar) = &progress {
            bar.set_message(input.to_string());
            bar.inc(1);
        }
        results.push((input, blocks));
    }
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let total: usize = results.iter().map(|(_, blocks)| blocks.len()).sum();
    info!(files = results.len(), blocks = total, "reconstruction finished");

    if summary {
        let multiple = results.len() > 1;
        for (input, blocks) in &results {
            if multiple {
                println!("{input}");
            }
            for line in summary_lines(blocks) {
                println!("{line}");
            }
        }
        return Ok(());
    }

    let output = match results.as_slice() {
        [(_, blocks)] => serde_json::to_value(blocks)?,
        _ => {
            let mut by_path = serde_json::Map::new();
            for (input, blocks) in &results {
                by_path.insert(input.to_string(), serde_json::to_value(blocks)?);
            }
            serde_json::Value::Object(by_path)
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

async fn cmd_render(input: &str) -> Result<()> {
    let json = read_input(input).await?;
    let blocks: Vec<Block> =
        serde_json::from_str(&json).wrap_err_with(|| format!("{input} is not a block list"))?;
    for block in &blocks {
        block.validate()?;
    }
    info!(blocks = blocks.len(), "rendering");
    print!("{}", render_html(&blocks));
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a whole file, or standard input for `-`.
async fn read_input(input: &str) -> Result<String> {
    if input == STDIN {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .wrap_err("failed to read standard input")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(input)
        .await
        .wrap_err_with(|| format!("failed to read {input}"))
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")?.progress_chars("=> "),
    );
    Ok(bar)
}

/// `index  type  title` per block, aligned.
fn summary_lines(blocks: &[Block]) -> Vec<String> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| format!("{:>3}  {:<15} {}", i + 1, block.block_type().to_string(), block.title))
        .collect()
}
