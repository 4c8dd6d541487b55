//! reftable CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{OutputFormat, TableOverrides};

#[derive(Parser)]
#[command(name = "reftable")]
#[command(about = "Cross-reference tables for markdown vaults", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Vault root path (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to reftable.toml in the vault root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the vault and print a link table
    Table {
        #[command(flatten)]
        overrides: TableOverrides,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the table described by a configuration block ("-" reads stdin)
    Block {
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },
    /// List documents under a path prefix in axis order
    Nodes {
        /// Path prefix; empty selects every document
        #[arg(short, long, default_value = "")]
        prefix: String,
    },
    /// Start the table server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = reftable_server::DEFAULT_PORT)]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = reftable_server::DEFAULT_HOST)]
        host: String,

        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so tables can be piped
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "reftable={0},reftable_core={0},reftable_indexer={0},reftable_server={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Vault root: {}", cli.root.display());

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Table {
            overrides,
            format,
            output,
        } => commands::table(&cli.root, config, overrides, format, output.as_deref()),
        Commands::Block { file, format } => commands::block(&cli.root, config, &file, format),
        Commands::Nodes { prefix } => commands::nodes(&cli.root, config, &prefix),
        Commands::Serve { port, host, open } => {
            commands::serve(&cli.root, config, host, port, open).await
        }
        Commands::Version => {
            println!("reftable v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
