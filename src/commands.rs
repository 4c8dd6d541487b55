//! CLI command implementations

use anyhow::Context;
use clap::{Args, ValueEnum};
use reftable_core::settings::parse_block_with;
use reftable_core::{
    generate, select_axis, to_display_model, to_html, to_markdown, DocumentRepository, LinkDirection,
    LinkGraph, SeenColumns, TableGenData, TableGenSettings, TableView,
};
use reftable_indexer::{load_config, scan_vault, ProjectConfig};
use reftable_server::{ReftableServer, ServerConfig};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
    Html,
}

/// Command line overrides of the configured table settings.
#[derive(Debug, Default, Args)]
pub struct TableOverrides {
    /// Path prefix of the column documents
    #[arg(short, long)]
    pub time: Option<String>,

    /// Path prefix of the row documents
    #[arg(short, long)]
    pub inquire: Option<String>,

    /// Which links to count: front, back or both
    #[arg(short, long)]
    pub links: Option<LinkDirection>,

    /// Hide the first-seen column
    #[arg(long)]
    pub no_first: bool,

    /// Hide the last-seen column
    #[arg(long)]
    pub no_last: bool,
}

impl TableOverrides {
    pub fn apply(self, mut settings: TableGenSettings) -> TableGenSettings {
        if let Some(time) = self.time {
            settings.time_axis_path = time;
        }
        if let Some(inquire) = self.inquire {
            settings.inquire_axis_path = inquire;
        }
        if let Some(links) = self.links {
            settings.collect_links = links;
        }
        if self.no_first {
            settings.include_first = false;
        }
        if self.no_last {
            settings.include_last = false;
        }
        settings
    }
}

#[derive(Serialize)]
struct TableOutput<'a> {
    settings: &'a TableGenSettings,
    data: &'a TableGenData,
    view: TableView,
}

pub fn table(
    root: &Path,
    config: Option<&Path>,
    overrides: TableOverrides,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let (project, graph) = load_vault(root, config)?;
    let settings = overrides.apply(project.table);

    let rendered = render(&graph, &settings, format)?;
    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Table written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

pub fn block(root: &Path, config: Option<&Path>, file: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let source = if file == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read configuration block from stdin")?;
        source
    } else {
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?
    };

    let (project, graph) = load_vault(root, config)?;
    // Warnings are logged by the parser
    let parsed = parse_block_with(&source, project.table);

    print!("{}", render(&graph, &parsed.settings, format)?);
    Ok(())
}

pub fn nodes(root: &Path, config: Option<&Path>, prefix: &str) -> anyhow::Result<()> {
    let (_, graph) = load_vault(root, config)?;
    for key in select_axis(&graph.node_keys(), prefix) {
        println!("{}", key);
    }
    Ok(())
}

pub async fn serve(
    root: &Path,
    config: Option<&Path>,
    host: String,
    port: u16,
    open: bool,
) -> anyhow::Result<()> {
    let (project, graph) = load_vault(root, config)?;
    tracing::info!("Starting reftable server on {}:{}", host, port);

    if open {
        let url = format!("http://{}:{}/", host, port);
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open browser at {}: {}", url, e);
        }
    }

    let server = ReftableServer::new(graph, project.table, ServerConfig { host, port });
    server.start().await
}

fn load_vault(root: &Path, config: Option<&Path>) -> anyhow::Result<(ProjectConfig, LinkGraph)> {
    let project = load_config(root, config)?;
    let graph = scan_vault(root, &project.vault)?;
    Ok((project, graph))
}

fn render(graph: &LinkGraph, settings: &TableGenSettings, format: OutputFormat) -> anyhow::Result<String> {
    let data = generate(graph, settings);
    let rendered = match format {
        OutputFormat::Markdown => to_markdown(&data, graph),
        OutputFormat::Html => to_html(&to_display_model(&data, SeenColumns::from(settings), graph)),
        OutputFormat::Json => {
            let view = to_display_model(&data, SeenColumns::from(settings), graph);
            let mut json = serde_json::to_string_pretty(&TableOutput {
                settings,
                data: &data,
                view,
            })?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}
