//! Canvas (JSON Canvas) link extraction

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::extractor::LinkExtractor;
use crate::markdown::extract_body_links;

#[derive(Debug, Deserialize)]
struct Canvas {
    #[serde(default)]
    nodes: Vec<CanvasNode>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum CanvasNode {
    /// Embedded vault file, referenced by its vault path.
    File { file: String },
    /// Markdown card.
    Text { text: String },
    #[serde(other)]
    Other,
}

/// File cards count as references to the embedded file; text cards are
/// scanned like markdown.
pub struct CanvasExtractor;

impl LinkExtractor for CanvasExtractor {
    fn extract(&self, path: &Path, content: &str) -> Result<Vec<String>> {
        let canvas: Canvas = serde_json::from_str(content)
            .with_context(|| format!("Invalid canvas file {}", path.display()))?;

        let mut links = Vec::new();
        for node in canvas.nodes {
            match node {
                CanvasNode::File { file } => links.push(file),
                CanvasNode::Text { text } => links.extend(extract_body_links(&text)),
                CanvasNode::Other => {}
            }
        }
        Ok(links)
    }
}
