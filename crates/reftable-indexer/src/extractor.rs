//! Link extractor trait definition

use std::path::Path;

use crate::canvas::CanvasExtractor;
use crate::markdown::MarkdownExtractor;

/// Pulls raw link targets out of a document. Targets are returned in
/// document order, one entry per occurrence, with heading and block
/// suffixes already removed.
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, path: &Path, content: &str) -> anyhow::Result<Vec<String>>;
}

/// Get the extractor for a document based on its extension.
pub fn get_extractor(path: &Path) -> Option<Box<dyn LinkExtractor>> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();

    match ext.as_str() {
        "md" | "markdown" => Some(Box::new(MarkdownExtractor)),
        "canvas" => Some(Box::new(CanvasExtractor)),
        _ => None,
    }
}
