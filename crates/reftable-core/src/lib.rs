//! Reftable Core — link graph snapshot, axis selection, link aggregation and table rendering

pub mod model;
pub mod error;
pub mod graph;
pub mod axis;
pub mod aggregation;
pub mod settings;
pub mod render;


#[cfg(test)]
pub mod test_utils;

pub use model::{NodeKey, CountMap, LinkMap, FinalLinks, LinkDirection, SeenBounds, TableDataPerInquiry, TableGenData, TableGenSettings};
pub use error::TableError;
pub use graph::{Document, DocumentRepository, LinkGraph};
pub use axis::{normalize_path, natural_cmp, select_axis};
pub use aggregation::{aggregate, generate, merge_links, LinkAggregate};
pub use settings::{parse_block, ParsedSettings, SettingsWarning};
pub use render::{to_markdown, to_display_model, to_html, Cell, LabelResolver, SeenColumns, TableView};
