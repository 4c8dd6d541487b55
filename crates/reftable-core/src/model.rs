//! Core data structures for reference tables

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Vault-relative path of a document, `/`-separated, extension included.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct NodeKey(pub String);

impl NodeKey {
    pub fn new(path: impl Into<String>) -> Self {
        NodeKey(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Basename without extension, the short label used in tables.
    pub fn basename(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        match name.rfind('.') {
            Some(dot) if dot > 0 => &name[..dot],
            _ => name,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        NodeKey(s.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        NodeKey(s)
    }
}

/// Target document → reference count.
pub type CountMap = BTreeMap<NodeKey, u32>;

/// Source document → target document → reference count.
pub type LinkMap = BTreeMap<NodeKey, CountMap>;

/// Inquiry document → time document → merged count.
pub type FinalLinks = BTreeMap<NodeKey, CountMap>;

/// Which references are counted between the two axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkDirection {
    /// Time documents referencing inquiry documents.
    #[default]
    Front,
    /// Inquiry documents referencing time documents.
    Back,
    /// Both, summed per pair.
    Both,
}

impl LinkDirection {
    pub fn wants_front(self) -> bool {
        self != LinkDirection::Back
    }

    pub fn wants_back(self) -> bool {
        self != LinkDirection::Front
    }
}

impl fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkDirection::Front => "front",
            LinkDirection::Back => "back",
            LinkDirection::Both => "both",
        };
        f.write_str(s)
    }
}

impl FromStr for LinkDirection {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(LinkDirection::Front),
            "back" => Ok(LinkDirection::Back),
            "both" => Ok(LinkDirection::Both),
            _ => Err(TableError::InvalidDirection(s.to_string())),
        }
    }
}

/// Parameters of one table generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableGenSettings {
    /// Path prefix selecting the columns.
    pub time_axis_path: String,
    /// Path prefix selecting the rows.
    pub inquire_axis_path: String,
    pub collect_links: LinkDirection,
    pub include_first: bool,
    pub include_last: bool,
}

impl Default for TableGenSettings {
    fn default() -> Self {
        TableGenSettings {
            time_axis_path: String::new(),
            inquire_axis_path: String::new(),
            collect_links: LinkDirection::Front,
            include_first: true,
            include_last: true,
        }
    }
}

/// Axis-order-earliest and latest time document linked with an inquiry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeenBounds {
    pub first: Option<NodeKey>,
    pub last: Option<NodeKey>,
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDataPerInquiry {
    pub inquiry: NodeKey,
    /// Counts keyed by time document; only time-axis keys appear.
    pub counts: CountMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<NodeKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<NodeKey>,
}

impl TableDataPerInquiry {
    /// Count for a time document, if any references were recorded.
    pub fn count(&self, time: &NodeKey) -> Option<u32> {
        self.counts.get(time).copied().filter(|&c| c > 0)
    }
}

/// Full result of a generation pass: columns and rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TableGenData {
    pub time_nodes: Vec<NodeKey>,
    pub rows: Vec<TableDataPerInquiry>,
}
