//! Link graph wrapper using petgraph::StableDiGraph keyed by document path

use crate::error::{Result, TableError};
use crate::model::{LinkMap, NodeKey};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// A document in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub key: NodeKey,
    /// Basename without extension.
    pub label: String,
}

impl Document {
    pub fn new(key: NodeKey) -> Self {
        let label = key.basename().to_string();
        Document { key, label }
    }
}

/// Read-only view of a document repository consumed by table generation.
pub trait DocumentRepository {
    /// Every document key known to the repository.
    fn node_keys(&self) -> Vec<NodeKey>;

    /// Snapshot of source → target → reference count.
    fn adjacency(&self) -> LinkMap;

    /// Short display label for a document, if it resolves.
    fn display_label(&self, key: &NodeKey) -> Option<String>;
}

/// The reference graph: one node per document, one weighted edge per
/// (source, target) pair holding the number of references.
pub struct LinkGraph {
    inner: StableDiGraph<Document, u32>,
    index: HashMap<NodeKey, NodeIndex>,
}

impl std::fmt::Debug for LinkGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkGraph")
            .field("document_count", &self.inner.node_count())
            .field("link_count", &self.inner.edge_count())
            .finish()
    }
}

impl LinkGraph {
    pub fn new() -> Self {
        LinkGraph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Build a graph from a literal adjacency map. Targets become documents too.
    pub fn from_link_map(links: &LinkMap) -> Self {
        let mut graph = LinkGraph::new();
        for (source, targets) in links {
            graph.add_document(source.clone());
            for (target, &weight) in targets {
                graph.set_weight(source, target, weight);
            }
        }
        graph
    }

    /// Add a document, returning the existing index if already present.
    pub fn add_document(&mut self, key: NodeKey) -> NodeIndex {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.inner.add_node(Document::new(key.clone()));
        self.index.insert(key, idx);
        idx
    }

    /// Record one more reference from `source` to `target`.
    pub fn add_reference(&mut self, source: &NodeKey, target: &NodeKey) -> u32 {
        let from = self.add_document(source.clone());
        let to = self.add_document(target.clone());
        match self.inner.find_edge(from, to) {
            Some(edge) => {
                let weight = &mut self.inner[edge];
                *weight = weight.saturating_add(1);
                *weight
            }
            None => {
                self.inner.add_edge(from, to, 1);
                1
            }
        }
    }

    /// Overwrite the reference count between two documents.
    /// A weight of 0 removes the edge.
    pub fn set_weight(&mut self, source: &NodeKey, target: &NodeKey, weight: u32) {
        let from = self.add_document(source.clone());
        let to = self.add_document(target.clone());
        let existing = self.inner.find_edge(from, to);
        match (existing, weight) {
            (Some(edge), 0) => {
                self.inner.remove_edge(edge);
            }
            (Some(edge), w) => self.inner[edge] = w,
            (None, 0) => {}
            (None, w) => {
                self.inner.add_edge(from, to, w);
            }
        }
    }

    /// Look up a document; a stale key is an error here and only here.
    pub fn document(&self, key: &NodeKey) -> Result<&Document> {
        self.index
            .get(key)
            .and_then(|&idx| self.inner.node_weight(idx))
            .ok_or_else(|| TableError::UnresolvedNode(key.clone()))
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Reference count from `source` to `target` (0 when absent).
    pub fn weight(&self, source: &NodeKey, target: &NodeKey) -> u32 {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&from), Some(&to)) => self
                .inner
                .find_edge(from, to)
                .map_or(0, |edge| self.inner[edge]),
            _ => 0,
        }
    }

    /// Outgoing references of a document.
    pub fn links_from(&self, source: &NodeKey) -> impl Iterator<Item = (&NodeKey, u32)> {
        self.index
            .get(source)
            .into_iter()
            .flat_map(move |&idx| self.inner.edges_directed(idx, Direction::Outgoing))
            .map(move |edge| (&self.inner[edge.target()].key, *edge.weight()))
    }

    /// Documents referencing `target`.
    pub fn links_to(&self, target: &NodeKey) -> impl Iterator<Item = (&NodeKey, u32)> {
        self.index
            .get(target)
            .into_iter()
            .flat_map(move |&idx| self.inner.edges_directed(idx, Direction::Incoming))
            .map(move |edge| (&self.inner[edge.source()].key, *edge.weight()))
    }

    /// Iterate over all documents.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    pub fn document_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of distinct (source, target) pairs.
    pub fn link_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Sum of all reference counts.
    pub fn reference_count(&self) -> u64 {
        self.inner
            .edge_indices()
            .filter_map(|edge| self.inner.edge_weight(edge))
            .map(|&w| u64::from(w))
            .sum()
    }
}

impl Default for LinkGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRepository for LinkGraph {
    fn node_keys(&self) -> Vec<NodeKey> {
        self.documents().map(|doc| doc.key.clone()).collect()
    }

    fn adjacency(&self) -> LinkMap {
        self.documents()
            .map(|doc| {
                let targets = self
                    .links_from(&doc.key)
                    .map(|(target, weight)| (target.clone(), weight))
                    .collect();
                (doc.key.clone(), targets)
            })
            .collect()
    }

    fn display_label(&self, key: &NodeKey) -> Option<String> {
        self.document(key).ok().map(|doc| doc.label.clone())
    }
}

impl DocumentRepository for LinkMap {
    fn node_keys(&self) -> Vec<NodeKey> {
        let mut keys: BTreeSet<&NodeKey> = self.keys().collect();
        keys.extend(self.values().flat_map(|targets| targets.keys()));
        keys.into_iter().cloned().collect()
    }

    fn adjacency(&self) -> LinkMap {
        self.clone()
    }

    fn display_label(&self, key: &NodeKey) -> Option<String> {
        let known = self.contains_key(key) || self.values().any(|targets| targets.contains_key(key));
        known.then(|| key.basename().to_string())
    }
}
