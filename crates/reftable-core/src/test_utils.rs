//! Test utilities for reftable-core

use crate::graph::LinkGraph;
use crate::model::{LinkMap, NodeKey};

/// Build an adjacency map from `(source, target, weight)` triples.
pub fn link_map(edges: &[(&str, &str, u32)]) -> LinkMap {
    let mut map = LinkMap::new();
    for (source, target, weight) in edges {
        map.entry(NodeKey::from(*source))
            .or_default()
            .insert(NodeKey::from(*target), *weight);
    }
    map
}

pub fn keys(paths: &[&str]) -> Vec<NodeKey> {
    paths.iter().map(|p| NodeKey::from(*p)).collect()
}

/// The two-axis example: `T1` references `I1` twice, `I1` references `T2` once.
pub fn scenario_links() -> LinkMap {
    link_map(&[("T1", "I1", 2), ("I1", "T2", 1)])
}

/// A small journal vault: daily notes referencing people and projects.
pub fn journal_graph() -> LinkGraph {
    let mut graph = LinkGraph::new();
    for doc in [
        "Journal/2024-01-2.md",
        "Journal/2024-01-10.md",
        "Journal/2024-01-1.md",
        "People/Ada.md",
        "People/Grace.md",
        "People/Linus.md",
        "Projects/Compiler.md",
    ] {
        graph.add_document(NodeKey::from(doc));
    }

    let reference = |graph: &mut LinkGraph, source: &str, target: &str, times: u32| {
        for _ in 0..times {
            graph.add_reference(&NodeKey::from(source), &NodeKey::from(target));
        }
    };
    reference(&mut graph, "Journal/2024-01-1.md", "People/Ada.md", 2);
    reference(&mut graph, "Journal/2024-01-10.md", "People/Ada.md", 1);
    reference(&mut graph, "Journal/2024-01-2.md", "People/Grace.md", 1);
    reference(&mut graph, "People/Grace.md", "Journal/2024-01-10.md", 3);
    reference(&mut graph, "People/Ada.md", "Projects/Compiler.md", 1);
    reference(&mut graph, "Projects/Compiler.md", "Journal/2024-01-1.md", 1);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_graph_shape() {
        let graph = journal_graph();
        assert_eq!(graph.document_count(), 7);
        assert_eq!(graph.link_count(), 6);
        assert_eq!(graph.reference_count(), 9);
    }
}
