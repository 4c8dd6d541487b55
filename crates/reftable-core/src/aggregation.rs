//! Link aggregation between the time axis and the inquiry axis

use crate::axis::select_axis;
use crate::graph::DocumentRepository;
use crate::model::{
    CountMap, FinalLinks, LinkDirection, LinkMap, NodeKey, SeenBounds, TableDataPerInquiry,
    TableGenData, TableGenSettings,
};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Merged count matrix plus per-inquiry first/last bounds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkAggregate {
    pub links: FinalLinks,
    pub seen: BTreeMap<NodeKey, SeenBounds>,
}

/// References from time documents to inquiry documents, indexed by the
/// inquiry document first. Every inquiry document gets a row.
pub fn front_links(adjacency: &LinkMap, time_axis: &[NodeKey], inquire_axis: &[NodeKey]) -> FinalLinks {
    let mut links = FinalLinks::new();
    for inquiry in inquire_axis {
        let row: CountMap = time_axis
            .iter()
            .filter_map(|time| {
                let weight = adjacency.get(time)?.get(inquiry).copied()?;
                (weight > 0).then(|| (time.clone(), weight))
            })
            .collect();
        links.insert(inquiry.clone(), row);
    }
    links
}

/// References from inquiry documents to time documents. Only inquiry
/// documents present in the adjacency appear as rows.
pub fn back_links(adjacency: &LinkMap, time_axis: &[NodeKey], inquire_axis: &[NodeKey]) -> FinalLinks {
    let time_set: HashSet<&NodeKey> = time_axis.iter().collect();
    inquire_axis
        .iter()
        .filter_map(|inquiry| {
            let targets = adjacency.get(inquiry)?;
            let row: CountMap = targets
                .iter()
                .filter(|&(target, &weight)| weight > 0 && time_set.contains(target))
                .map(|(target, &weight)| (target.clone(), weight))
                .collect();
            Some((inquiry.clone(), row))
        })
        .collect()
}

/// Sum two count matrices pair by pair. A pair present on one side only
/// keeps its value.
pub fn merge_links(left: &FinalLinks, right: &FinalLinks) -> FinalLinks {
    let mut merged = left.clone();
    for (inquiry, row) in right {
        let target = merged.entry(inquiry.clone()).or_default();
        for (time, &count) in row {
            let cell = target.entry(time.clone()).or_insert(0);
            *cell = cell.saturating_add(count);
        }
    }
    merged
}

/// First and last time documents, in axis order, with a nonzero count in `row`.
pub fn seen_bounds(row: &CountMap, time_axis: &[NodeKey]) -> SeenBounds {
    let mut present = time_axis
        .iter()
        .filter(|time| row.get(*time).is_some_and(|&count| count > 0));
    let first = present.next().cloned();
    let last = present.last().cloned().or_else(|| first.clone());
    SeenBounds { first, last }
}

/// Count references between the axes in the requested direction(s).
pub fn aggregate(
    adjacency: &LinkMap,
    time_axis: &[NodeKey],
    inquire_axis: &[NodeKey],
    direction: LinkDirection,
) -> LinkAggregate {
    let mut links = FinalLinks::new();

    if direction.wants_front() {
        let forward = front_links(adjacency, time_axis, inquire_axis);
        links = merge_links(&links, &forward);
    }

    if direction.wants_back() {
        let backward = back_links(adjacency, time_axis, inquire_axis);
        debug!("Back links from {} inquiry documents", backward.len());
        links = merge_links(&links, &backward);
    }

    let seen = links
        .iter()
        .map(|(inquiry, row)| (inquiry.clone(), seen_bounds(row, time_axis)))
        .collect();

    LinkAggregate { links, seen }
}

/// Build the table for `settings` from a repository snapshot.
pub fn generate<R>(repo: &R, settings: &TableGenSettings) -> TableGenData
where
    R: DocumentRepository + ?Sized,
{
    let keys = repo.node_keys();
    let time_nodes = select_axis(&keys, &settings.time_axis_path);
    let inquire_nodes = select_axis(&keys, &settings.inquire_axis_path);
    debug!(
        "Selected {} time documents under {:?} and {} inquiry documents under {:?}",
        time_nodes.len(),
        settings.time_axis_path,
        inquire_nodes.len(),
        settings.inquire_axis_path
    );

    let adjacency = repo.adjacency();
    let LinkAggregate { mut links, seen } =
        aggregate(&adjacency, &time_nodes, &inquire_nodes, settings.collect_links);
    debug!("Final links: {:?}", links);

    let rows = inquire_nodes
        .iter()
        .map(|inquiry| {
            let counts = links.remove(inquiry).unwrap_or_default();
            let bounds = seen.get(inquiry).cloned().unwrap_or_default();
            TableDataPerInquiry {
                inquiry: inquiry.clone(),
                counts,
                first_seen: bounds.first.filter(|_| settings.include_first),
                last_seen: bounds.last.filter(|_| settings.include_last),
            }
        })
        .collect();

    TableGenData { time_nodes, rows }
}
