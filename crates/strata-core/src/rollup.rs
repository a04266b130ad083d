//! Hierarchical roll-up of file edges into sibling folder edges

use std::collections::BTreeMap;

use crate::folders::{FolderId, FolderTree};
use crate::model::ResolvedEdge;

/// A folder-level edge between two siblings, with the file edges behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolledEdge {
    pub source: FolderId,
    pub target: FolderId,
    /// Underlying file edges, sorted.
    pub contributors: Vec<ResolvedEdge>,
}

impl RolledEdge {
    /// Number of underlying file edges.
    pub fn weight(&self) -> u32 {
        self.contributors.len() as u32
    }
}

/// Result of rolling up every file edge of a graph.
#[derive(Debug, Clone, Default)]
pub struct RollUp {
    /// Cross-folder edges, sorted by `(source, target)`.
    pub folder_edges: Vec<RolledEdge>,
    /// File edges whose endpoints share a holding folder.
    pub local_edges: BTreeMap<FolderId, Vec<ResolvedEdge>>,
}

/// Roll each cross-folder file edge up to the direct children of the lowest
/// common ancestor of its endpoints.
///
/// A loose file directly inside that ancestor is represented by the
/// ancestor's virtual folder, so an edge from loose files into a subfolder
/// lands as virtual -> subfolder without further roll-up.
pub fn roll_up(tree: &FolderTree, edges: &[ResolvedEdge]) -> RollUp {
    let mut grouped: BTreeMap<(FolderId, FolderId), Vec<ResolvedEdge>> = BTreeMap::new();
    let mut local_edges: BTreeMap<FolderId, Vec<ResolvedEdge>> = BTreeMap::new();

    for edge in edges {
        let (Some(source_holder), Some(target_holder)) =
            (tree.holder_of(&edge.source), tree.holder_of(&edge.target))
        else {
            tracing::warn!(
                "Skipping roll-up of {} -> {}: endpoint not in folder tree",
                edge.source,
                edge.target
            );
            continue;
        };

        if source_holder == target_holder {
            local_edges.entry(source_holder).or_default().push(edge.clone());
            continue;
        }

        let ancestor = tree.lowest_common_ancestor(source_holder, target_holder);
        let (Some(source), Some(target)) = (
            tree.child_toward(ancestor, source_holder),
            tree.child_toward(ancestor, target_holder),
        ) else {
            // Holders never coincide with their common ancestor: a real folder
            // holding files has no subfolders.
            tracing::warn!(
                "Skipping roll-up of {} -> {}: no sibling pair under {}",
                edge.source,
                edge.target,
                tree.get(ancestor).path
            );
            continue;
        };

        grouped.entry((source, target)).or_default().push(edge.clone());
    }

    let folder_edges: Vec<RolledEdge> = grouped
        .into_iter()
        .map(|((source, target), mut contributors)| {
            contributors.sort();
            RolledEdge {
                source,
                target,
                contributors,
            }
        })
        .collect();

    for local in local_edges.values_mut() {
        local.sort();
    }

    tracing::debug!(
        "Rolled up {} file edges into {} folder edges",
        edges.len(),
        folder_edges.len()
    );

    RollUp {
        folder_edges,
        local_edges,
    }
}
