//! File-level dependency graph backed by petgraph::DiGraph

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::{FileRecord, ResolvedEdge};

/// A node of the file graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub path: String,
    pub is_entry_point: bool,
}

/// The project-internal dependency graph for one analysis run.
///
/// Nodes are inserted in path order, so node indices double as a stable,
/// path-sorted numbering for every index-based algorithm downstream.
pub struct DependencyGraph {
    inner: DiGraph<FileNode, ()>,
    index: BTreeMap<String, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl DependencyGraph {
    /// Build the graph from resolved records.
    ///
    /// With `analyzed` set, only listed paths become nodes. An edge survives
    /// only when its target is a node; duplicate edges collapse. Records that
    /// repeat a path are merged.
    pub fn build(records: &[FileRecord], analyzed: Option<&BTreeSet<String>>) -> Self {
        let mut merged: BTreeMap<&str, (bool, BTreeSet<&str>)> = BTreeMap::new();
        for record in records {
            if analyzed.is_some_and(|set| !set.contains(&record.file_path)) {
                continue;
            }
            let entry = merged.entry(record.file_path.as_str()).or_default();
            entry.0 |= record.is_entry_point;
            entry
                .1
                .extend(record.dependency_targets.iter().map(String::as_str));
        }

        let mut inner = DiGraph::with_capacity(merged.len(), 0);
        let mut index = BTreeMap::new();
        for (path, (is_entry_point, _)) in &merged {
            let idx = inner.add_node(FileNode {
                path: path.to_string(),
                is_entry_point: *is_entry_point,
            });
            index.insert(path.to_string(), idx);
        }

        let mut dropped = 0usize;
        for (path, (_, targets)) in &merged {
            let source = index[*path];
            for target in targets {
                match index.get(*target) {
                    Some(&target) => {
                        inner.add_edge(source, target, ());
                    }
                    None => {
                        dropped += 1;
                        tracing::trace!("Dropping edge {} -> {}: target not analyzed", path, target);
                    }
                }
            }
        }

        tracing::debug!(
            "Built dependency graph: {} nodes, {} edges, {} targets dropped",
            inner.node_count(),
            inner.edge_count(),
            dropped
        );

        DependencyGraph { inner, index }
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of retained edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Stable index of `path`.
    pub fn index_of(&self, path: &str) -> Option<usize> {
        self.index.get(path).map(|idx| idx.index())
    }

    /// Path of the node at `index`.
    pub fn path(&self, index: usize) -> &str {
        &self.inner[NodeIndex::new(index)].path
    }

    pub fn is_entry_point(&self, index: usize) -> bool {
        self.inner[NodeIndex::new(index)].is_entry_point
    }

    /// All node paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Sorted successor lists by node index.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.inner.node_count()];
        for edge in self.inner.raw_edges() {
            adjacency[edge.source().index()].push(edge.target().index());
        }
        for successors in &mut adjacency {
            successors.sort_unstable();
        }
        adjacency
    }

    /// Sorted predecessor lists by node index.
    pub fn reverse_adjacency(&self) -> Vec<Vec<usize>> {
        let mut reverse = vec![Vec::new(); self.inner.node_count()];
        for edge in self.inner.raw_edges() {
            reverse[edge.target().index()].push(edge.source().index());
        }
        for predecessors in &mut reverse {
            predecessors.sort_unstable();
        }
        reverse
    }

    /// All edges as `(source, target)` index pairs, sorted.
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .inner
            .raw_edges()
            .iter()
            .map(|e| (e.source().index(), e.target().index()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// All edges by path, sorted.
    pub fn edges(&self) -> Vec<ResolvedEdge> {
        self.edge_indices()
            .into_iter()
            .map(|(source, target)| ResolvedEdge::new(self.path(source), self.path(target)))
            .collect()
    }

    /// Adjacency keyed by path; every node is listed, even without edges.
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.adjacency()
            .into_iter()
            .enumerate()
            .map(|(source, targets)| {
                let targets = targets
                    .into_iter()
                    .map(|target| self.path(target).to_string())
                    .collect();
                (self.path(source).to_string(), targets)
            })
            .collect()
    }

    /// Node indices with sources before targets, or `None` when cyclic.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        toposort(&self.inner, None)
            .ok()
            .map(|order| order.into_iter().map(|idx| idx.index()).collect())
    }
}
