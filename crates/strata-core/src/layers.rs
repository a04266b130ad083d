//! Topological layer assignment for acyclic file graphs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::scc::SccPartition;

/// Layer number per file, 1 being the topmost (entry) layer.
///
/// Either covers every node of the graph or is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerAssignment {
    layers: BTreeMap<String, u32>,
}

impl LayerAssignment {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn get(&self, path: &str) -> Option<u32> {
        self.layers.get(path).copied()
    }

    /// Number of distinct layers; 0 exactly when empty.
    pub fn layer_count(&self) -> u32 {
        self.layers.values().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.layers.iter().map(|(path, layer)| (path.as_str(), *layer))
    }

    pub fn into_map(self) -> BTreeMap<String, u32> {
        self.layers
    }
}

/// Assign layers to every file, or to none.
///
/// Any cyclic component (including a self-edge) anywhere in the graph aborts
/// layering for the whole node set. Otherwise files without incoming edges
/// sit on layer 1 and every other file sits one layer below its deepest
/// dependent. An entry point that something depends on is no exception.
pub fn assign_layers(graph: &DependencyGraph, sccs: &SccPartition) -> LayerAssignment {
    if sccs.has_cycles() {
        tracing::warn!(
            "Skipping layer assignment: {} dependency cycle(s) detected",
            sccs.cyclic_components().count()
        );
        return LayerAssignment::default();
    }

    let Some(order) = graph.topological_order() else {
        tracing::warn!("Skipping layer assignment: graph is not acyclic");
        return LayerAssignment::default();
    };

    let predecessors = graph.reverse_adjacency();
    let mut layer = vec![0u32; graph.node_count()];
    for node in order {
        layer[node] = if predecessors[node].is_empty() {
            1
        } else {
            if graph.is_entry_point(node) {
                tracing::debug!(
                    "Entry point {} has {} dependent(s), placing it below them",
                    graph.path(node),
                    predecessors[node].len()
                );
            }
            1 + predecessors[node]
                .iter()
                .map(|&pred| layer[pred])
                .max()
                .unwrap_or(0)
        };
    }

    let layers: BTreeMap<String, u32> = layer
        .into_iter()
        .enumerate()
        .map(|(node, layer)| (graph.path(node).to_string(), layer))
        .collect();

    tracing::debug!(
        "Assigned {} files to {} layers",
        layers.len(),
        layers.values().max().copied().unwrap_or(0)
    );

    LayerAssignment { layers }
}
