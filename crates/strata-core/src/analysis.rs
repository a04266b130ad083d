//! Per-run analysis: the reporting branch and the entry to the layout branch

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::graph::DependencyGraph;
use crate::layers::{LayerAssignment, assign_layers};
use crate::layout::Visualization;
use crate::model::{FileRecord, Issue};
use crate::scc::{SccPartition, strongly_connected_components};

/// Reporting output of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub issues: Vec<Issue>,
    /// Complete or empty, never partial.
    pub layers: BTreeMap<String, u32>,
    /// Retained adjacency, after filtering.
    pub dependency_graph: BTreeMap<String, Vec<String>>,
    /// 0 exactly when `layers` is empty.
    pub layer_count: u32,
    /// Retained edges, whether or not layering succeeded.
    pub edge_count: usize,
}

impl AnalysisReport {
    /// Append issues found by later stages.
    pub fn with_issues(mut self, issues: impl IntoIterator<Item = Issue>) -> Self {
        self.issues.extend(issues);
        self
    }
}

/// One isolated analysis run: the file graph and its components.
///
/// Both output branches read the same graph; nothing is shared between runs.
#[derive(Debug)]
pub struct Analysis {
    graph: DependencyGraph,
    sccs: SccPartition,
}

impl Analysis {
    /// Build the graph from every record; only starts once all nodes are known.
    pub fn new(records: &[FileRecord], analyzed: Option<&BTreeSet<String>>) -> Self {
        let graph = DependencyGraph::build(records, analyzed);
        let sccs = strongly_connected_components(&graph.adjacency());
        tracing::debug!(
            "Found {} components, {} cyclic",
            sccs.len(),
            sccs.cyclic_components().count()
        );
        Analysis { graph, sccs }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// One `CyclicDependency` issue per member of every cyclic component,
    /// in discovery order.
    pub fn cycle_issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for members in self.sccs.cyclic_components() {
            let paths: Vec<&str> = members.iter().map(|&m| self.graph.path(m)).collect();
            for path in &paths {
                issues.push(Issue::cyclic(path, &paths));
            }
        }
        issues
    }

    pub fn layers(&self) -> LayerAssignment {
        assign_layers(&self.graph, &self.sccs)
    }

    pub fn report(&self) -> AnalysisReport {
        let layers = self.layers();
        AnalysisReport {
            issues: self.cycle_issues(),
            layer_count: layers.layer_count(),
            layers: layers.into_map(),
            dependency_graph: self.graph.to_map(),
            edge_count: self.graph.edge_count(),
        }
    }

    pub fn visualize(&self) -> Result<Visualization, LayoutError> {
        Visualization::build(&self.graph, &self.sccs)
    }
}

/// Run the reporting branch over `records`.
pub fn analyze(records: &[FileRecord], analyzed: Option<&BTreeSet<String>>) -> AnalysisReport {
    Analysis::new(records, analyzed).report()
}

/// Run the layout branch over `records`.
pub fn build_visualization(
    records: &[FileRecord],
    analyzed: Option<&BTreeSet<String>>,
) -> Result<Visualization, LayoutError> {
    Analysis::new(records, analyzed).visualize()
}

/// Reporting output plus the layer issues of the rendered layout.
pub fn analyze_with_layout(
    records: &[FileRecord],
    analyzed: Option<&BTreeSet<String>>,
) -> Result<AnalysisReport, LayoutError> {
    let analysis = Analysis::new(records, analyzed);
    let layer_issues = analysis.visualize()?.layer_issues();
    Ok(analysis.report().with_issues(layer_issues))
}
