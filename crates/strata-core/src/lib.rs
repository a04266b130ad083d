//! Strata Core: dependency graph, layering, folder roll-up and edge classification

pub mod model;
pub mod error;
pub mod graph;
pub mod scc;
pub mod layers;
pub mod folders;
pub mod rollup;
pub mod ordering;
pub mod classify;
pub mod layout;
pub mod analysis;


#[cfg(test)]
pub mod test_utils;

pub use model::{SourceUnit, DependencyReference, FileRecord, ResolvedEdge, Issue, IssueKind, EdgeKind, ClassifiedEdge};
pub use error::LayoutError;
pub use graph::DependencyGraph;
pub use scc::{SccPartition, strongly_connected_components};
pub use layers::{LayerAssignment, assign_layers};
pub use folders::{Folder, FolderId, FolderKind, FolderTree};
pub use rollup::{RollUp, RolledEdge, roll_up};
pub use ordering::{ConsumptionGraph, FolderOrder, Ranking, rank};
pub use classify::{classify_edge, classify_edges};
pub use layout::{FolderView, PositionTable, Visualization};
pub use analysis::{Analysis, AnalysisReport, analyze, analyze_with_layout, build_visualization};
