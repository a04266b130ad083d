//! Rendering-ready structure: folder tree, final order, classified edges

use std::collections::BTreeMap;

use serde::Serialize;

use crate::classify::classify_edges;
use crate::error::LayoutError;
use crate::folders::{FolderId, FolderKind, FolderTree};
use crate::graph::DependencyGraph;
use crate::model::{ClassifiedEdge, EdgeKind, Issue};
use crate::ordering::{ConsumptionGraph, FolderOrder};
use crate::rollup::roll_up;
use crate::scc::{SccPartition, strongly_connected_components};

/// Final vertical row of every folder and file.
///
/// Rows come from a pre-order walk in final order: a folder's row, then its
/// files, then its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTable {
    folder_rows: Vec<usize>,
    file_rows: BTreeMap<String, usize>,
}

impl PositionTable {
    pub fn from_order(tree: &FolderTree, order: &FolderOrder) -> Self {
        let mut folder_rows = vec![0; tree.len()];
        let mut file_rows = BTreeMap::new();
        let mut row = 0;
        for &id in order.sequence() {
            folder_rows[id.0] = row;
            row += 1;
            for file in order.files(id) {
                file_rows.insert(file.clone(), row);
                row += 1;
            }
        }
        PositionTable {
            folder_rows,
            file_rows,
        }
    }

    pub fn folder_row(&self, id: FolderId) -> Option<usize> {
        self.folder_rows.get(id.0).copied()
    }

    /// Row of a file, addressed by its canonical path.
    pub fn file_row(&self, path: &str) -> Option<usize> {
        self.file_rows.get(path).copied()
    }
}

/// One folder as renderers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderView {
    pub id: FolderId,
    pub path: String,
    pub name: String,
    pub kind: FolderKind,
    pub parent: Option<FolderId>,
    /// Children, top to bottom.
    pub children: Vec<FolderId>,
    /// Files held directly, top to bottom.
    pub files: Vec<String>,
    pub level: u32,
    pub row: usize,
}

/// The sole handoff to format-specific renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    /// Folder arena, indexed by `FolderId`.
    pub folders: Vec<FolderView>,
    /// Every folder in final pre-order.
    pub folder_order: Vec<FolderId>,
    pub folder_edges: Vec<ClassifiedEdge<FolderId>>,
    pub file_edges: Vec<ClassifiedEdge<String>>,
    /// First underlying source file of each folder edge.
    #[serde(skip)]
    origins: Vec<String>,
}

impl Visualization {
    /// Lay out `graph` and classify both edge sets.
    ///
    /// `file_sccs` is the component partition of `graph` itself; folder
    /// components are detected independently on the rolled-up graph.
    pub fn build(graph: &DependencyGraph, file_sccs: &SccPartition) -> Result<Self, LayoutError> {
        let tree = FolderTree::build(graph.paths());
        let edges = graph.edges();
        let rollup = roll_up(&tree, &edges);
        let consumption = ConsumptionGraph::from_rollup(&tree, &rollup);
        let folder_sccs = strongly_connected_components(&consumption.adjacency());
        let order = FolderOrder::compute(&tree, &consumption, &folder_sccs, graph, &rollup);
        let positions = PositionTable::from_order(&tree, &order);

        let folder_edges = classify_edges(
            rollup.folder_edges.iter().map(|edge| {
                (
                    edge.source,
                    edge.target,
                    edge.weight(),
                    consumption.degree(edge.source.0, edge.target.0),
                )
            }),
            |id| positions.folder_row(*id),
            |a, b| folder_sccs.same_cycle(a.0, b.0),
        )?;

        let file_edges = classify_edges(
            edges
                .iter()
                .map(|edge| (edge.source.clone(), edge.target.clone(), 1, 1)),
            |path| positions.file_row(path),
            |a, b| match (graph.index_of(a), graph.index_of(b)) {
                (Some(a), Some(b)) => file_sccs.same_cycle(a, b),
                _ => false,
            },
        )?;

        let origins = rollup
            .folder_edges
            .iter()
            .map(|edge| {
                edge.contributors
                    .first()
                    .map(|c| c.source.clone())
                    .unwrap_or_default()
            })
            .collect();

        let folders = tree
            .iter()
            .map(|folder| FolderView {
                id: folder.id,
                path: folder.path.clone(),
                name: folder.name.clone(),
                kind: folder.kind,
                parent: folder.parent,
                children: order.children(folder.id).to_vec(),
                files: order.files(folder.id).to_vec(),
                level: order.level(folder.id),
                row: positions.folder_row(folder.id).unwrap_or_default(),
            })
            .collect();

        tracing::debug!(
            "Layout ready: {} folders, {} folder edges, {} file edges",
            tree.len(),
            folder_edges.len(),
            file_edges.len()
        );

        Ok(Visualization {
            folders,
            folder_order: order.sequence().to_vec(),
            folder_edges,
            file_edges,
            origins,
        })
    }

    pub fn folder(&self, id: FolderId) -> &FolderView {
        &self.folders[id.0]
    }

    /// Real folder at `path`; virtual folders are never returned.
    pub fn folder_by_path(&self, path: &str) -> Option<&FolderView> {
        self.folders
            .iter()
            .find(|f| f.path == path && f.kind != FolderKind::Virtual)
    }

    /// Classification of the folder edge between two folder paths.
    pub fn folder_edge_kind(&self, source: &str, target: &str) -> Option<EdgeKind> {
        let source = self.folder_by_path(source)?.id;
        let target = self.folder_by_path(target)?.id;
        self.folder_edges
            .iter()
            .find(|e| e.source == source && e.target == target)
            .map(|e| e.kind)
    }

    /// Classification of the file edge `source -> target`.
    pub fn file_edge_kind(&self, source: &str, target: &str) -> Option<EdgeKind> {
        self.file_edges
            .iter()
            .find(|e| e.source == source && e.target == target)
            .map(|e| e.kind)
    }

    /// One issue per upward edge: `WrongFolderLayer` for folder edges,
    /// `WrongLayer` for file edges. Cyclic edges are reported elsewhere.
    pub fn layer_issues(&self) -> Vec<Issue> {
        let folder_issues = self
            .folder_edges
            .iter()
            .zip(&self.origins)
            .filter(|(edge, _)| edge.kind == EdgeKind::Upward)
            .map(|(edge, origin)| {
                Issue::wrong_folder_layer(
                    origin,
                    &label(self.folder(edge.source)),
                    &label(self.folder(edge.target)),
                    edge.weight,
                )
            });

        let file_issues = self
            .file_edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::Upward)
            .map(|edge| Issue::wrong_layer(&edge.source, &edge.target));

        folder_issues.chain(file_issues).collect()
    }
}

fn label(folder: &FolderView) -> String {
    match (folder.kind, folder.path.is_empty()) {
        (FolderKind::Root, _) => "/".to_string(),
        (FolderKind::Virtual, true) => "*".to_string(),
        (FolderKind::Virtual, false) => format!("{}/*", folder.path),
        (FolderKind::Regular, _) => folder.path.clone(),
    }
}
