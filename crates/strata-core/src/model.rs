//! Core data structures shared by every stage of the engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// One analyzed source file as handed over by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    /// Canonical project-relative path, `/`-separated.
    pub path: String,
    /// Raw dependency declarations in source order.
    #[serde(default)]
    pub declarations: Vec<DependencyReference>,
    #[serde(default)]
    pub is_entry_point: bool,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>) -> Self {
        SourceUnit {
            path: path.into(),
            declarations: Vec::new(),
            is_entry_point: false,
        }
    }

    /// Add a plain declaration.
    pub fn declare(mut self, uri: impl Into<String>) -> Self {
        self.declarations.push(DependencyReference::new(uri));
        self
    }

    pub fn entry_point(mut self) -> Self {
        self.is_entry_point = true;
        self
    }
}

/// A raw dependency declaration plus its conditional alternatives.
///
/// Platform-specific declarations name several interchangeable targets; each
/// one contributes its own edge when it resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyReference {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl DependencyReference {
    pub fn new(uri: impl Into<String>) -> Self {
        DependencyReference {
            uri: uri.into(),
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternative(mut self, uri: impl Into<String>) -> Self {
        self.alternatives.push(uri.into());
        self
    }

    /// The primary target followed by every alternative.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.uri.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }
}

/// Per-file input record: dependency targets are already resolved to
/// candidate project-internal paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub file_path: String,
    #[serde(default)]
    pub dependency_targets: Vec<String>,
    #[serde(default)]
    pub is_entry_point: bool,
}

impl FileRecord {
    pub fn new(file_path: impl Into<String>, targets: &[&str]) -> Self {
        FileRecord {
            file_path: file_path.into(),
            dependency_targets: targets.iter().map(|t| t.to_string()).collect(),
            is_entry_point: false,
        }
    }

    pub fn entry_point(mut self) -> Self {
        self.is_entry_point = true;
        self
    }
}

/// A materialized file-level edge. Both endpoints are known nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolvedEdge {
    pub source: String,
    pub target: String,
}

impl ResolvedEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        ResolvedEdge {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// What kind of problem an issue reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// The file is a member of a dependency cycle.
    CyclicDependency,
    /// A file-level edge points up the rendered layout.
    WrongLayer,
    /// A folder-level edge points up the rendered layout.
    WrongFolderLayer,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::CyclicDependency => write!(f, "cyclic dependency"),
            IssueKind::WrongLayer => write!(f, "wrong layer"),
            IssueKind::WrongFolderLayer => write!(f, "wrong folder layer"),
        }
    }
}

/// A reported condition attached to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub file_path: String,
    pub message: String,
}

impl Issue {
    /// Issue for one member of a cyclic component. `members` must be sorted.
    pub fn cyclic(file_path: &str, members: &[&str]) -> Self {
        let others: Vec<&str> = members.iter().copied().filter(|m| *m != file_path).collect();
        let message = if others.is_empty() {
            format!("{file_path} depends on itself")
        } else {
            format!(
                "{file_path} is part of a dependency cycle with {}",
                others.join(", ")
            )
        };
        Issue {
            kind: IssueKind::CyclicDependency,
            file_path: file_path.to_string(),
            message,
        }
    }

    pub fn wrong_layer(source: &str, target: &str) -> Self {
        Issue {
            kind: IssueKind::WrongLayer,
            file_path: source.to_string(),
            message: format!("{source} depends on {target}, which is rendered above it"),
        }
    }

    /// `file_path` is the first underlying source file of the folder edge.
    pub fn wrong_folder_layer(file_path: &str, source: &str, target: &str, weight: u32) -> Self {
        let noun = if weight == 1 { "dependency" } else { "dependencies" };
        Issue {
            kind: IssueKind::WrongFolderLayer,
            file_path: file_path.to_string(),
            message: format!(
                "folder {source} depends on folder {target}, which is rendered above it ({weight} {noun})"
            ),
        }
    }
}

/// Classification of a rendered edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Points down the layout.
    Normal,
    /// Source sits strictly below its target.
    Upward,
    /// Both endpoints share a strongly connected component.
    Cyclic,
}

/// A rendered edge with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedEdge<N> {
    pub source: N,
    pub target: N,
    pub kind: EdgeKind,
    /// Number of underlying file edges.
    pub weight: u32,
    /// Number of distinct contributing folder pairs; the value renderers show.
    pub degree: u32,
}
