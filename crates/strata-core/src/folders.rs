//! Folder tree built from file paths, with virtual folders for loose files

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a folder in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub usize);

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "folder#{}", self.0)
    }
}

/// Discriminates real directories from synthesized containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    Root,
    Regular,
    /// Holds the loose files of a folder that also has subfolders.
    /// Presentation only: it is never a path lookup key.
    Virtual,
}

/// A node of the folder tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: FolderId,
    /// Directory path; a virtual folder repeats its parent's path.
    pub path: String,
    pub name: String,
    pub kind: FolderKind,
    pub parent: Option<FolderId>,
    /// Virtual child first, then subfolders by path.
    pub children: Vec<FolderId>,
    /// Files held directly, by canonical path, sorted.
    pub files: Vec<String>,
    pub depth: usize,
}

impl Folder {
    pub fn is_virtual(&self) -> bool {
        self.kind == FolderKind::Virtual
    }
}

/// Arena of folders rooted at the project root (path `""`).
#[derive(Debug, Clone)]
pub struct FolderTree {
    folders: Vec<Folder>,
    by_path: BTreeMap<String, FolderId>,
    holders: BTreeMap<String, FolderId>,
}

/// Directory part of a `/`-separated path; `""` for top-level files.
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

fn base_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

impl FolderTree {
    /// Group `files` by parent directory into a tree.
    pub fn build<'a>(files: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tree = FolderTree {
            folders: vec![Folder {
                id: FolderId(0),
                path: String::new(),
                name: String::new(),
                kind: FolderKind::Root,
                parent: None,
                children: Vec::new(),
                files: Vec::new(),
                depth: 0,
            }],
            by_path: BTreeMap::from([(String::new(), FolderId(0))]),
            holders: BTreeMap::new(),
        };

        let mut sorted: Vec<&str> = files.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        for file in sorted {
            let folder = tree.ensure_folder(parent_dir(file));
            tree.folders[folder.0].files.push(file.to_string());
        }

        let real_count = tree.folders.len();
        for idx in 0..real_count {
            let mut paths: Vec<(String, FolderId)> = tree.folders[idx]
                .children
                .iter()
                .map(|&child| (tree.folders[child.0].path.clone(), child))
                .collect();
            paths.sort();
            tree.folders[idx].children = paths.into_iter().map(|(_, id)| id).collect();

            if !tree.folders[idx].files.is_empty() && !tree.folders[idx].children.is_empty() {
                tree.add_virtual(FolderId(idx));
            }
        }

        for folder in &tree.folders {
            for file in &folder.files {
                tree.holders.insert(file.clone(), folder.id);
            }
        }

        tracing::debug!(
            "Built folder tree: {} folders ({} virtual) for {} files",
            tree.folders.len(),
            tree.folders.len() - real_count,
            tree.holders.len()
        );

        tree
    }

    fn ensure_folder(&mut self, path: &str) -> FolderId {
        if let Some(&id) = self.by_path.get(path) {
            return id;
        }
        let parent = self.ensure_folder(parent_dir(path));
        let id = FolderId(self.folders.len());
        let depth = self.folders[parent.0].depth + 1;
        self.folders.push(Folder {
            id,
            path: path.to_string(),
            name: base_name(path).to_string(),
            kind: FolderKind::Regular,
            parent: Some(parent),
            children: Vec::new(),
            files: Vec::new(),
            depth,
        });
        self.folders[parent.0].children.push(id);
        self.by_path.insert(path.to_string(), id);
        id
    }

    fn add_virtual(&mut self, owner: FolderId) {
        let id = FolderId(self.folders.len());
        let files = std::mem::take(&mut self.folders[owner.0].files);
        let path = self.folders[owner.0].path.clone();
        let name = self.folders[owner.0].name.clone();
        let depth = self.folders[owner.0].depth + 1;
        self.folders.push(Folder {
            id,
            path,
            name,
            kind: FolderKind::Virtual,
            parent: Some(owner),
            children: Vec::new(),
            files,
            depth,
        });
        self.folders[owner.0].children.insert(0, id);
    }

    pub fn root(&self) -> FolderId {
        FolderId(0)
    }

    /// Total number of folders, virtual ones included.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn get(&self, id: FolderId) -> &Folder {
        &self.folders[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Folder> {
        self.folders.iter()
    }

    /// Look up a real folder by directory path. Virtual folders are not keyed.
    pub fn folder_by_path(&self, path: &str) -> Option<FolderId> {
        self.by_path.get(path).copied()
    }

    /// Folder that visually holds `file`: its directory, or that directory's
    /// virtual folder.
    pub fn holder_of(&self, file: &str) -> Option<FolderId> {
        self.holders.get(file).copied()
    }

    /// `id` followed by each ancestor up to the root.
    pub fn ancestors(&self, id: FolderId) -> impl Iterator<Item = FolderId> + '_ {
        std::iter::successors(Some(id), move |current| self.folders[current.0].parent)
    }

    pub fn lowest_common_ancestor(&self, a: FolderId, b: FolderId) -> FolderId {
        let (mut a, mut b) = (a, b);
        while self.folders[a.0].depth > self.folders[b.0].depth {
            a = self.folders[a.0].parent.unwrap_or(a);
        }
        while self.folders[b.0].depth > self.folders[a.0].depth {
            b = self.folders[b.0].parent.unwrap_or(b);
        }
        while a != b {
            match (self.folders[a.0].parent, self.folders[b.0].parent) {
                (Some(pa), Some(pb)) => {
                    a = pa;
                    b = pb;
                }
                _ => break,
            }
        }
        a
    }

    /// Direct child of `ancestor` on the way down to `descendant`.
    pub fn child_toward(&self, ancestor: FolderId, descendant: FolderId) -> Option<FolderId> {
        self.ancestors(descendant)
            .find(|&id| self.folders[id.0].parent == Some(ancestor))
    }
}
