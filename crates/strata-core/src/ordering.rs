//! Consumption graph and the two-phase vertical ordering
//!
//! Phase 1 turns one-directional consumption into hard constraints by
//! condensing strongly connected components and ranking the condensation
//! with `level(n) = max(level(consumers of n)) + 1`. Phase 2 orders the
//! members of each cyclic component by how much they consume from the rest
//! of the component. Folder paths close every tie.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use crate::folders::{FolderId, FolderKind, FolderTree};
use crate::graph::DependencyGraph;
use crate::rollup::RollUp;
use crate::scc::{SccPartition, strongly_connected_components};

/// Weighted consumption edges over a flat index space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumptionGraph {
    len: usize,
    weights: BTreeMap<(usize, usize), u32>,
    degrees: BTreeMap<(usize, usize), u32>,
}

impl ConsumptionGraph {
    pub fn new(len: usize) -> Self {
        ConsumptionGraph {
            len,
            weights: BTreeMap::new(),
            degrees: BTreeMap::new(),
        }
    }

    /// Folder-level consumption from rolled-up edges.
    ///
    /// Weight counts underlying file edges; degree counts the distinct
    /// holding-folder pairs those file edges connect.
    pub fn from_rollup(tree: &FolderTree, rollup: &RollUp) -> Self {
        let mut graph = ConsumptionGraph::new(tree.len());
        for edge in &rollup.folder_edges {
            let pairs: BTreeSet<(Option<FolderId>, Option<FolderId>)> = edge
                .contributors
                .iter()
                .map(|file_edge| (tree.holder_of(&file_edge.source), tree.holder_of(&file_edge.target)))
                .collect();
            graph.add(edge.source.0, edge.target.0, edge.weight(), pairs.len() as u32);
        }
        graph
    }

    /// Accumulate weight and degree onto `from -> to`.
    pub fn add(&mut self, from: usize, to: usize, weight: u32, degree: u32) {
        *self.weights.entry((from, to)).or_insert(0) += weight;
        *self.degrees.entry((from, to)).or_insert(0) += degree;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, from: usize, to: usize) -> u32 {
        self.weights.get(&(from, to)).copied().unwrap_or(0)
    }

    pub fn degree(&self, from: usize, to: usize) -> u32 {
        self.degrees.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Sorted successor lists.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.len];
        for &(from, to) in self.weights.keys() {
            adjacency[from].push(to);
        }
        adjacency
    }
}

/// Logical rank of every node of a consumption graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    /// Layered-ranking level, 1 for nodes nobody consumes.
    pub levels: Vec<u32>,
    /// Position inside the node's cyclic component; 0 outside cycles.
    pub strength: Vec<usize>,
    /// Smallest key among the node's component, keeping components contiguous.
    leaders: Vec<usize>,
}

/// Rank the nodes of `graph`. `keys[n]` is node `n`'s path.
pub fn rank(graph: &ConsumptionGraph, sccs: &SccPartition, keys: &[&str]) -> Ranking {
    let adjacency = graph.adjacency();

    // Components complete in reverse topological order, so walking them
    // backwards visits every consumer before what it consumes.
    let mut component_level = vec![1u32; sccs.len()];
    for component in (0..sccs.len()).rev() {
        let level = component_level[component];
        for &member in &sccs.components()[component] {
            for &next in &adjacency[member] {
                let target = sccs.component_of(next);
                if target != component {
                    component_level[target] = component_level[target].max(level + 1);
                }
            }
        }
    }

    let mut strength = vec![0usize; graph.len()];
    let mut leaders = vec![0usize; graph.len()];
    for members in sccs.components() {
        let leader = members
            .iter()
            .copied()
            .min_by_key(|&m| (keys[m], m))
            .unwrap_or(0);
        for &member in members {
            leaders[member] = leader;
        }

        if members.len() < 2 {
            continue;
        }

        let mut scored: Vec<(Reverse<u32>, u32, &str, usize)> = members
            .iter()
            .map(|&member| {
                let others = members.iter().copied().filter(move |&k| k != member);
                let group_out: u32 = others.clone().map(|k| graph.weight(member, k)).sum();
                let incoming: u32 = others.map(|k| graph.degree(k, member)).sum();
                (Reverse(group_out), incoming, keys[member], member)
            })
            .collect();
        scored.sort();
        for (position, (_, _, _, member)) in scored.into_iter().enumerate() {
            strength[member] = position;
        }
    }

    let levels = (0..graph.len())
        .map(|node| component_level[sccs.component_of(node)])
        .collect();

    Ranking {
        levels,
        strength,
        leaders,
    }
}

impl Ranking {
    /// Sort `members` top to bottom. Pinned members go first.
    pub fn order(&self, members: &mut [usize], keys: &[&str], pinned: impl Fn(usize) -> bool) {
        members.sort_by_key(|&m| {
            (
                !pinned(m),
                self.levels[m],
                keys[self.leaders[m]],
                self.strength[m],
                keys[m],
                m,
            )
        });
    }
}

/// Final vertical order of folders and of the files inside each folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderOrder {
    children: Vec<Vec<FolderId>>,
    files: Vec<Vec<String>>,
    levels: Vec<u32>,
    sequence: Vec<FolderId>,
}

impl FolderOrder {
    /// Order every folder's children and files.
    ///
    /// Folder levels come from one pass over the whole folder graph; the
    /// virtual folder always leads its siblings. Files use the same ranking
    /// over the edges local to their folder.
    pub fn compute(
        tree: &FolderTree,
        consumption: &ConsumptionGraph,
        folder_sccs: &SccPartition,
        graph: &DependencyGraph,
        rollup: &RollUp,
    ) -> Self {
        let folder_keys: Vec<&str> = tree.iter().map(|f| f.path.as_str()).collect();
        let folder_ranking = rank(consumption, folder_sccs, &folder_keys);

        let mut children: Vec<Vec<FolderId>> = Vec::with_capacity(tree.len());
        for folder in tree.iter() {
            let mut members: Vec<usize> = folder.children.iter().map(|c| c.0).collect();
            folder_ranking.order(&mut members, &folder_keys, |m| {
                tree.get(FolderId(m)).kind == FolderKind::Virtual
            });
            children.push(members.into_iter().map(FolderId).collect());
        }

        let mut local = ConsumptionGraph::new(graph.node_count());
        for edges in rollup.local_edges.values() {
            for edge in edges {
                if let (Some(source), Some(target)) =
                    (graph.index_of(&edge.source), graph.index_of(&edge.target))
                {
                    local.add(source, target, 1, 1);
                }
            }
        }
        let file_keys: Vec<&str> = (0..graph.node_count()).map(|i| graph.path(i)).collect();
        let local_sccs = strongly_connected_components(&local.adjacency());
        let file_ranking = rank(&local, &local_sccs, &file_keys);

        let mut files: Vec<Vec<String>> = Vec::with_capacity(tree.len());
        for folder in tree.iter() {
            let mut members: Vec<usize> = folder
                .files
                .iter()
                .filter_map(|path| graph.index_of(path))
                .collect();
            file_ranking.order(&mut members, &file_keys, |_| false);
            files.push(members.into_iter().map(|i| file_keys[i].to_string()).collect());
        }

        let mut sequence = Vec::with_capacity(tree.len());
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            sequence.push(id);
            stack.extend(children[id.0].iter().rev().copied());
        }

        FolderOrder {
            children,
            files,
            levels: folder_ranking.levels,
            sequence,
        }
    }

    /// Children of `id`, top to bottom.
    pub fn children(&self, id: FolderId) -> &[FolderId] {
        &self.children[id.0]
    }

    /// Files held by `id`, top to bottom.
    pub fn files(&self, id: FolderId) -> &[String] {
        &self.files[id.0]
    }

    pub fn level(&self, id: FolderId) -> u32 {
        self.levels[id.0]
    }

    /// Every folder in pre-order, root first.
    pub fn sequence(&self) -> &[FolderId] {
        &self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResolvedEdge;
    use crate::rollup::roll_up;

    fn graph_of(len: usize, edges: &[(usize, usize, u32)]) -> ConsumptionGraph {
        let mut graph = ConsumptionGraph::new(len);
        for &(from, to, weight) in edges {
            graph.add(from, to, weight, 1);
        }
        graph
    }

    fn ordered(graph: &ConsumptionGraph, keys: &[&str]) -> Vec<String> {
        let sccs = strongly_connected_components(&graph.adjacency());
        let ranking = rank(graph, &sccs, keys);
        let mut members: Vec<usize> = (0..graph.len()).collect();
        ranking.order(&mut members, keys, |_| false);
        members.into_iter().map(|m| keys[m].to_string()).collect()
    }

    #[test]
    fn test_one_directional_consumption_is_a_hard_constraint() {
        // "z" consumes "a": z must rank above a despite its path
        let graph = graph_of(2, &[(1, 0, 1)]);
        assert_eq!(ordered(&graph, &["a", "z"]), vec!["z", "a"]);
    }

    #[test]
    fn test_mutual_pair_ordered_by_strength() {
        let graph = graph_of(2, &[(0, 1, 1), (1, 0, 5)]);
        assert_eq!(ordered(&graph, &["a", "b"]), vec!["b", "a"]);
    }

    #[test]
    fn test_triangle_ordered_by_group_out() {
        // a -> b -> c -> a with c consuming most
        let graph = graph_of(3, &[(0, 1, 2), (1, 2, 1), (2, 0, 4)]);
        assert_eq!(ordered(&graph, &["a", "b", "c"]), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_equal_strength_breaks_on_incoming_degree_then_path() {
        // b and c consume 3 each; c receives more distinct connections
        let mut graph = ConsumptionGraph::new(3);
        graph.add(1, 2, 2, 1);
        graph.add(2, 1, 2, 1);
        graph.add(1, 0, 1, 1);
        graph.add(2, 0, 1, 1);
        graph.add(0, 2, 1, 3);
        let keys = ["a", "b", "c"];
        let sccs = strongly_connected_components(&graph.adjacency());
        let ranking = rank(&graph, &sccs, &keys);

        assert!(ranking.strength[1] < ranking.strength[2]);
    }

    #[test]
    fn test_independent_branches_align_by_depth() {
        // p alone; q -> r -> s
        let graph = graph_of(4, &[(1, 2, 1), (2, 3, 1)]);
        let keys = ["p", "q", "r", "s"];
        let sccs = strongly_connected_components(&graph.adjacency());
        let ranking = rank(&graph, &sccs, &keys);

        assert_eq!(ranking.levels, vec![1, 1, 2, 3]);
        assert_eq!(ordered(&graph, &keys), vec!["p", "q", "r", "s"]);
    }

    #[test]
    fn test_consumer_root_not_pulled_below_other_branch_leaves() {
        // long: a -> b -> c -> d ; short: x -> y
        let graph = graph_of(6, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (4, 5, 1)]);
        let keys = ["a", "b", "c", "d", "x", "y"];
        assert_eq!(ordered(&graph, &keys), vec!["a", "x", "b", "y", "c", "d"]);
    }

    #[test]
    fn test_pinned_members_lead() {
        let graph = graph_of(2, &[(1, 0, 1)]);
        let keys = ["a", "b"];
        let sccs = strongly_connected_components(&graph.adjacency());
        let ranking = rank(&graph, &sccs, &keys);
        let mut members = vec![0, 1];
        ranking.order(&mut members, &keys, |m| m == 0);
        assert_eq!(members, vec![0, 1]);
    }

    #[test]
    fn test_degree_counts_holder_pairs_not_file_edges() {
        let tree = FolderTree::build(["a/x/1.dart", "a/x/2.dart", "a/y/4.dart", "b/3.dart"]);
        let edges = vec![
            ResolvedEdge::new("a/x/1.dart", "b/3.dart"),
            ResolvedEdge::new("a/x/2.dart", "b/3.dart"),
            ResolvedEdge::new("a/y/4.dart", "b/3.dart"),
        ];
        let consumption = ConsumptionGraph::from_rollup(&tree, &roll_up(&tree, &edges));

        let a = tree.folder_by_path("a").unwrap().0;
        let b = tree.folder_by_path("b").unwrap().0;
        assert_eq!(consumption.weight(a, b), 3);
        assert_eq!(consumption.degree(a, b), 2);
        assert_eq!(consumption.weight(b, a), 0);
    }
}
