//! Strongly connected components over index adjacency lists
//!
//! Tarjan's algorithm driven by an explicit frame stack, so deep import
//! chains never hit the call-stack limit. Nodes are plain indices; callers
//! keep the index order path-sorted, which makes discovery order and
//! component contents reproducible.

const UNVISITED: usize = usize::MAX;

/// Partition of a graph's nodes into strongly connected components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccPartition {
    /// Members of every component, ascending. Components appear in the order
    /// Tarjan completes them, which is reverse topological order.
    components: Vec<Vec<usize>>,
    component_of: Vec<usize>,
    cyclic: Vec<bool>,
}

impl SccPartition {
    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All components in completion order.
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// Component index of `node`.
    pub fn component_of(&self, node: usize) -> usize {
        self.component_of[node]
    }

    /// Members of the component holding `node`.
    pub fn members_of(&self, node: usize) -> &[usize] {
        &self.components[self.component_of[node]]
    }

    /// A component is cyclic when it has two or more members or a self-edge.
    pub fn is_cyclic(&self, component: usize) -> bool {
        self.cyclic[component]
    }

    /// Whether `node` participates in any cycle.
    pub fn in_cycle(&self, node: usize) -> bool {
        self.cyclic[self.component_of[node]]
    }

    /// Whether `a` and `b` sit in the same cyclic component.
    pub fn same_cycle(&self, a: usize, b: usize) -> bool {
        let component = self.component_of[a];
        component == self.component_of[b] && self.cyclic[component]
    }

    pub fn has_cycles(&self) -> bool {
        self.cyclic.iter().any(|&c| c)
    }

    /// Cyclic components in completion order.
    pub fn cyclic_components(&self) -> impl Iterator<Item = &[usize]> {
        self.components
            .iter()
            .zip(&self.cyclic)
            .filter(|(_, cyclic)| **cyclic)
            .map(|(members, _)| members.as_slice())
    }
}

/// Compute the strongly connected components of `adjacency`.
///
/// `adjacency[n]` lists the successors of node `n`; neighbours are visited
/// in the order given. Runs in O(nodes + edges).
pub fn strongly_connected_components(adjacency: &[Vec<usize>]) -> SccPartition {
    let node_count = adjacency.len();
    let mut index = vec![UNVISITED; node_count];
    let mut lowlink = vec![0; node_count];
    let mut on_stack = vec![false; node_count];
    let mut stack: Vec<usize> = Vec::new();
    // (node, position of the next successor to visit)
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut next_index = 0;

    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut component_of = vec![0; node_count];

    for root in 0..node_count {
        if index[root] != UNVISITED {
            continue;
        }

        index[root] = next_index;
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        frames.push((root, 0));

        while let Some(&(node, position)) = frames.last() {
            if let Some(&next) = adjacency[node].get(position) {
                let top = frames.len() - 1;
                frames[top].1 += 1;

                if index[next] == UNVISITED {
                    index[next] = next_index;
                    lowlink[next] = next_index;
                    next_index += 1;
                    stack.push(next);
                    on_stack[next] = true;
                    frames.push((next, 0));
                } else if on_stack[next] {
                    lowlink[node] = lowlink[node].min(index[next]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[node]);
            }

            if lowlink[node] == index[node] {
                let id = components.len();
                let mut members = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component_of[member] = id;
                    members.push(member);
                    if member == node {
                        break;
                    }
                }
                members.sort_unstable();
                components.push(members);
            }
        }
    }

    let cyclic = components
        .iter()
        .map(|members| match members.as_slice() {
            [single] => adjacency[*single].contains(single),
            _ => true,
        })
        .collect();

    SccPartition {
        components,
        component_of,
        cyclic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(node_count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); node_count];
        for &(from, to) in edges {
            adjacency[from].push(to);
        }
        adjacency
    }

    #[test]
    fn test_cycle_detection_cases() {
        let cases = vec![
            (3, vec![(0, 1), (1, 2)], 0, "No cycles"),
            (2, vec![(0, 1), (1, 0)], 1, "Simple cycle"),
            (4, vec![(0, 1), (0, 2), (1, 3), (2, 3)], 0, "Diamond DAG"),
            (1, vec![(0, 0)], 1, "Self loop"),
            (3, vec![(0, 1), (1, 2), (2, 0)], 1, "Three node cycle"),
            (4, vec![(0, 1), (1, 0), (2, 3), (3, 2)], 2, "Disjoint cycles"),
            (3, vec![(0, 1), (1, 0), (1, 2), (2, 1)], 1, "Figure-8 merges into one component"),
            (0, vec![], 0, "Empty graph"),
        ];

        for (node_count, edges, expected, desc) in cases {
            let partition = strongly_connected_components(&adjacency(node_count, &edges));
            assert_eq!(partition.cyclic_components().count(), expected, "Failed: {desc}");
        }
    }

    #[test]
    fn test_components_are_reverse_topological() {
        // 0 -> 1 -> 2, and 2 <-> 3
        let partition = strongly_connected_components(&adjacency(4, &[(0, 1), (1, 2), (2, 3), (3, 2)]));
        let order: Vec<usize> = partition.components().iter().map(|c| c[0]).collect();
        assert_eq!(order, vec![2, 1, 0]);
        assert_eq!(partition.members_of(3), &[2, 3]);
        assert!(partition.same_cycle(2, 3));
        assert!(!partition.same_cycle(1, 2));
        assert!(!partition.in_cycle(0));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let node_count = 200_000;
        let edges: Vec<(usize, usize)> = (0..node_count - 1).map(|n| (n, n + 1)).collect();
        let mut adjacency = adjacency(node_count, &edges);
        adjacency[node_count - 1].push(0);

        let partition = strongly_connected_components(&adjacency);
        assert_eq!(partition.len(), 1);
        assert!(partition.has_cycles());
    }
}
