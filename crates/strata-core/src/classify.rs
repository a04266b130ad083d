//! Edge classification from final positions and cycle membership

use std::fmt::Display;

use crate::error::LayoutError;
use crate::model::{ClassifiedEdge, EdgeKind};

/// Classify one edge. Rows grow downwards; cycle membership wins over
/// position.
pub fn classify_edge(source_row: usize, target_row: usize, same_cycle: bool) -> EdgeKind {
    if same_cycle {
        EdgeKind::Cyclic
    } else if source_row > target_row {
        EdgeKind::Upward
    } else {
        EdgeKind::Normal
    }
}

/// Classify every `(source, target, weight, degree)` edge.
///
/// `row_of` reads the final rendered row, never a logical rank. An endpoint
/// without a row is a contract breach upstream and fails the whole batch.
pub fn classify_edges<N, I, R, C>(
    edges: I,
    row_of: R,
    same_cycle: C,
) -> Result<Vec<ClassifiedEdge<N>>, LayoutError>
where
    N: Display,
    I: IntoIterator<Item = (N, N, u32, u32)>,
    R: Fn(&N) -> Option<usize>,
    C: Fn(&N, &N) -> bool,
{
    edges
        .into_iter()
        .map(|(source, target, weight, degree)| {
            let (Some(source_row), Some(target_row)) = (row_of(&source), row_of(&target)) else {
                debug_assert!(false, "dangling edge {source} -> {target}");
                return Err(LayoutError::DanglingEdge {
                    from: source.to_string(),
                    to: target.to_string(),
                });
            };
            let kind = classify_edge(source_row, target_row, same_cycle(&source, &target));
            Ok(ClassifiedEdge {
                source,
                target,
                kind,
                weight,
                degree,
            })
        })
        .collect()
}
