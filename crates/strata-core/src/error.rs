//! Error types for the layout pipeline

use thiserror::Error;

/// Contract breaches detected while producing the rendering structure.
///
/// Cycles and unresolved targets are reported conditions, never errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// An edge names a node missing from the position table.
    #[error("edge {from} -> {to} references a node without a layout position")]
    DanglingEdge { from: String, to: String },
}
