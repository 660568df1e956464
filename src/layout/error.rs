use thiserror::Error;

/// Malformed tree input. Always caused by the caller's node list, never transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("no root node: every node references a parent")]
    NoRoot,

    #[error("multiple root nodes: {}", roots.join(", "))]
    MultipleRoots { roots: Vec<String> },

    #[error("node `{node}` references unknown parent `{parent}`")]
    DanglingParent { node: String, parent: String },

    #[error("duplicate node id `{id}`")]
    DuplicateId { id: String },

    #[error("node `{node}` is not reachable from root `{root}`")]
    Unreachable { node: String, root: String },
}

impl StructuralError {
    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            StructuralError::NoRoot => "no-root",
            StructuralError::MultipleRoots { .. } => "multiple-roots",
            StructuralError::DanglingParent { .. } => "dangling-parent",
            StructuralError::DuplicateId { .. } => "duplicate-id",
            StructuralError::Unreachable { .. } => "unreachable",
        }
    }
}
