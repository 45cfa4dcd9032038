//! Lowering violations.
//!
//! A lowering violation means an earlier pass or the host analyzer produced
//! a tree the pass cannot lower. The run stops at the first one.

use tx_ir::{NodeId, NodeTag};
use tx_types::ContractViolation;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoweringViolation {
    #[error("array creation {node:?} has {dimensions} dimensions but `{ty}` nests fewer arrays")]
    DimensionMismatch {
        node: NodeId,
        dimensions: usize,
        ty: String,
    },

    #[error("{node:?} should have an array type, found `{ty}`")]
    NotAnArray { node: NodeId, ty: String },

    #[error("{tag:?} node {node:?} has no type")]
    MissingType { node: NodeId, tag: NodeTag },

    #[error("{tag:?} node {node:?} is missing its {operand}")]
    MissingOperand {
        node: NodeId,
        tag: NodeTag,
        operand: &'static str,
    },

    #[error(transparent)]
    Contract(#[from] ContractViolation),
}
