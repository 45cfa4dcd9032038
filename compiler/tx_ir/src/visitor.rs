//! Tree traversal protocol.
//!
//! [`accept`] drives a [`TreeVisitor`] over a subtree. For every node the
//! visitor's [`visit`](TreeVisitor::visit) hook runs first; when it returns
//! `true` the children are visited in their declared order. The
//! [`end_visit`](TreeVisitor::end_visit) hook then runs unconditionally,
//! including for nodes whose pre-visit declined descent.
//!
//! Both hooks receive the node's [`NodeTag`] as it was *before* `visit`
//! ran, so a visitor that replaced the node in its pre-visit still sees the
//! post-visit for the kind it started with.
//!
//! Visitors get the tree mutably and may replace the node they are visiting
//! or any of its already-visited children. The child list is read after
//! `visit` returns, so children swapped out during the pre-visit are
//! traversed in their new form.

use crate::{ensure_sufficient_stack, NodeId, NodeTag, Tree};

/// Pre/post visitor over a [`Tree`].
pub trait TreeVisitor {
    /// Pre-visit hook. Return `false` to skip the node's children.
    fn visit(&mut self, tree: &mut Tree, node: NodeId, tag: NodeTag) -> bool {
        let _ = (tree, node, tag);
        true
    }

    /// Post-visit hook. Runs once per visited node regardless of descent.
    fn end_visit(&mut self, tree: &mut Tree, node: NodeId, tag: NodeTag) {
        let _ = (tree, node, tag);
    }
}

/// Traverse the subtree rooted at `node` with `visitor`.
pub fn accept<V: TreeVisitor + ?Sized>(tree: &mut Tree, node: NodeId, visitor: &mut V) {
    ensure_sufficient_stack(|| {
        let tag = tree.tag(node);
        if visitor.visit(tree, node, tag) {
            for child in tree.children(node) {
                accept(tree, child, visitor);
            }
        }
        visitor.end_visit(tree, node, tag);
    });
}
