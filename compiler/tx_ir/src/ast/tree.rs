//! Node arena with replace-and-reparent.
//!
//! The arena is append-only. Replacing or detaching a node never frees its
//! slot; the old subtree simply becomes unreachable from any root.

use smallvec::SmallVec;

use super::{ListSlot, Node, NodeKind, NodeTag};
use crate::ids::to_u32;
use crate::{ensure_sufficient_stack, ElementId, Name, NodeId, TypeId};

/// Arena holding every node of one translation unit.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate a node and attach its children to it.
    ///
    /// Every child must be unparented: freshly allocated, deep-copied, or
    /// detached with [`take`](Self::take).
    pub fn alloc(
        &mut self,
        kind: NodeKind,
        ty: Option<TypeId>,
        element: Option<ElementId>,
    ) -> NodeId {
        let id = NodeId::new(to_u32(self.nodes.len(), "tree nodes"));
        for child in kind.children() {
            let slot = &mut self.nodes[child.index()];
            debug_assert!(
                slot.parent.is_none(),
                "{child:?} already owned by {:?}; detach it before reparenting",
                slot.parent,
            );
            slot.parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            ty,
            element,
            parent: None,
        });
        id
    }

    /// Allocate a simple name node.
    pub fn simple_name(
        &mut self,
        identifier: Name,
        element: Option<ElementId>,
        ty: Option<TypeId>,
    ) -> NodeId {
        self.alloc(NodeKind::SimpleName { identifier }, ty, element)
    }

    /// Allocate an integer literal node.
    pub fn number_literal(&mut self, value: i64, ty: TypeId) -> NodeId {
        self.alloc(NodeKind::NumberLiteral { value }, Some(ty), None)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn tag(&self, id: NodeId) -> NodeTag {
        self.nodes[id.index()].kind.tag()
    }

    #[inline]
    pub fn ty(&self, id: NodeId) -> Option<TypeId> {
        self.nodes[id.index()].ty
    }

    #[inline]
    pub fn element(&self, id: NodeId) -> Option<ElementId> {
        self.nodes[id.index()].element
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn set_ty(&mut self, id: NodeId, ty: Option<TypeId>) {
        self.nodes[id.index()].ty = ty;
    }

    pub fn set_element(&mut self, id: NodeId, element: Option<ElementId>) {
        self.nodes[id.index()].element = element;
    }

    /// Mark a creation node as producing a retained (+1) result.
    ///
    /// Returns `false` when the node kind cannot carry the flag.
    pub fn set_retained_result(&mut self, id: NodeId) -> bool {
        match &mut self.nodes[id.index()].kind {
            NodeKind::ArrayCreation {
                retained_result, ..
            }
            | NodeKind::ClassInstanceCreation {
                retained_result, ..
            }
            | NodeKind::FunctionInvocation {
                retained_result, ..
            } => {
                *retained_result = true;
                true
            }
            _ => false,
        }
    }

    /// Children of `id` in traversal order.
    pub fn children(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        self.kind(id).children()
    }

    /// The owned child list `slot` of `id`, empty if the kind has none.
    pub fn list(&self, id: NodeId, slot: ListSlot) -> &[NodeId] {
        self.kind(id).list(slot).unwrap_or(&[])
    }

    /// Append an unparented node to one of `parent`'s child lists.
    ///
    /// # Panics
    /// Panics if `parent`'s kind has no list named `slot`.
    pub fn push_child(&mut self, parent: NodeId, slot: ListSlot, child: NodeId) {
        debug_assert!(self.parent(child).is_none(), "{child:?} already has a parent");
        let tag = self.tag(parent);
        match self.nodes[parent.index()].kind.list_mut(slot) {
            Some(list) => list.push(child),
            None => panic!("{tag:?} node {parent:?} has no {slot:?} list"),
        }
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Detach `id` from its parent so it can be moved under a new node.
    ///
    /// The old parent still names `id` in its child slot and must itself be
    /// replaced before the tree is traversed again.
    pub fn take(&mut self, id: NodeId) -> NodeId {
        self.nodes[id.index()].parent = None;
        id
    }

    /// Put `new` in `old`'s position under `old`'s parent and detach `old`.
    ///
    /// Replacing a root leaves both nodes parentless; the caller owns roots.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        debug_assert_ne!(old, new, "node replaced with itself");
        let Some(parent) = self.nodes[old.index()].parent.take() else {
            tracing::trace!(?old, ?new, "replaced a root node");
            return;
        };
        let mut spliced = false;
        for slot in self.nodes[parent.index()].kind.child_slots_mut() {
            if *slot == old {
                *slot = new;
                spliced = true;
                break;
            }
        }
        debug_assert!(spliced, "{parent:?} does not list its child {old:?}");
        self.nodes[new.index()].parent = Some(parent);
    }

    /// Structural deep copy of the subtree rooted at `id`.
    ///
    /// Every descendant is copied; the copy shares no node with the
    /// original and is returned unparented.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        ensure_sufficient_stack(|| {
            let Node {
                mut kind,
                ty,
                element,
                ..
            } = self.nodes[id.index()].clone();
            for slot in kind.child_slots_mut() {
                *slot = self.deep_copy(*slot);
            }
            self.alloc(kind, ty, element)
        })
    }

    /// Find the first node under `root` whose parent link disagrees with the
    /// node that lists it as a child.
    pub fn find_parent_mismatch(&self, root: NodeId) -> Option<NodeId> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            for child in self.children(id) {
                if self.parent(child) != Some(id) {
                    return Some(child);
                }
                stack.push(child);
            }
        }
        None
    }

    /// Debug-mode check that every parent link under `root` agrees with the
    /// tree shape. Called after each pass; catches a rewrite that spliced a
    /// node without detaching it first.
    pub fn validate_parents(&self, root: NodeId) {
        if cfg!(debug_assertions) {
            if let Some(bad) = self.find_parent_mismatch(root) {
                panic!(
                    "{:?} node {bad:?} has parent {:?} but is listed elsewhere under {root:?}",
                    self.tag(bad),
                    self.parent(bad),
                );
            }
        }
    }

    /// Number of allocated nodes, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
