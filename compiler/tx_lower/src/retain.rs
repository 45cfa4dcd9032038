//! Ownership helpers shared by lowering passes.

use tx_ir::{NodeId, NodeKind, PostfixOp, PrefixOp, Tree};

/// Whether `node` sits in an assignable position: the left side of an
/// assignment, or the operand of `++`, `--` or address-of.
pub fn is_assigned(tree: &Tree, node: NodeId) -> bool {
    let Some(parent) = tree.parent(node) else {
        return false;
    };
    match tree.kind(parent) {
        NodeKind::Assignment { lhs, .. } => *lhs == node,
        NodeKind::Prefix { op, .. } => matches!(
            op,
            PrefixOp::Increment | PrefixOp::Decrement | PrefixOp::AddressOf
        ),
        NodeKind::Postfix { op, .. } => {
            matches!(op, PostfixOp::Increment | PostfixOp::Decrement)
        }
        _ => false,
    }
}

/// Ask `node` to produce a retained (+1) result.
///
/// Creation expressions always can. A function call can only when its
/// runtime function has a retained variant. Returns the node that now
/// carries the retain, or `None` if the caller must retain explicitly.
pub fn retain_result(tree: &mut Tree, node: NodeId) -> Option<NodeId> {
    let can_retain = match tree.kind(node) {
        NodeKind::ArrayCreation { .. } | NodeKind::ClassInstanceCreation { .. } => true,
        NodeKind::FunctionInvocation { function, .. } => function.retained_name.is_some(),
        _ => false,
    };
    (can_retain && tree.set_retained_result(node)).then_some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tx_ir::{AssignOp, ElementId, FunctionRef, Name, StringInterner, TypeId};

    fn name(tree: &mut Tree, interner: &StringInterner, s: &str) -> NodeId {
        tree.simple_name(interner.intern(s), None, None)
    }

    #[test]
    fn left_side_of_assignment_is_assigned() {
        let interner = StringInterner::new();
        let mut tree = Tree::new();
        let lhs = name(&mut tree, &interner, "a");
        let rhs = name(&mut tree, &interner, "b");
        tree.alloc(
            NodeKind::Assignment {
                op: AssignOp::PlusAssign,
                lhs,
                rhs,
            },
            None,
            None,
        );
        assert!(is_assigned(&tree, lhs));
        assert!(!is_assigned(&tree, rhs));
    }

    #[test]
    fn increments_assign_but_negation_does_not() {
        let interner = StringInterner::new();
        let mut tree = Tree::new();
        let counted = name(&mut tree, &interner, "i");
        let negated = name(&mut tree, &interner, "j");
        tree.alloc(
            NodeKind::Postfix {
                op: PostfixOp::Increment,
                operand: counted,
            },
            None,
            None,
        );
        tree.alloc(
            NodeKind::Prefix {
                op: PrefixOp::Minus,
                operand: negated,
            },
            None,
            None,
        );
        assert!(is_assigned(&tree, counted));
        assert!(!is_assigned(&tree, negated));
    }

    #[test]
    fn only_creations_and_retaining_functions_absorb_retain() {
        let interner = StringInterner::new();
        let mut tree = Tree::new();
        let creation = tree.alloc(
            NodeKind::ClassInstanceCreation {
                arguments: Vec::new(),
                retained_result: false,
            },
            None,
            None,
        );
        assert_eq!(retain_result(&mut tree, creation), Some(creation));
        assert!(matches!(
            tree.kind(creation),
            NodeKind::ClassInstanceCreation {
                retained_result: true,
                ..
            }
        ));

        let plain = FunctionRef::new(interner.intern("Foo_get"), TypeId::new(2), ElementId::new(0));
        let retaining = plain.clone().with_retained_name(interner.intern("Foo_newGet"));
        let call = |tree: &mut Tree, function: FunctionRef| {
            tree.alloc(
                NodeKind::FunctionInvocation {
                    function,
                    arguments: Vec::new(),
                    retained_result: false,
                },
                None,
                None,
            )
        };
        let plain_call = call(&mut tree, plain);
        let retaining_call = call(&mut tree, retaining);
        assert_eq!(retain_result(&mut tree, plain_call), None);
        assert_eq!(retain_result(&mut tree, retaining_call), Some(retaining_call));

        let variable = tree.simple_name(Name::EMPTY, None, None);
        assert_eq!(retain_result(&mut tree, variable), None);
    }
}
