//! Construction of declaration nodes from host syntax.
//!
//! The host front end owns its syntax tree. A [`NodeConverter`] turns one
//! host syntax node into a core node; declaration constructors call it for
//! every child and attach the results as owned children.

use super::{NodeKind, NodeTag, Tree};
use crate::{ElementId, NodeId, TypeId};

/// Converts one host syntax node (and its subtree) into a core node.
pub trait NodeConverter {
    type Syntax;

    /// Convert `syntax`, returning an unparented node allocated in `tree`.
    fn convert(&mut self, tree: &mut Tree, syntax: &Self::Syntax) -> NodeId;
}

/// Borrowed view of a host enum declaration.
pub struct EnumDeclarationSyntax<'s, S> {
    pub javadoc: Option<&'s S>,
    pub annotations: &'s [S],
    pub name: &'s S,
    pub constants: &'s [S],
    pub body: &'s [S],
    /// The declared type.
    pub ty: Option<TypeId>,
    /// The declared type element.
    pub element: Option<ElementId>,
}

impl Tree {
    /// Build an enum declaration node, converting every child in declaration order.
    pub fn convert_enum_declaration<C: NodeConverter>(
        &mut self,
        converter: &mut C,
        syntax: &EnumDeclarationSyntax<'_, C::Syntax>,
    ) -> NodeId {
        let javadoc = syntax.javadoc.map(|doc| converter.convert(self, doc));
        let annotations = convert_all(self, converter, syntax.annotations);
        let name = converter.convert(self, syntax.name);
        let constants = convert_all(self, converter, syntax.constants);
        debug_assert!(
            constants
                .iter()
                .all(|&c| self.tag(c) == NodeTag::EnumConstantDeclaration),
            "enum constants must convert to constant declarations",
        );
        let body = convert_all(self, converter, syntax.body);

        self.alloc(
            NodeKind::EnumDeclaration {
                javadoc,
                annotations,
                name,
                constants,
                body,
            },
            syntax.ty,
            syntax.element,
        )
    }
}

fn convert_all<C: NodeConverter>(
    tree: &mut Tree,
    converter: &mut C,
    syntax: &[C::Syntax],
) -> Vec<NodeId> {
    syntax.iter().map(|s| converter.convert(tree, s)).collect()
}
