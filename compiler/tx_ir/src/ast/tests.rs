use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::StringInterner;

/// Converter over a toy syntax: `"@X"` is an annotation, `"#X"` an enum
/// constant, `"/** X"` a doc comment, anything else a simple name.
struct ToyConverter<'a> {
    interner: &'a StringInterner,
    converted: Vec<String>,
}

impl NodeConverter for ToyConverter<'_> {
    type Syntax = String;

    fn convert(&mut self, tree: &mut Tree, syntax: &String) -> NodeId {
        self.converted.push(syntax.clone());
        if let Some(rest) = syntax.strip_prefix('@') {
            let name = tree.simple_name(self.interner.intern(rest), None, None);
            tree.alloc(NodeKind::Annotation { type_name: name }, None, None)
        } else if let Some(rest) = syntax.strip_prefix('#') {
            let name = tree.simple_name(self.interner.intern(rest), None, None);
            tree.alloc(
                NodeKind::EnumConstantDeclaration {
                    annotations: Vec::new(),
                    name,
                    arguments: Vec::new(),
                },
                None,
                None,
            )
        } else if let Some(rest) = syntax.strip_prefix("/** ") {
            tree.alloc(
                NodeKind::Javadoc {
                    text: self.interner.intern(rest),
                },
                None,
                None,
            )
        } else {
            tree.simple_name(self.interner.intern(syntax), None, None)
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn build_enum(tree: &mut Tree, interner: &StringInterner, constants: &[&str]) -> NodeId {
    let doc = "/** Colors".to_owned();
    let annotations = strings(&["@Deprecated"]);
    let name = "Color".to_owned();
    let constants = strings(constants);
    let body = strings(&["values"]);
    let mut converter = ToyConverter {
        interner,
        converted: Vec::new(),
    };
    tree.convert_enum_declaration(
        &mut converter,
        &EnumDeclarationSyntax {
            javadoc: Some(&doc),
            annotations: &annotations,
            name: &name,
            constants: &constants,
            body: &body,
            ty: None,
            element: None,
        },
    )
}

#[test]
fn conversion_attaches_children_in_declared_order() {
    let interner = StringInterner::new();
    let mut tree = Tree::new();
    let decl = build_enum(&mut tree, &interner, &["#RED", "#GREEN"]);

    let tags: Vec<NodeTag> = tree.children(decl).iter().map(|&c| tree.tag(c)).collect();
    assert_eq!(
        tags,
        vec![
            NodeTag::Javadoc,
            NodeTag::Annotation,
            NodeTag::SimpleName,
            NodeTag::EnumConstantDeclaration,
            NodeTag::EnumConstantDeclaration,
            NodeTag::SimpleName,
        ]
    );
    for child in tree.children(decl) {
        assert_eq!(tree.parent(child), Some(decl));
    }
    assert_eq!(tree.list(decl, ListSlot::Constants).len(), 2);
    assert_eq!(tree.find_parent_mismatch(decl), None);
}

#[test]
fn deep_copy_is_independent_of_original() {
    let interner = StringInterner::new();
    let mut tree = Tree::new();
    let original = build_enum(&mut tree, &interner, &["#RED"]);
    let original_constants = tree.list(original, ListSlot::Constants).to_vec();

    let copy = tree.deep_copy(original);
    assert_ne!(copy, original);
    assert_eq!(tree.parent(copy), None);

    let copied_constants = tree.list(copy, ListSlot::Constants).to_vec();
    assert_eq!(copied_constants.len(), 1);
    assert_ne!(copied_constants[0], original_constants[0]);
    assert_eq!(
        tree.kind(tree.children(copied_constants[0])[0]),
        tree.kind(tree.children(original_constants[0])[0]),
    );

    let extra_name = tree.simple_name(interner.intern("BLUE"), None, None);
    let extra = tree.alloc(
        NodeKind::EnumConstantDeclaration {
            annotations: Vec::new(),
            name: extra_name,
            arguments: Vec::new(),
        },
        None,
        None,
    );
    tree.push_child(copy, ListSlot::Constants, extra);

    assert_eq!(tree.list(copy, ListSlot::Constants).len(), 2);
    assert_eq!(tree.list(original, ListSlot::Constants), original_constants.as_slice());
    assert_eq!(tree.find_parent_mismatch(copy), None);
    assert_eq!(tree.find_parent_mismatch(original), None);
}

#[test]
fn replace_with_splices_into_parent() {
    let interner = StringInterner::new();
    let mut tree = Tree::new();
    let old = tree.simple_name(interner.intern("a"), None, None);
    let stmt = tree.alloc(NodeKind::ExpressionStatement { expression: old }, None, None);

    let new = tree.simple_name(interner.intern("b"), None, None);
    tree.replace_with(old, new);

    assert_eq!(tree.children(stmt).as_slice(), &[new]);
    assert_eq!(tree.parent(new), Some(stmt));
    assert_eq!(tree.parent(old), None);
}

#[test]
fn take_allows_moving_a_child_under_a_new_parent() {
    let interner = StringInterner::new();
    let mut tree = Tree::new();
    let x = tree.simple_name(interner.intern("x"), None, None);
    let old_stmt = tree.alloc(NodeKind::ExpressionStatement { expression: x }, None, None);
    let block = tree.alloc(
        NodeKind::Block {
            statements: vec![old_stmt],
        },
        None,
        None,
    );

    let moved = tree.take(x);
    let new_stmt = tree.alloc(
        NodeKind::ReturnStatement {
            expression: Some(moved),
        },
        None,
        None,
    );
    tree.replace_with(old_stmt, new_stmt);

    assert_eq!(tree.parent(x), Some(new_stmt));
    assert_eq!(tree.list(block, ListSlot::Statements), &[new_stmt]);
    assert_eq!(tree.find_parent_mismatch(block), None);
}

#[test]
fn retained_flag_only_on_creation_kinds() {
    let mut tree = Tree::new();
    let creation = tree.alloc(
        NodeKind::ArrayCreation {
            dimensions: Vec::new(),
            initializer: None,
            retained_result: false,
        },
        None,
        None,
    );
    let literal = tree.alloc(NodeKind::NullLiteral, None, None);

    assert!(tree.set_retained_result(creation));
    assert!(!tree.set_retained_result(literal));
    assert!(matches!(
        tree.kind(creation),
        NodeKind::ArrayCreation {
            retained_result: true,
            ..
        }
    ));
}

proptest! {
    #[test]
    fn deep_copy_preserves_shape(width in 0usize..12) {
        let interner = StringInterner::new();
        let mut tree = Tree::new();
        let constants: Vec<String> = (0..width).map(|i| format!("#C{i}")).collect();
        let refs: Vec<&str> = constants.iter().map(String::as_str).collect();
        let original = build_enum(&mut tree, &interner, &refs);
        let before = tree.len();

        let copy = tree.deep_copy(original);

        // Every original node is duplicated exactly once.
        prop_assert_eq!(tree.len(), before * 2);
        prop_assert_eq!(tree.list(copy, ListSlot::Constants).len(), width);
        prop_assert_eq!(tree.find_parent_mismatch(copy), None);
    }
}
